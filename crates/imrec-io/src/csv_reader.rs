//! CSV file reader

use crate::encoding::decode_with_fallback;
use crate::options::{IoConfig, Quoting};
use crate::reader::{IoError, IoResult};
use crate::table::{Table, Value};
use std::path::Path;

/// Read a CSV file into a [`Table`]
///
/// The first row is the header. Fields matching one of the configured NA
/// markers become null; everything else is kept as text.
pub fn read_csv(path: &Path, config: &IoConfig) -> IoResult<Table> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }

    tracing::info!("Loading CSV {}", path.display());
    let bytes = std::fs::read(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    let source = path.display().to_string();
    let (text, encoding) = decode_with_fallback(&bytes, &config.encoding_candidates(), &source)?;
    tracing::debug!("Decoded {} as {}", source, encoding);

    let table = parse_csv(&text, config)?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        source
    );
    Ok(table)
}

/// Parse CSV text into a [`Table`]
pub fn parse_csv(text: &str, config: &IoConfig) -> IoResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .quoting(config.quoting != Quoting::None)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(headers.iter().cloned());
    if table.num_columns() != headers.len() {
        return Err(IoError::InvalidFormat(
            "CSV header contains duplicate column names".to_string(),
        ));
    }

    for result in reader.records() {
        let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
        let row = record
            .iter()
            .map(|field| {
                if config.is_na(field) {
                    Value::Null
                } else {
                    Value::text(field)
                }
            })
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv_na_values() {
        let text = "PMID,title,PubMed.doi\n1001,Title A,10.1000/xyz\n1002,NA,\n";
        let table = parse_csv(text, &IoConfig::default()).unwrap();
        assert_eq!(table.columns(), ["PMID", "title", "PubMed.doi"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.get(0, "title"), &Value::text("Title A"));
        assert!(table.get(1, "title").is_null());
        assert!(table.get(1, "PubMed.doi").is_null());
    }

    #[test]
    fn test_parse_csv_custom_delimiter_and_quotes() {
        let config = IoConfig {
            delimiter: ';',
            ..Default::default()
        };
        let text = "a;b\n\"x;y\";\"say \"\"hi\"\"\"\n";
        let table = parse_csv(text, &config).unwrap();
        assert_eq!(table.get(0, "a"), &Value::text("x;y"));
        assert_eq!(table.get(0, "b"), &Value::text("say \"hi\""));
    }

    #[test]
    fn test_parse_csv_ragged_rows_rejected() {
        let text = "a,b\n1,2,3\n";
        assert!(parse_csv(text, &IoConfig::default()).is_err());
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let text = "a,a\n1,2\n";
        assert!(parse_csv(text, &IoConfig::default()).is_err());
    }

    #[test]
    fn test_read_csv_with_encoding_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"title\ncaf\xE9\n").unwrap();

        let table = read_csv(file.path(), &IoConfig::default()).unwrap();
        assert_eq!(table.get(0, "title"), &Value::text("café"));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv(Path::new("/definitely/not/here.csv"), &IoConfig::default());
        assert!(matches!(err, Err(IoError::FileNotFound(_))));
    }
}
