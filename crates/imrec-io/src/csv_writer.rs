//! CSV file writer

use crate::encoding::encode_output;
use crate::options::{IoConfig, Quoting};
use crate::reader::{IoError, IoResult};
use crate::table::Table;
use std::path::Path;

/// Render a [`Table`] as CSV text
pub fn to_csv_string(table: &Table, config: &IoConfig) -> IoResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .quote_style(quote_style(config.quoting))
        .terminator(terminator(&config.line_terminator)?)
        .from_writer(Vec::new());

    writer
        .write_record(table.columns())
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|value| value.to_string()))
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IoError::InvalidFormat(e.to_string()))
}

/// Write a [`Table`] to a CSV file, creating parent directories
pub fn write_csv(table: &Table, path: &Path, config: &IoConfig) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let text = to_csv_string(table, config)?;
    let bytes = encode_output(&text, config.output_encoding())?;
    std::fs::write(path, bytes)?;

    tracing::info!(
        "Wrote {} rows x {} columns to {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );
    Ok(())
}

fn quote_style(quoting: Quoting) -> csv::QuoteStyle {
    match quoting {
        Quoting::Minimal => csv::QuoteStyle::Necessary,
        Quoting::All => csv::QuoteStyle::Always,
        Quoting::NonNumeric => csv::QuoteStyle::NonNumeric,
        Quoting::None => csv::QuoteStyle::Never,
    }
}

fn terminator(line_terminator: &str) -> IoResult<csv::Terminator> {
    match line_terminator {
        "\r\n" => Ok(csv::Terminator::CRLF),
        t if t.len() == 1 && t.is_ascii() => Ok(csv::Terminator::Any(t.as_bytes()[0])),
        other => Err(IoError::InvalidOption {
            name: "line_terminator".to_string(),
            reason: format!("{:?} is not a supported terminator", other),
        }),
    }
}
