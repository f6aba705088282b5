//! Character decoding with ordered fallbacks
//!
//! Provider exports arrive as UTF-8, Windows-1252 or Latin-1 depending on
//! who produced them. Input bytes are decoded with the first candidate
//! encoding that accepts them without replacement characters.

use crate::reader::{IoError, IoResult};
use encoding_rs::Encoding;

/// Resolve an encoding label ("utf8", "cp1252", "latin1", ...)
pub fn encoding_for_label(label: &str) -> IoResult<&'static Encoding> {
    let normalized = match label.trim().to_ascii_lowercase().as_str() {
        "utf8" => "utf-8".to_string(),
        "cp1252" => "windows-1252".to_string(),
        "latin1" | "latin-1" => "iso-8859-1".to_string(),
        other => other.to_string(),
    };
    Encoding::for_label(normalized.as_bytes())
        .ok_or_else(|| IoError::UnknownEncoding(label.to_string()))
}

/// Decode bytes with the first encoding that succeeds
///
/// A leading byte order mark is removed. Returns the text and the name of
/// the encoding used.
pub fn decode_with_fallback(
    bytes: &[u8],
    candidates: &[String],
    source: &str,
) -> IoResult<(String, &'static str)> {
    for (attempt, label) in candidates.iter().enumerate() {
        let encoding = encoding_for_label(label)?;
        let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
        if !had_errors {
            if attempt > 0 {
                tracing::warn!(
                    "Decoded {} with fallback encoding {}",
                    source,
                    encoding.name()
                );
            }
            return Ok((text.into_owned(), encoding.name()));
        }
        tracing::warn!("Failed to decode {} as {}", source, encoding.name());
    }

    Err(IoError::Undecodable {
        path: source.to_string(),
        tried: candidates.join(", "),
    })
}

/// Encode text for output
///
/// Characters the target encoding cannot represent are written as numeric
/// character references and reported once.
pub fn encode_output(text: &str, label: &str) -> IoResult<Vec<u8>> {
    let encoding = encoding_for_label(label)?;
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        tracing::warn!(
            "Some characters could not be represented in {}",
            encoding.name()
        );
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_label_aliases() {
        assert_eq!(encoding_for_label("utf8").unwrap().name(), "UTF-8");
        assert_eq!(encoding_for_label("cp1252").unwrap().name(), "windows-1252");
        assert!(encoding_for_label("klingon").is_err());
    }

    #[test]
    fn test_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBFtitle\nA\n";
        let (text, name) = decode_with_fallback(bytes, &labels(&["utf-8"]), "mem").unwrap();
        assert_eq!(text, "title\nA\n");
        assert_eq!(name, "UTF-8");
    }

    #[test]
    fn test_falls_back_to_windows_1252() {
        // "café" in Windows-1252
        let bytes = b"caf\xE9";
        let (text, name) =
            decode_with_fallback(bytes, &labels(&["utf-8", "cp1252"]), "mem").unwrap();
        assert_eq!(text, "café");
        assert_eq!(name, "windows-1252");
    }

    #[test]
    fn test_all_candidates_fail() {
        let bytes = b"caf\xE9";
        let err = decode_with_fallback(bytes, &labels(&["utf-8"]), "mem").unwrap_err();
        assert!(matches!(err, IoError::Undecodable { .. }));
    }

    #[test]
    fn test_encode_output() {
        assert_eq!(encode_output("café", "cp1252").unwrap(), b"caf\xE9".to_vec());
        assert_eq!(encode_output("café", "utf-8").unwrap(), "café".as_bytes().to_vec());
    }
}
