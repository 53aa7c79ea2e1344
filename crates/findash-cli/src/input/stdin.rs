use serde::de::DeserializeOwned;
use std::io::{self, Read};

use super::file::{parse_document, DocumentFormat};

/// Deserialize piped stdin. Returns None when stdin is a terminal or empty.
///
/// JSON is tried first; anything else is parsed as YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let format = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        DocumentFormat::Json
    } else {
        DocumentFormat::Yaml
    };
    tracing::debug!(?format, bytes = trimmed.len(), "reading input from stdin");
    parse_document(trimmed, format).map(Some)
}
