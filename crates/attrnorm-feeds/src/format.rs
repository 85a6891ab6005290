//! Line formats for raw pair input.

use serde::Deserialize;

use crate::{FeedError, InputFormat, RawPair};

#[derive(Deserialize)]
struct JsonPair {
    key: String,
    value: String,
}

/// Parse one input line.
///
/// Returns `Ok(None)` for lines that carry no pair (blank lines, and `#`
/// comments in TSV). A TSV line splits on its first tab; later tabs stay in
/// the value.
pub fn parse_line(line: &str, line_no: u64, format: InputFormat) -> Result<Option<RawPair>, FeedError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Ok(None);
    }

    match format {
        InputFormat::Tsv => {
            if line.trim_start().starts_with('#') {
                return Ok(None);
            }
            let (key, value) = line.split_once('\t').ok_or_else(|| FeedError::MalformedLine {
                line: line_no,
                reason: "missing tab separator".to_string(),
            })?;
            Ok(Some(RawPair::new(key, value, line_no)))
        }
        InputFormat::JsonLines => {
            let pair: JsonPair =
                serde_json::from_str(line).map_err(|e| FeedError::MalformedLine {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            Ok(Some(RawPair::new(pair.key, pair.value, line_no)))
        }
    }
}
