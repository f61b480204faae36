//! Newline-delimited JSON decoding
//!
//! A polled response body carries zero or more events, one JSON document per
//! line. Lines are decoded independently so that a truncated or garbled line
//! only loses itself, never the rest of the batch.

use tracing::debug;

use crate::domain::event::BuildEvent;

/// Decodes a response body into its events, in textual order
///
/// Blank lines are skipped and lines that fail to parse are dropped. An empty
/// or whitespace-only body yields an empty batch.
pub fn decode_batch(body: &str) -> Vec<BuildEvent> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(value) => Some(BuildEvent::new(value)),
            Err(e) => {
                debug!("Dropping undecodable event line ({}): {:.120}", e, line);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_and_whitespace_bodies() {
        assert!(decode_batch("").is_empty());
        assert!(decode_batch("   \n\n \t \r\n").is_empty());
    }

    #[test]
    fn test_preserves_line_order() {
        let body = "{\"event\":\"add_message\",\"id\":\"a\"}\n{\"event\":\"end\"}";
        let events = decode_batch(body);

        assert_eq!(
            events,
            vec![
                BuildEvent::new(json!({"event": "add_message", "id": "a"})),
                BuildEvent::new(json!({"event": "end"})),
            ]
        );
    }

    #[test]
    fn test_drops_garbled_lines_only() {
        let body = "{\"event\":\"token\"}\n{\"event\":\"end_ver\n\n{\"event\":\"end\"}\r\n";
        let kinds: Vec<_> = decode_batch(body)
            .iter()
            .map(|e| e.kind().map(str::to_string))
            .collect();

        assert_eq!(kinds, vec![Some("token".to_string()), Some("end".to_string())]);
    }

    #[test]
    fn test_all_garbled_yields_empty_batch() {
        assert!(decode_batch("{\"event\":\nnot json\n}").is_empty());
    }
}
