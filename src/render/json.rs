//! JSON rendering for outlines.

use crate::error::{Error, Result};
use crate::model::OutlineDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &OutlineDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Heading, HeadingLevel, Line};

    fn sample() -> OutlineDocument {
        let headings = vec![
            Heading {
                line: Line::new("1. Introduction", 16.0, 50.0, 1),
                level: HeadingLevel::H1,
            },
            Heading {
                line: Line::new("1.1 Scope", 13.0, 50.0, 2),
                level: HeadingLevel::H2,
            },
        ];
        OutlineDocument::new("Report", &headings)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Report\""));
        assert!(json.contains("\"level\": \"H2\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Report","outline":[{"level":"H1","text":"1. Introduction","page":1},{"level":"H2","text":"1.1 Scope","page":2}]}"#
        );
    }

    #[test]
    fn test_empty_outline() {
        let json = to_json(&OutlineDocument::new("Unknown Title", &[]), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"Unknown Title","outline":[]}"#);
    }
}
