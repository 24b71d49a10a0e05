//! Outcome of a single adapter call.

use crate::error::SourceError;
use datagate_core::SourceKey;

/// What one adapter call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResult {
    /// One formatted line per record, never empty
    Records(Vec<String>),

    /// The lookup succeeded and matched nothing
    Empty,

    /// The lookup failed; carries a human-readable cause
    Failure(String),
}

impl SourceResult {
    /// Wrap formatted lines, mapping no lines to `Empty`.
    pub fn from_lines(lines: Vec<String>) -> Self {
        if lines.is_empty() {
            Self::Empty
        } else {
            Self::Records(lines)
        }
    }

    /// Fold an adapter's internal outcome into a result.
    pub fn from_outcome(outcome: Result<Vec<String>, SourceError>) -> Self {
        match outcome {
            Ok(lines) => Self::from_lines(lines),
            Err(e) => Self::Failure(e.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Number of record lines.
    pub fn record_count(&self) -> usize {
        match self {
            Self::Records(lines) => lines.len(),
            _ => 0,
        }
    }

    /// Render as the text block for `key`.
    ///
    /// Records are newline-joined; `Empty` and `Failure` render as the
    /// source's sentinel line. The output is never empty.
    pub fn render(&self, key: SourceKey) -> String {
        let tag = key.tag();
        match self {
            Self::Records(lines) => lines.join("\n"),
            Self::Empty => tag.empty_line(),
            Self::Failure(cause) => tag.error_line(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_empty() {
        assert_eq!(SourceResult::from_lines(Vec::new()), SourceResult::Empty);
    }

    #[test]
    fn test_render_records_newline_joined() {
        let result = SourceResult::Records(vec![
            "PG_ORDER: ID: 1, Product: Laptop, Amount: 999.00, Date: 2024-01-02".to_string(),
            "PG_ORDER: ID: 2, Product: Laptop Bag, Amount: 49.50, Date: 2024-01-03".to_string(),
        ]);
        let text = result.render(SourceKey::RelationalOrder);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("PG_ORDER: ID: 1"));
    }

    #[test]
    fn test_render_sentinels() {
        assert_eq!(
            SourceResult::Empty.render(SourceKey::ExternalCountry),
            "API_COUNTRY: No relevant country data found."
        );

        let failed = SourceResult::from_outcome(Err(SourceError::Query(
            "no such table: projects".to_string(),
        )));
        assert!(failed.is_failure());
        assert_eq!(
            failed.render(SourceKey::DocumentProject),
            "MONGO_ERROR: Could not retrieve project data. Error: query failed: no such table: projects"
        );
    }
}
