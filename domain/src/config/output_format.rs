//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished run is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Matches with item details, per-member session reports and pending writes
    Full,
    /// One line per match (default)
    #[default]
    Summary,
    /// Machine-readable run report
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_summary() {
        assert_eq!(OutputFormat::default(), OutputFormat::Summary);
    }

    #[test]
    fn test_lowercase_names() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(serde_json::to_string(&OutputFormat::Full).unwrap(), "\"full\"");
    }
}
