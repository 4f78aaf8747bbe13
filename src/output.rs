//! Output formatting shared by the CLI commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line per object)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Markdown)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &["table", "markdown", "json", "json-pretty"]
    }

    /// Serialize `value` as JSON in this format's style
    ///
    /// Table formats fall back to pretty JSON.
    pub fn to_json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            Self::Json => serde_json::to_string(value),
            _ => serde_json::to_string_pretty(value),
        }
    }

    /// Render rows as a table in this format's style
    #[cfg(feature = "display")]
    pub fn to_table<T: tabled::Tabled>(&self, rows: &[T]) -> String {
        use tabled::settings::Style;

        let mut table = tabled::Table::new(rows);
        match self {
            Self::Markdown => table.with(Style::markdown()),
            _ => table.with(Style::rounded()),
        };
        table.to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("table").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("json-pretty").unwrap(),
            OutputFormat::JsonPretty
        );
        assert!(OutputFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_output_format_display_round_trips() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn test_to_json() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(OutputFormat::Json.to_json(&value).unwrap(), r#"{"a":1}"#);
        assert!(OutputFormat::JsonPretty
            .to_json(&value)
            .unwrap()
            .contains('\n'));
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_to_table() {
        #[derive(tabled::Tabled)]
        struct Row {
            column: &'static str,
        }

        let rendered = OutputFormat::Markdown.to_table(&[Row { column: "name" }]);
        assert!(rendered.contains("| column |"));
        assert!(rendered.contains("name"));
    }
}
