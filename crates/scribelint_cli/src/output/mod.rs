//! Alert rendering.

mod human;
mod json;
mod line;

use std::str::FromStr;

use scribelint_core::FileResult;

pub use human::render_human;
pub use json::render_json;
pub use line::render_line;

/// The supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Line,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "line" => Ok(OutputFormat::Line),
            "JSON" | "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Renders results in the chosen format.
pub fn render(results: &[FileResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => render_human(results),
        OutputFormat::Line => render_line(results),
        OutputFormat::Json => render_json(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("line".parse::<OutputFormat>().unwrap(), OutputFormat::Line);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
