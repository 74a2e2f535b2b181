//! JSON output: a map from file path to its alerts.

use serde_json::{json, Map, Value};

use scribelint_core::FileResult;

pub fn render_json(results: &[FileResult]) -> String {
    let mut root = Map::new();
    for result in results {
        let alerts: Vec<Value> = result
            .alerts
            .iter()
            .map(|a| {
                json!({
                    "Check": a.check,
                    "Description": a.description,
                    "Line": a.line,
                    "Link": a.link,
                    "Match": a.r#match,
                    "Message": a.message,
                    "Severity": a.severity,
                    "Span": [a.span.0, a.span.1],
                    "Action": a.action,
                })
            })
            .collect();
        root.insert(result.path.display().to_string(), Value::Array(alerts));
    }
    serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribelint_core::{Alert, Severity, Span};
    use std::path::PathBuf;

    #[test]
    fn test_json_shape() {
        let results = vec![FileResult {
            path: PathBuf::from("doc.md"),
            alerts: vec![Alert {
                check: "Base.Avoid".to_string(),
                description: "No intensifiers.".to_string(),
                message: "Avoid 'very'".to_string(),
                severity: Severity::Error,
                r#match: "very".to_string(),
                line: 1,
                span: (9, 12),
                offset: Span::new(8, 12),
                link: String::new(),
                action: None,
            }],
        }];

        let out = render_json(&results);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        let alert = &parsed["doc.md"][0];
        assert_eq!(alert["Check"], "Base.Avoid");
        assert_eq!(alert["Severity"], "error");
        assert_eq!(alert["Span"][0], 9);
    }

    #[test]
    fn test_empty_is_object() {
        let parsed: Value = serde_json::from_str(&render_json(&[])).unwrap();
        assert!(parsed.as_object().unwrap().is_empty());
    }
}
