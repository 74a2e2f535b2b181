//! Human-readable output, grouped per file with a summary line.

use std::fmt::Write;

use scribelint_core::{FileResult, Severity};

pub fn render_human(results: &[FileResult]) -> String {
    let mut out = String::new();
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut suggestions = 0usize;
    let mut files_with_alerts = 0usize;

    for result in results {
        if result.alerts.is_empty() {
            continue;
        }
        files_with_alerts += 1;
        let _ = writeln!(out, "\n {}", result.path.display());
        for alert in &result.alerts {
            match alert.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Suggestion => suggestions += 1,
            }
            let _ = writeln!(
                out,
                " {}:{}\t{}\t{}\t{}",
                alert.line, alert.span.0, alert.severity, alert.message, alert.check
            );
        }
    }

    let _ = writeln!(
        out,
        "\n{} {} error{}, {} warning{}, and {} suggestion{} in {} file{}.",
        if errors > 0 { "✖" } else { "✔" },
        errors,
        plural(errors),
        warnings,
        plural(warnings),
        suggestions,
        plural(suggestions),
        files_with_alerts,
        plural(files_with_alerts),
    );
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
