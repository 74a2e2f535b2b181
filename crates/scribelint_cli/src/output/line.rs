//! One alert per line: `path:line:col:Check:message`.

use std::fmt::Write;

use scribelint_core::FileResult;

pub fn render_line(results: &[FileResult]) -> String {
    let mut out = String::new();
    for result in results {
        for alert in &result.alerts {
            let _ = writeln!(
                out,
                "{}:{}:{}:{}:{}",
                result.path.display(),
                alert.line,
                alert.span.0,
                alert.check,
                alert.message
            );
        }
    }
    out
}
