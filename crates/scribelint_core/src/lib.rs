//! # scribelint_core
//!
//! The core linting engine:
//!
//! - Configuration loading and per-file views
//! - The rule definition model and its ten extension points
//! - The scope/selector system
//! - Rule compilation, registry, and the execution engine
//! - Parallel file linting
//!
//! ## Example
//!
//! ```rust,ignore
//! use scribelint_core::{Config, Linter};
//!
//! let config = Config::from_file(".scribelint.ini")?;
//! let linter = Linter::new(config)?;
//!
//! let files = linter.discover(&["docs/**/*.md".to_string()])?;
//! let (results, failures) = linter.lint_files(&files);
//! for result in results {
//!     println!("{}: {} alerts", result.path.display(), result.alerts.len());
//! }
//! ```

mod alert;
mod config;
mod engine;
mod error;
mod linter;
mod registry;
mod selector;
mod spell;
mod vocab;

pub mod rule;

pub use alert::{Action, Alert, Severity};
pub use scribelint_ast::Span;
pub use config::{Config, CONFIG_FILES};
pub use engine::{lint_source, LintView};
pub use error::{ConfigError, LintError};
pub use linter::{FileResult, LintFilesResult, Linter};
pub use registry::{RuleOverride, RuleSet};
pub use selector::Selector;
pub use spell::Dictionary;
pub use vocab::Vocab;
