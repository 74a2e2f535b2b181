//! The linter orchestrator: vocabulary and rule loading, file discovery,
//! and parallel execution across documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSetBuilder};
use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::alert::Alert;
use crate::config::Config;
use crate::engine;
use crate::error::{ConfigError, LintError};
use crate::registry::RuleSet;
use crate::vocab::Vocab;

/// Alerts for one linted file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub alerts: Vec<Alert>,
}

/// Successes in caller order plus per-file failures.
pub type LintFilesResult = (Vec<FileResult>, Vec<(PathBuf, LintError)>);

/// The core linter.
///
/// The rule set is built before any worker starts and shared read-only;
/// per-document state lives inside each `lint` call.
pub struct Linter {
    config: Config,
    ruleset: Arc<RuleSet>,
    config_errors: Vec<ConfigError>,
}

impl Linter {
    /// Builds a linter from configuration.
    ///
    /// Vocabulary loads before the styles so AcceptedTokens are visible to
    /// every rule's compile step. In strict mode the first configuration
    /// error aborts; otherwise errors are collected for reporting.
    pub fn new(config: Config) -> Result<Self, LintError> {
        let vocab = Vocab::load(&config.styles_path, &config.vocab)?;
        let (ruleset, config_errors) = RuleSet::load(
            &config.styles_path,
            &config.all_styles(),
            &config.rule_overrides,
            &vocab,
        )?;

        if config.strict {
            if let Some(first) = config_errors.into_iter().next() {
                return Err(LintError::Config(first));
            }
            return Ok(Self {
                config,
                ruleset: Arc::new(ruleset),
                config_errors: Vec::new(),
            });
        }

        Ok(Self {
            config,
            ruleset: Arc::new(ruleset),
            config_errors,
        })
    }

    /// Configuration errors collected during rule compilation.
    pub fn config_errors(&self) -> &[ConfigError] {
        &self.config_errors
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    /// Expands CLI arguments into concrete files: literal paths keep their
    /// given order, glob patterns expand in path-sorted order.
    pub fn discover(&self, patterns: &[String]) -> Result<Vec<PathBuf>, LintError> {
        let mut files = Vec::new();

        for pattern in patterns {
            let path = Path::new(pattern);
            if path.is_file() {
                files.push(path.to_path_buf());
                continue;
            }
            if path.is_dir() {
                let mut expanded: Vec<PathBuf> = WalkDir::new(path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .collect();
                expanded.sort();
                files.extend(expanded);
                continue;
            }

            let glob = Glob::new(pattern).map_err(|e| {
                LintError::runtime(format!("argument '{pattern}' does not exist: {e}"))
            })?;
            let mut builder = GlobSetBuilder::new();
            builder.add(glob);
            let set = builder
                .build()
                .map_err(|e| LintError::runtime(format!("invalid pattern '{pattern}': {e}")))?;

            let mut expanded: Vec<PathBuf> = WalkDir::new(".")
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| set.is_match(p.strip_prefix(".").unwrap_or(p.as_path())))
                .collect();

            if expanded.is_empty() {
                return Err(LintError::runtime(format!(
                    "argument '{pattern}' does not exist"
                )));
            }
            expanded.sort();
            files.extend(expanded);
        }

        info!("discovered {} files to lint", files.len());
        Ok(files)
    }

    /// Lints files in parallel. A failing document aborts only itself;
    /// result order matches the input order.
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.unwrap_or(0))
            .build();

        let run = |paths: &[PathBuf]| -> Vec<Result<FileResult, (PathBuf, LintError)>> {
            paths
                .par_iter()
                .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
                .collect()
        };

        let results = match pool {
            Ok(pool) => pool.install(|| run(paths)),
            Err(e) => {
                warn!("thread pool unavailable ({e}), linting serially");
                paths
                    .iter()
                    .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
                    .collect()
            }
        };

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(file) => successes.push(file),
                Err((path, error)) => {
                    warn!("failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }
        (successes, failures)
    }

    /// Lints a single file.
    pub fn lint_file(&self, path: &Path) -> Result<FileResult, LintError> {
        let source = std::fs::read_to_string(path)?;
        let view = self.config.view_for(path)?;
        let format = self.config.format_for(path);
        let alerts = engine::lint_source(
            &self.ruleset,
            &view,
            self.config.min_alert_level,
            &source,
            format,
        )?;
        Ok(FileResult {
            path: path.to_path_buf(),
            alerts,
        })
    }

    /// Lints in-memory content (stdin or a string argument) as the given
    /// virtual path.
    pub fn lint_string(&self, name: &str, source: &str) -> Result<FileResult, LintError> {
        let path = Path::new(name);
        let view = self.config.view_for(path)?;
        let format = self.config.format_for(path);
        let alerts = engine::lint_source(
            &self.ruleset,
            &view,
            self.config.min_alert_level,
            source,
            format,
        )?;
        Ok(FileResult {
            path: path.to_path_buf(),
            alerts,
        })
    }
}
