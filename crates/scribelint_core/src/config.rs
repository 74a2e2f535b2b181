//! Session configuration.
//!
//! Loaded from an INI-style `.scribelint.ini`: a `[default]` section with
//! the global options, `[*.<ext>]` sections carrying per-extension
//! overrides, and a `[formats]` section remapping unknown extensions onto
//! supported ones.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use configparser::ini::Ini;
use globset::{Glob, GlobMatcher};
use regex::Regex;
use tracing::debug;

use crate::alert::Severity;
use crate::engine::LintView;
use crate::error::LintError;
use crate::registry::RuleOverride;

/// Names tried when discovering a configuration file.
pub const CONFIG_FILES: &[&str] = &[".scribelint.ini", "scribelint.ini"];

/// Per-extension override section (`[*.md]`, `[docs/**.rst]`, ...).
#[derive(Debug)]
pub struct Section {
    pattern: String,
    matcher: GlobMatcher,
    /// Replaces the default style list when present.
    pub based_on_styles: Option<Vec<String>>,
    pub rule_overrides: Vec<(String, RuleOverride)>,
    pub token_ignores: Vec<String>,
    pub block_ignores: Vec<String>,
}

/// The loaded configuration.
#[derive(Debug)]
pub struct Config {
    /// Directory holding style bundles.
    pub styles_path: PathBuf,
    /// Alerts below this level are filtered.
    pub min_alert_level: Severity,
    /// Styles enabled by default.
    pub based_on_styles: Vec<String>,
    /// Vocabularies to load from `<StylesPath>/Vocab/`.
    pub vocab: Vec<String>,
    /// Global token-ignore patterns.
    pub ignore_patterns: Vec<String>,
    /// Global per-rule overrides.
    pub rule_overrides: Vec<(String, RuleOverride)>,
    /// Extension remapping from `[formats]` (`mdx = md`).
    pub formats: HashMap<String, String>,
    /// Per-extension override sections.
    pub sections: Vec<Section>,
    /// Worker count for file-level parallelism; `None` = logical CPUs.
    pub jobs: Option<usize>,
    /// Treat configuration errors as fatal.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            styles_path: PathBuf::from("styles"),
            min_alert_level: Severity::Suggestion,
            based_on_styles: Vec::new(),
            vocab: Vec::new(),
            ignore_patterns: Vec::new(),
            rule_overrides: Vec::new(),
            formats: HashMap::new(),
            sections: Vec::new(),
            jobs: None,
            strict: false,
        }
    }
}

impl Config {
    /// Looks for a config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|p| p.is_file())
    }

    /// Loads configuration from an INI file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let mut ini = Ini::new_cs();
        let map = ini
            .load(path)
            .map_err(|e| LintError::runtime(format!("cannot read {}: {e}", path.display())))?;

        let mut config = Config::default();
        let base_dir = path.parent().unwrap_or(Path::new("."));

        let mut section_names: Vec<&String> = map.keys().collect();
        section_names.sort();

        for name in section_names {
            let pairs = &map[name];
            match name.as_str() {
                "default" => config.load_default(pairs, base_dir)?,
                "formats" => {
                    for (key, value) in sorted(pairs) {
                        if let Some(v) = value {
                            config.formats.insert(key.clone(), v.clone());
                        }
                    }
                }
                pattern => config.sections.push(Section::parse(pattern, pairs)?),
            }
        }

        debug!(
            styles_path = %config.styles_path.display(),
            styles = ?config.based_on_styles,
            "loaded configuration"
        );
        Ok(config)
    }

    fn load_default(
        &mut self,
        pairs: &HashMap<String, Option<String>>,
        base_dir: &Path,
    ) -> Result<(), LintError> {
        for (key, value) in sorted(pairs) {
            let Some(value) = value else { continue };
            match key.as_str() {
                "StylesPath" => {
                    let p = PathBuf::from(value);
                    self.styles_path = if p.is_absolute() { p } else { base_dir.join(p) };
                }
                "MinAlertLevel" => {
                    self.min_alert_level = Severity::from_str(value)
                        .map_err(|e| LintError::runtime(format!("MinAlertLevel: {e}")))?;
                }
                "BasedOnStyles" => self.based_on_styles = split_list(value),
                "Vocab" => self.vocab = split_list(value),
                "IgnorePatterns" => self.ignore_patterns = split_list(value),
                other => {
                    let over = parse_rule_override(other, value)?;
                    self.rule_overrides.push(over);
                }
            }
        }
        Ok(())
    }

    /// Every style referenced anywhere in the config, for compiling the
    /// session rule set.
    pub fn all_styles(&self) -> Vec<String> {
        let mut styles = self.based_on_styles.clone();
        for section in &self.sections {
            if let Some(extra) = &section.based_on_styles {
                styles.extend(extra.iter().cloned());
            }
        }
        styles.sort();
        styles.dedup();
        styles
    }

    /// Builds the effective view for one file, applying every matching
    /// section in order.
    pub fn view_for(&self, path: &Path) -> Result<LintView, LintError> {
        let mut styles = self.based_on_styles.clone();
        let mut overrides = self.rule_overrides.clone();
        let mut ignores = self.ignore_patterns.clone();

        for section in &self.sections {
            if !section.applies_to(path) {
                continue;
            }
            if let Some(s) = &section.based_on_styles {
                styles = s.clone();
            }
            overrides.extend(section.rule_overrides.iter().cloned());
            ignores.extend(section.token_ignores.iter().cloned());
            ignores.extend(section.block_ignores.iter().cloned());
        }

        let mut token_ignores = Vec::with_capacity(ignores.len());
        for pattern in &ignores {
            token_ignores.push(Regex::new(pattern).map_err(|e| {
                LintError::runtime(format!("invalid ignore pattern '{pattern}': {e}"))
            })?);
        }

        let mut view = LintView::for_styles(styles);
        view.overrides = overrides;
        view.token_ignores = token_ignores;
        Ok(view)
    }

    /// Resolves the format for a path, honoring `[formats]` remapping.
    pub fn format_for(&self, path: &Path) -> scribelint_parser::Format {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let ext = self.formats.get(&ext).cloned().unwrap_or(ext);
        scribelint_parser::Format::from_extension(&ext)
    }
}

impl Section {
    fn parse(
        pattern: &str,
        pairs: &HashMap<String, Option<String>>,
    ) -> Result<Section, LintError> {
        let glob = Glob::new(pattern)
            .map_err(|e| LintError::runtime(format!("invalid section glob '{pattern}': {e}")))?;

        let mut section = Section {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
            based_on_styles: None,
            rule_overrides: Vec::new(),
            token_ignores: Vec::new(),
            block_ignores: Vec::new(),
        };

        for (key, value) in sorted(pairs) {
            let Some(value) = value else { continue };
            match key.as_str() {
                "BasedOnStyles" => section.based_on_styles = Some(split_list(value)),
                "TokenIgnores" => section.token_ignores = split_list(value),
                "BlockIgnores" => section.block_ignores = split_list(value),
                other => {
                    let over = parse_rule_override(other, value)?;
                    section.rule_overrides.push(over);
                }
            }
        }
        Ok(section)
    }

    /// Patterns without a separator match the file name alone, so `[*.md]`
    /// applies at any depth.
    fn applies_to(&self, path: &Path) -> bool {
        if self.pattern.contains('/') {
            self.matcher.is_match(path)
        } else {
            path.file_name().is_some_and(|n| self.matcher.is_match(n))
        }
    }
}

fn parse_rule_override(key: &str, value: &str) -> Result<(String, RuleOverride), LintError> {
    if !key.contains('.') {
        return Err(LintError::runtime(format!(
            "unknown configuration key '{key}'"
        )));
    }
    let over = match value {
        "NO" | "no" | "false" => RuleOverride::Off,
        "YES" | "yes" | "true" => return Ok((key.to_string(), RuleOverride::Level(Severity::Warning))),
        level => RuleOverride::Level(
            Severity::from_str(level)
                .map_err(|e| LintError::runtime(format!("override '{key}': {e}")))?,
        ),
    };
    Ok((key.to_string(), over))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn sorted(pairs: &HashMap<String, Option<String>>) -> Vec<(&String, &Option<String>)> {
    let mut entries: Vec<_> = pairs.iter().collect();
    entries.sort_by_key(|(k, _)| k.as_str());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn load(content: &str) -> Config {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".scribelint.ini");
        fs::write(&path, content).unwrap();
        Config::from_file(&path).unwrap()
    }

    #[test]
    fn test_default_section() {
        let config = load(
            "[default]\nStylesPath = styles\nMinAlertLevel = warning\nBasedOnStyles = Base, House\n",
        );
        assert_eq!(config.min_alert_level, Severity::Warning);
        assert_eq!(config.based_on_styles, vec!["Base", "House"]);
        assert!(config.styles_path.ends_with("styles"));
    }

    #[test]
    fn test_rule_overrides() {
        let config = load("[default]\nBase.Avoid = NO\nBase.Caps = error\n");
        assert!(config
            .rule_overrides
            .contains(&("Base.Avoid".to_string(), RuleOverride::Off)));
        assert!(config
            .rule_overrides
            .contains(&("Base.Caps".to_string(), RuleOverride::Level(Severity::Error))));
    }

    #[test]
    fn test_extension_section() {
        let config = load(
            "[default]\nBasedOnStyles = Base\n\n[*.md]\nBasedOnStyles = Docs\nBase.Avoid = NO\n",
        );
        assert_eq!(config.sections.len(), 1);

        let view = config.view_for(Path::new("guide.md")).unwrap();
        assert!(view.styles.contains("Docs"));
        assert!(!view.styles.contains("Base"));

        let view = config.view_for(Path::new("notes.txt")).unwrap();
        assert!(view.styles.contains("Base"));
    }

    #[test]
    fn test_all_styles_union() {
        let config = load("[default]\nBasedOnStyles = Base\n\n[*.md]\nBasedOnStyles = Docs\n");
        assert_eq!(config.all_styles(), vec!["Base", "Docs"]);
    }

    #[test]
    fn test_formats_remap() {
        let config = load("[formats]\nmdx = md\n");
        assert_eq!(
            config.format_for(Path::new("page.mdx")),
            scribelint_parser::Format::Markdown
        );
    }

    #[test]
    fn test_token_ignores_compiled_per_view() {
        let config = load("[*.md]\nTokenIgnores = (\\{\\{.+?\\}\\})\n");
        let view = config.view_for(Path::new("a.md")).unwrap();
        assert_eq!(view.token_ignores.len(), 1);
    }

    #[test]
    fn test_bad_min_level_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".scribelint.ini");
        fs::write(&path, "[default]\nMinAlertLevel = loud\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_unknown_default_key_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".scribelint.ini");
        fs::write(&path, "[default]\nTypoKey = x\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_discover() {
        let temp = tempdir().unwrap();
        assert!(Config::discover(temp.path()).is_none());
        fs::write(temp.path().join(".scribelint.ini"), "[default]\n").unwrap();
        assert!(Config::discover(temp.path()).is_some());
    }

    #[test]
    fn test_vocab_and_ignore_patterns() {
        let config = load("[default]\nVocab = Docs\nIgnorePatterns = (`[^`]+`)\n");
        assert_eq!(config.vocab, vec!["Docs"]);
        assert_eq!(config.ignore_patterns.len(), 1);
    }
}
