//! The rule registry: discovers rule files under `StylesPath`, decodes and
//! compiles them, and holds the resulting set for the lint session.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::alert::Severity;
use crate::error::{ConfigError, LintError};
use crate::rule::{self, CompiledRule, RuleDef};
use crate::vocab::Vocab;

/// A per-rule configuration override (`<Style>.<Rule> = <level>|NO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOverride {
    Level(Severity),
    Off,
}

/// All compiled rules for a session, keyed by style then rule name so
/// iteration order is stable (`Style, Rule`).
#[derive(Debug, Default)]
pub struct RuleSet {
    styles: BTreeMap<String, BTreeMap<String, Arc<CompiledRule>>>,
}

impl RuleSet {
    /// Loads and compiles every rule of the given styles.
    ///
    /// Configuration errors (malformed rule files) are collected and the
    /// offending rules dropped; runtime errors (unreadable styles
    /// directory, dictionary failures) abort the load.
    pub fn load(
        styles_path: &Path,
        styles: &[String],
        overrides: &[(String, RuleOverride)],
        vocab: &Vocab,
    ) -> Result<(Self, Vec<ConfigError>), LintError> {
        let mut set = RuleSet::default();
        let mut errors = Vec::new();
        let accepted: Vec<String> = vocab.accepted.iter().cloned().collect();

        for style in styles {
            let dir = styles_path.join(style);
            if !dir.is_dir() {
                return Err(LintError::runtime(format!(
                    "style '{}' not found under {}",
                    style,
                    styles_path.display()
                )));
            }

            let mut entries: Vec<_> = WalkDir::new(&dir)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.file_type().is_file()
                        && e.path().extension().is_some_and(|ext| ext == "yml")
                })
                .map(|e| e.into_path())
                .collect();
            entries.sort();

            for path in entries {
                let name = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(name) => name.to_string(),
                    None => continue,
                };
                let content = std::fs::read_to_string(&path)?;

                match rule::decode(style, &name, &path, &content) {
                    Ok(def) => {
                        set.add_rule(def, &path, styles_path, overrides, &accepted, &mut errors)?;
                    }
                    Err(e) => {
                        warn!("dropping rule {}.{}: {}", style, name, e);
                        errors.push(e);
                    }
                }
            }
        }

        set.add_reject_rule(styles_path, vocab, &mut errors)?;

        debug!(rules = set.len(), "compiled rule set");
        Ok((set, errors))
    }

    fn add_rule(
        &mut self,
        mut def: RuleDef,
        path: &Path,
        styles_path: &Path,
        overrides: &[(String, RuleOverride)],
        accepted: &[String],
        errors: &mut Vec<ConfigError>,
    ) -> Result<(), LintError> {
        let check_name = def.def.check_name();
        match lookup_override(overrides, &check_name) {
            Some(RuleOverride::Off) => {
                debug!("rule {} disabled by config", check_name);
                return Ok(());
            }
            Some(RuleOverride::Level(level)) => def.def.level = level,
            None => {}
        }

        match rule::compile(&def, path, styles_path, accepted) {
            Ok(compiled) => {
                self.styles
                    .entry(def.def.style.clone())
                    .or_default()
                    .insert(def.def.name.clone(), Arc::new(compiled));
                Ok(())
            }
            Err(LintError::Config(e)) => {
                warn!("dropping rule {}: {}", check_name, e);
                errors.push(e);
                Ok(())
            }
            Err(fatal) => Err(fatal),
        }
    }

    /// Rejected vocabulary tokens compile into an implicit existence rule
    /// at error level.
    fn add_reject_rule(
        &mut self,
        styles_path: &Path,
        vocab: &Vocab,
        errors: &mut Vec<ConfigError>,
    ) -> Result<(), LintError> {
        if vocab.rejected.is_empty() {
            return Ok(());
        }
        let tokens: Vec<String> = vocab.rejected.iter().cloned().collect();
        let def = RuleDef {
            def: rule::Definition {
                style: "Vocab".to_string(),
                name: "Avoid".to_string(),
                message: "Avoid using '%s'.".to_string(),
                description: "Rejected vocabulary.".to_string(),
                level: Severity::Error,
                scope: crate::selector::Selector::default(),
                link: String::new(),
                code: false,
                limit: None,
                action: None,
            },
            body: rule::RuleBody::Existence(rule::existence::Existence {
                append: false,
                ignorecase: false,
                nonword: false,
                raw: Vec::new(),
                tokens,
            }),
        };

        let path = styles_path.join("Vocab");
        self.add_rule(def, &path, styles_path, &[], &[], errors)
    }

    /// Iterates rules in stable `(Style, Rule)` order.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<CompiledRule>> {
        self.styles.values().flat_map(|rules| rules.values())
    }

    /// Looks up one rule by its fully-qualified name.
    pub fn get(&self, check_name: &str) -> Option<&Arc<CompiledRule>> {
        let (style, name) = check_name.split_once('.')?;
        self.styles.get(style)?.get(name)
    }

    pub fn len(&self) -> usize {
        self.styles.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The style names with at least one compiled rule.
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

fn lookup_override(
    overrides: &[(String, RuleOverride)],
    check_name: &str,
) -> Option<RuleOverride> {
    // Later entries win, so per-section overrides can shadow defaults.
    overrides
        .iter()
        .rev()
        .find(|(name, _)| name == check_name)
        .map(|(_, o)| *o)
}
