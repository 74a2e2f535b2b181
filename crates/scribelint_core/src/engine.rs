//! Rule execution over a single document.
//!
//! For each block, rules whose selector matches the block's scope run in
//! stable `(Style, Rule)` order; raw matches translate through the block's
//! offset map to document offsets and become alerts. Document-scoped kinds
//! (`consistency`, `conditional`, `readability`) carry per-document state
//! that never leaks across documents.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use scribelint_ast::{Block, LineIndex, Span};
use scribelint_parser::Format;

use crate::alert::{Action, Alert, Severity};
use crate::error::LintError;
use crate::registry::{RuleOverride, RuleSet};
use crate::rule::{fill_template, CompiledKind, CompiledRule};
use crate::rule::compile::MatchOut;
use crate::rule::consistency;

/// The per-file view of the configuration: which styles run, per-rule
/// level overrides, and token-ignore patterns.
#[derive(Debug, Default)]
pub struct LintView {
    /// Styles enabled for this file.
    pub styles: HashSet<String>,
    /// Effective per-rule overrides (later entries shadow earlier ones).
    pub overrides: Vec<(String, RuleOverride)>,
    /// Regions matching these patterns never alert.
    pub token_ignores: Vec<Regex>,
}

impl LintView {
    /// A view that enables the given styles with no overrides.
    pub fn for_styles<I, S>(styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            styles: styles.into_iter().map(Into::into).collect(),
            overrides: Vec::new(),
            token_ignores: Vec::new(),
        }
    }

    fn rule_level(&self, rule: &CompiledRule) -> Option<Severity> {
        let name = rule.check_name();
        for (target, over) in self.overrides.iter().rev() {
            if *target == name {
                return match over {
                    RuleOverride::Off => None,
                    RuleOverride::Level(level) => Some(*level),
                };
            }
        }
        Some(rule.def.level)
    }

    fn enabled(&self, rule: &CompiledRule) -> bool {
        // The implicit vocabulary style is always active.
        rule.def.style == "Vocab" || self.styles.contains(&rule.def.style)
    }
}

/// Lints one document's source text.
pub fn lint_source(
    ruleset: &RuleSet,
    view: &LintView,
    min_level: Severity,
    source: &str,
    format: Format,
) -> Result<Vec<Alert>, LintError> {
    let blocks = scribelint_parser::segment(source, format, &view.token_ignores)?;
    let lines = LineIndex::new(source);

    // Active rules with their effective levels, in stable order.
    let active: Vec<(&CompiledRule, Severity)> = ruleset
        .rules()
        .filter(|r| view.enabled(r))
        .filter_map(|r| view.rule_level(r).map(|level| (r.as_ref(), level)))
        .collect();

    let mut alerts: Vec<Alert> = Vec::new();
    let mut consistency_state: HashMap<String, consistency::Tracker> = HashMap::new();

    // Document pre-pass: conditional rules need every `second` match in the
    // document before any block can be judged.
    let mut seconds: HashMap<String, HashSet<String>> = HashMap::new();
    for (rule, _) in &active {
        if let CompiledKind::Conditional(check) = &rule.kind {
            let set = seconds.entry(rule.check_name()).or_default();
            for block in blocks.iter().filter(|b| applies(rule, b)) {
                check.collect(&block.text, set);
            }
        }
    }

    for block in &blocks {
        let mut tags: Option<Vec<scribelint_text::TaggedToken>> = None;

        for (rule, level) in &active {
            if !applies(rule, block) {
                continue;
            }

            // POS tags are built lazily and memoized per block.
            if rule.needs_tags() && tags.is_none() {
                tags = Some(scribelint_text::Tagger::new().tag(&block.text));
            }
            let tag_slice = tags.as_deref().unwrap_or(&[]);

            let matches = match &rule.kind {
                CompiledKind::Existence(c) => c.check(&block.text),
                CompiledKind::Substitution(c) => c.check(&block.text, tag_slice),
                CompiledKind::Occurrence(c) => c.check(&block.text),
                CompiledKind::Repetition(c) => c.check(&block.text),
                CompiledKind::Capitalization(c) => c.check(&block.text),
                CompiledKind::Spelling(c) => c.check(&block.text),
                CompiledKind::Sequence(c) => c.check(&block.text, tag_slice),
                CompiledKind::Consistency(c) => {
                    let tracker = consistency_state.entry(rule.check_name()).or_default();
                    c.check(&block.text, tracker)
                }
                CompiledKind::Conditional(c) => {
                    let set = &seconds[&rule.check_name()];
                    c.check(&block.text, set)
                }
                // Readability runs once per document, below.
                CompiledKind::Readability(_) => continue,
            };

            for m in matches {
                if block.is_masked(m.span) {
                    continue;
                }
                let doc_span = block.offsets.span_to_doc(m.span);
                alerts.push(assemble(rule, *level, &m, doc_span, &lines));
            }
        }
    }

    // Document-level readability alerts anchor at the start of the source.
    let prose = document_prose(&blocks);
    for (rule, level) in &active {
        if let CompiledKind::Readability(check) = &rule.kind {
            if let Some(m) = check.check_document(&prose) {
                alerts.push(assemble(rule, *level, &m, Span::new(0, 0), &lines));
            }
        }
    }

    apply_limits(&mut alerts, &active);
    alerts.retain(|a| a.severity >= min_level);
    alerts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(alerts)
}

/// Scope gating: the selector must match, and rules without `code: true`
/// skip blocks inside code scopes.
fn applies(rule: &CompiledRule, block: &Block) -> bool {
    if !rule.def.code && block.scope.contains("code") {
        return false;
    }
    rule.def.scope.matches(&block.scope)
}

/// The document's prose, for document-level scoring.
fn document_prose(blocks: &[Block]) -> String {
    let mut prose = String::new();
    for block in blocks {
        if block.scope.tags().first().map(String::as_str) == Some("text") {
            if !prose.is_empty() {
                prose.push_str("\n\n");
            }
            prose.push_str(&block.text);
        }
    }
    prose
}

fn assemble(
    rule: &CompiledRule,
    level: Severity,
    m: &MatchOut,
    doc_span: Span,
    lines: &LineIndex,
) -> Alert {
    let position = lines.position(doc_span.start);
    let args: Vec<&str> = m.args.iter().map(String::as_str).collect();
    let end_col = position.column + doc_span.len().max(1) - 1;

    let action = rule.def.action.as_ref().map(|a| Action {
        name: a.name.clone(),
        params: if a.params.is_empty() {
            m.suggestions.clone()
        } else {
            a.params.clone()
        },
    });

    Alert {
        check: rule.check_name(),
        description: rule.def.description.clone(),
        message: fill_template(&rule.def.message, &args),
        severity: level,
        r#match: m.matched.clone(),
        line: position.line,
        span: (position.column, end_col),
        offset: doc_span,
        link: rule.def.link.clone(),
        action,
    }
}

/// Drops alerts beyond each rule's `limit`, from the tail.
fn apply_limits(alerts: &mut Vec<Alert>, active: &[(&CompiledRule, Severity)]) {
    let limits: HashMap<String, usize> = active
        .iter()
        .filter_map(|(r, _)| r.def.limit.map(|l| (r.check_name(), l)))
        .collect();
    if limits.is_empty() {
        return;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    alerts.retain(|alert| {
        let Some(&limit) = limits.get(&alert.check) else {
            return true;
        };
        let count = counts.entry(alert.check.clone()).or_insert(0);
        *count += 1;
        *count <= limit
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocab;
    use std::fs;
    use tempfile::tempdir;

    fn ruleset(rules: &[(&str, &str)]) -> (RuleSet, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("Base");
        fs::create_dir_all(&dir).unwrap();
        for (name, yaml) in rules {
            fs::write(dir.join(format!("{name}.yml")), yaml).unwrap();
        }
        let (set, errors) = RuleSet::load(
            temp.path(),
            &["Base".to_string()],
            &[],
            &Vocab::default(),
        )
        .unwrap();
        assert!(errors.is_empty(), "unexpected config errors: {errors:?}");
        (set, temp)
    }

    fn lint(set: &RuleSet, source: &str) -> Vec<Alert> {
        let view = LintView::for_styles(["Base"]);
        lint_source(set, &view, Severity::Suggestion, source, Format::Text).unwrap()
    }

    const AVOID: &str = "extends: existence\nmessage: \"Avoid '%s'\"\ntokens:\n  - very\n  - really\n";

    #[test]
    fn test_existence_scenario() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let alerts = lint(&set, "This is very very good.");
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].r#match, "very");
        assert_eq!(alerts[0].span.0, 9);
        assert_eq!(alerts[1].span.0, 14);
        assert_eq!(alerts[0].message, "Avoid 'very'");
    }

    #[test]
    fn test_limit_truncates_tail() {
        let limited = format!("{AVOID}limit: 1\n");
        let (set, _t) = ruleset(&[("Avoid", &limited)]);
        let alerts = lint(&set, "This is very very good.");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].span.0, 9);
    }

    #[test]
    fn test_substitution_scenario() {
        let (set, _t) = ruleset(&[(
            "Swap",
            "extends: substitution\nmessage: \"Use '%s' instead of '%s'\"\nswap:\n  utilize: use\n",
        )]);
        let alerts = lint(&set, "We utilize it.");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].r#match, "utilize");
        assert_eq!(alerts[0].message, "Use 'use' instead of 'utilize'");
    }

    #[test]
    fn test_consistency_scenario() {
        let (set, _t) = ruleset(&[(
            "Spelling",
            "extends: consistency\nmessage: \"Inconsistent spelling of '%s'\"\neither:\n  colour: color\n",
        )]);
        let alerts = lint(&set, "The colour is bright. The color is dim.");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].r#match, "color");
    }

    #[test]
    fn test_capitalization_scenario() {
        let (set, _t) = ruleset(&[(
            "Sentence",
            "extends: capitalization\nmessage: \"'%s' should be capitalized\"\nmatch: $sentence\n",
        )]);
        let alerts = lint(&set, "this is wrong.");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].span.0, 1);
        assert_eq!(alerts[0].r#match, "this");
    }

    #[test]
    fn test_repetition_scenario() {
        let (set, _t) = ruleset(&[(
            "Repeat",
            "extends: repetition\nmessage: \"'%s' is repeated\"\nmax: 1\ntokens:\n  - '[A-Za-z]+'\n",
        )]);
        let alerts = lint(&set, "the the cat");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].span.0, 5);
        assert_eq!(alerts[0].r#match, "the");
    }

    #[test]
    fn test_readability_scenario() {
        let (set, _t) = ruleset(&[(
            "Grade",
            "extends: readability\nmessage: \"Grade average %s is too high\"\nmetrics:\n  - Flesch-Kincaid\ngrade: 8\n",
        )]);
        let dense = "Organizational heterogeneity necessitates comprehensive \
            interdepartmental communication infrastructure implementations \
            notwithstanding preexisting institutional considerations.";
        let alerts = lint(&set, dense);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].line, 1);

        let simple = "The cat sat. The dog ran. We like both.";
        assert!(lint(&set, simple).is_empty());
    }

    #[test]
    fn test_severity_filter() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let view = LintView::for_styles(["Base"]);
        let alerts = lint_source(
            &set,
            &view,
            Severity::Error,
            "This is very good.",
            Format::Text,
        )
        .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_span_round_trip_invariant() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let source = "This is very good.\n\nAnd really bad.";
        for alert in lint(&set, source) {
            let slice = &source[alert.offset.start as usize..alert.offset.end as usize];
            assert_eq!(slice, alert.r#match);
        }
    }

    #[test]
    fn test_relint_is_deterministic() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let source = "Really very really bad.";
        assert_eq!(lint(&set, source), lint(&set, source));
    }

    #[test]
    fn test_alerts_sorted_by_position() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let alerts = lint(&set, "really bad.\n\nAnd very bad.");
        assert!(alerts.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn test_scope_gating_skips_code() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let view = LintView::for_styles(["Base"]);
        let source = "Prose is very good.\n\n```\nvery code\n```\n";
        let alerts = lint_source(
            &set,
            &view,
            Severity::Suggestion,
            source,
            Format::Markdown,
        )
        .unwrap();
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_code_true_reaches_code_blocks() {
        let yaml = format!("{AVOID}code: true\nscope: code\n");
        let (set, _t) = ruleset(&[("Avoid", &yaml)]);
        let view = LintView::for_styles(["Base"]);
        let source = "```\nvery code\n```\n";
        let alerts = lint_source(
            &set,
            &view,
            Severity::Suggestion,
            source,
            Format::Markdown,
        )
        .unwrap();
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_disabled_style_never_runs() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let view = LintView::for_styles(["Other"]);
        let alerts = lint_source(
            &set,
            &view,
            Severity::Suggestion,
            "very bad",
            Format::Text,
        )
        .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_override_off_in_view() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let mut view = LintView::for_styles(["Base"]);
        view.overrides
            .push(("Base.Avoid".to_string(), RuleOverride::Off));
        let alerts =
            lint_source(&set, &view, Severity::Suggestion, "very bad", Format::Text).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_token_ignores_mask_alerts() {
        let (set, _t) = ruleset(&[("Avoid", AVOID)]);
        let mut view = LintView::for_styles(["Base"]);
        view.token_ignores
            .push(Regex::new(r"\{\{.*?\}\}").unwrap());
        let alerts = lint_source(
            &set,
            &view,
            Severity::Suggestion,
            "A {{ very }} template.",
            Format::Text,
        )
        .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_accepted_tokens_reduce_alerts() {
        // The invariant: adding an accepted token can only shrink the
        // alert count.
        let temp = tempdir().unwrap();
        let dir = temp.path().join("Base");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("Caps.yml"),
            "extends: capitalization\nmessage: \"'%s' should be capitalized\"\nmatch: $title\nscope: heading\n",
        )
        .unwrap();

        let load = |accepted: &[&str]| {
            let mut vocab = Vocab::default();
            for a in accepted {
                vocab.accepted.insert(a.to_string());
            }
            RuleSet::load(temp.path(), &["Base".to_string()], &[], &vocab)
                .unwrap()
                .0
        };

        let source = "# Running kubectl Commands\n";
        let view = LintView::for_styles(["Base"]);
        let without = lint_source(
            &load(&[]),
            &view,
            Severity::Suggestion,
            source,
            Format::Markdown,
        )
        .unwrap();
        let with = lint_source(
            &load(&["kubectl"]),
            &view,
            Severity::Suggestion,
            source,
            Format::Markdown,
        )
        .unwrap();
        assert!(with.len() < without.len());
    }

    #[test]
    fn test_conditional_across_blocks() {
        let (set, _t) = ruleset(&[(
            "Abbr",
            "extends: conditional\nmessage: \"'%s' has no definition\"\nfirst: '\\b([A-Z]{3,})\\b'\nsecond: '(?:\\b[A-Z][a-z]+ )+\\(([A-Z]{3,})\\)'\n",
        )]);
        // Defined in the first paragraph, used in the second.
        let ok = "Application Programming Interface (API) is defined.\n\nThe API works.";
        assert!(lint(&set, ok).is_empty());

        let bad = "The API works.";
        let alerts = lint(&set, bad);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].r#match, "API");
    }
}
