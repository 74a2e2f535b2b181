//! The rule definition model.
//!
//! A rule file is a single YAML mapping: a common header (`extends`,
//! `message`, `level`, `scope`, ...) plus kind-specific fields. The header
//! decodes into [`Definition`]; the kind-specific fields decode through a
//! per-kind decoder into one variant of [`RuleBody`]. Unknown or malformed
//! keys produce positioned [`ConfigError`]s and the rule is dropped.

mod yaml;

pub mod capitalization;
pub mod compile;
pub mod conditional;
pub mod consistency;
pub mod existence;
pub mod occurrence;
pub mod readability;
pub mod repetition;
pub mod sequence;
pub mod spelling;
pub mod substitution;

use std::path::Path;

use serde_yaml::Mapping;

use crate::alert::{Action, Severity};
use crate::error::ConfigError;
use crate::selector::Selector;

use yaml::RuleMap;

/// The ten extension points.
pub const EXTENSION_POINTS: &[&str] = &[
    "capitalization",
    "conditional",
    "consistency",
    "existence",
    "occurrence",
    "readability",
    "repetition",
    "sequence",
    "spelling",
    "substitution",
];

/// Header keys shared by every rule kind.
const COMMON_KEYS: &[&str] = &[
    "action",
    "code",
    "description",
    "extends",
    "level",
    "limit",
    "link",
    "message",
    "scope",
];

/// The common header of a rule definition.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Style the rule belongs to.
    pub style: String,
    /// Rule name (the file stem).
    pub name: String,
    /// Message template; `%s` holes are filled per kind.
    pub message: String,
    /// Longer description for output formats that show one.
    pub description: String,
    /// Severity of emitted alerts.
    pub level: Severity,
    /// Which scope paths the rule applies to.
    pub scope: Selector,
    /// Documentation link.
    pub link: String,
    /// Whether the rule also applies inside `code` scopes.
    pub code: bool,
    /// Maximum alerts per document.
    pub limit: Option<usize>,
    /// Optional remediation attached to alerts.
    pub action: Option<Action>,
}

impl Definition {
    /// Fully-qualified name, `Style.Rule`.
    pub fn check_name(&self) -> String {
        format!("{}.{}", self.style, self.name)
    }
}

/// Kind-specific rule configuration.
#[derive(Debug, Clone)]
pub enum RuleBody {
    Existence(existence::Existence),
    Substitution(substitution::Substitution),
    Occurrence(occurrence::Occurrence),
    Repetition(repetition::Repetition),
    Consistency(consistency::Consistency),
    Conditional(conditional::Conditional),
    Capitalization(capitalization::Capitalization),
    Readability(readability::Readability),
    Spelling(spelling::Spelling),
    Sequence(sequence::Sequence),
}

impl RuleBody {
    /// The extension point this body belongs to.
    pub fn kind(&self) -> &'static str {
        match self {
            RuleBody::Existence(_) => "existence",
            RuleBody::Substitution(_) => "substitution",
            RuleBody::Occurrence(_) => "occurrence",
            RuleBody::Repetition(_) => "repetition",
            RuleBody::Consistency(_) => "consistency",
            RuleBody::Conditional(_) => "conditional",
            RuleBody::Capitalization(_) => "capitalization",
            RuleBody::Readability(_) => "readability",
            RuleBody::Spelling(_) => "spelling",
            RuleBody::Sequence(_) => "sequence",
        }
    }
}

/// A decoded rule: header plus kind body, immutable after decode.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub def: Definition,
    pub body: RuleBody,
}

/// A rule's compiled matcher.
#[derive(Debug)]
pub enum CompiledKind {
    Existence(existence::Check),
    Substitution(substitution::Check),
    Occurrence(occurrence::Check),
    Repetition(repetition::Check),
    Consistency(consistency::Check),
    Conditional(conditional::Check),
    Capitalization(capitalization::Check),
    Readability(readability::Check),
    Spelling(spelling::Check),
    Sequence(sequence::Check),
}

/// A fully compiled rule: header plus precompiled matcher, shared read-only
/// across workers.
#[derive(Debug)]
pub struct CompiledRule {
    pub def: Definition,
    pub kind: CompiledKind,
}

impl CompiledRule {
    pub fn check_name(&self) -> String {
        self.def.check_name()
    }

    /// True when running this rule requires POS tags for the block.
    pub fn needs_tags(&self) -> bool {
        match &self.kind {
            CompiledKind::Sequence(_) => true,
            CompiledKind::Substitution(c) => c.needs_tags(),
            _ => false,
        }
    }
}

/// Compiles a decoded rule's matcher.
///
/// `accepted` (the session's AcceptedTokens) is injected into the
/// exceptions of the conditional, capitalization, and spelling kinds here,
/// at compile time.
pub fn compile(
    rule: &RuleDef,
    path: &Path,
    styles_path: &Path,
    accepted: &[String],
) -> Result<CompiledRule, crate::error::LintError> {
    let mapping = Mapping::new();
    let map = RuleMap::new(&mapping, path);

    let kind = match &rule.body {
        RuleBody::Existence(b) => CompiledKind::Existence(existence::Check::compile(&map, b)?),
        RuleBody::Substitution(b) => {
            CompiledKind::Substitution(substitution::Check::compile(&map, b)?)
        }
        RuleBody::Occurrence(b) => CompiledKind::Occurrence(occurrence::Check::compile(&map, b)?),
        RuleBody::Repetition(b) => CompiledKind::Repetition(repetition::Check::compile(&map, b)?),
        RuleBody::Consistency(b) => {
            CompiledKind::Consistency(consistency::Check::compile(&map, b)?)
        }
        RuleBody::Conditional(b) => {
            CompiledKind::Conditional(conditional::Check::compile(&map, b, accepted)?)
        }
        RuleBody::Capitalization(b) => {
            CompiledKind::Capitalization(capitalization::Check::compile(&map, b, accepted)?)
        }
        RuleBody::Readability(b) => {
            CompiledKind::Readability(readability::Check::compile(&map, b)?)
        }
        RuleBody::Spelling(b) => {
            CompiledKind::Spelling(spelling::Check::compile(&map, b, styles_path, accepted)?)
        }
        RuleBody::Sequence(b) => CompiledKind::Sequence(sequence::Check::compile(&map, b)?),
    };

    Ok(CompiledRule {
        def: rule.def.clone(),
        kind,
    })
}

/// Decodes one rule file's content.
pub fn decode(style: &str, name: &str, path: &Path, content: &str) -> Result<RuleDef, ConfigError> {
    let mapping: Mapping = serde_yaml::from_str(content).map_err(|e| {
        let line = e.location().map(|l| l.line()).unwrap_or(1);
        ConfigError::new(path, name, format!("invalid YAML: {e}")).with_line(line)
    })?;
    let map = RuleMap::new(&mapping, path);

    let extends = map.required_str("extends").map_err(|_| {
        map.err(
            "extends",
            format!("'{name}' is missing the required 'extends' key"),
        )
    })?;
    if !EXTENSION_POINTS.contains(&extends.as_str()) {
        return Err(map.err(
            &extends,
            format!("'extends' must be one of {EXTENSION_POINTS:?}"),
        ));
    }

    let message = map.required_str("message").map_err(|_| {
        map.err(
            "message",
            format!("'{name}' is missing the required 'message' key"),
        )
    })?;

    let level = match map.str("level")? {
        Some(s) => s
            .parse::<Severity>()
            .map_err(|e| map.err("level", e))?,
        None => Severity::Warning,
    };

    let scope = Selector::parse(&map.str("scope")?.unwrap_or_default());

    let action = decode_action(&map)?;

    let def = Definition {
        style: style.to_string(),
        name: name.to_string(),
        message,
        description: map.str("description")?.unwrap_or_default(),
        level,
        scope,
        link: map.str("link")?.unwrap_or_default(),
        code: map.bool("code")?,
        limit: map.usize("limit")?,
        action,
    };

    let (body, kind_keys) = match extends.as_str() {
        "existence" => (
            RuleBody::Existence(existence::decode(&map)?),
            existence::KEYS,
        ),
        "substitution" => (
            RuleBody::Substitution(substitution::decode(&map)?),
            substitution::KEYS,
        ),
        "occurrence" => (
            RuleBody::Occurrence(occurrence::decode(&map)?),
            occurrence::KEYS,
        ),
        "repetition" => (
            RuleBody::Repetition(repetition::decode(&map)?),
            repetition::KEYS,
        ),
        "consistency" => (
            RuleBody::Consistency(consistency::decode(&map)?),
            consistency::KEYS,
        ),
        "conditional" => (
            RuleBody::Conditional(conditional::decode(&map)?),
            conditional::KEYS,
        ),
        "capitalization" => (
            RuleBody::Capitalization(capitalization::decode(&map)?),
            capitalization::KEYS,
        ),
        "readability" => (
            RuleBody::Readability(readability::decode(&map)?),
            readability::KEYS,
        ),
        "spelling" => (RuleBody::Spelling(spelling::decode(&map)?), spelling::KEYS),
        "sequence" => (RuleBody::Sequence(sequence::decode(&map)?), sequence::KEYS),
        _ => unreachable!("extension point validated above"),
    };

    for key in map.keys() {
        if !COMMON_KEYS.contains(&key.as_str()) && !kind_keys.contains(&key.as_str()) {
            return Err(map.err(&key, format!("unknown key '{key}' for kind '{extends}'")));
        }
    }

    Ok(RuleDef { def, body })
}

/// `action` is either a bare name or a mapping `{name, params}`.
fn decode_action(map: &RuleMap<'_>) -> Result<Option<Action>, ConfigError> {
    use serde_yaml::Value;

    let Some(value) = map.get("action") else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(name) => Ok(Some(Action {
            name: name.clone(),
            params: Vec::new(),
        })),
        Value::Mapping(m) => {
            let mut action = Action::default();
            for (key, value) in m {
                match (key.as_str(), value) {
                    (Some("name"), Value::String(s)) => action.name = s.clone(),
                    (Some("params"), Value::String(s)) => action.params.push(s.clone()),
                    (Some("params"), Value::Sequence(seq)) => {
                        for item in seq {
                            match item {
                                Value::String(s) => action.params.push(s.clone()),
                                _ => {
                                    return Err(map.err("action", "params must be strings"));
                                }
                            }
                        }
                    }
                    _ => return Err(map.err("action", "unknown action field")),
                }
            }
            Ok(Some(action))
        }
        _ => Err(map.err("action", "expected a string or mapping")),
    }
}

/// Fills `%s` holes in a message template, left to right. Extra holes are
/// left in place; extra arguments are dropped.
pub fn fill_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}
