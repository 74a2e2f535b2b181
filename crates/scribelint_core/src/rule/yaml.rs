//! Typed access to a rule file's YAML mapping.
//!
//! Each rule kind has its own decoder; these helpers turn "wrong type" and
//! "missing key" failures into positioned configuration errors instead of
//! opaque serde messages.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// A rule file's top-level mapping plus the context needed for error
/// reporting.
pub struct RuleMap<'a> {
    map: &'a Mapping,
    file: &'a Path,
}

impl<'a> RuleMap<'a> {
    pub fn new(map: &'a Mapping, file: &'a Path) -> Self {
        Self { map, file }
    }

    pub fn err(&self, token: &str, message: impl Into<String>) -> ConfigError {
        ConfigError::new(self.file, token, message)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Returns every key in the mapping, for unknown-key validation.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.map.keys().map(|k| match k {
            Value::String(s) => s.clone(),
            other => format!("{other:?}"),
        })
    }

    pub fn str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.err(key, "expected a string")),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<String, ConfigError> {
        self.str(key)?
            .ok_or_else(|| self.err(key, format!("missing required key '{key}'")))
    }

    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.err(key, "expected a boolean")),
        }
    }

    pub fn usize(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|v| Some(v as usize))
                .ok_or_else(|| self.err(key, "expected a non-negative integer")),
            Some(_) => Err(self.err(key, "expected an integer")),
        }
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(_) => Err(self.err(key, "expected a number")),
        }
    }

    pub fn str_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(seq)) => seq
                .iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err(self.err(key, "expected a list of strings")),
                })
                .collect(),
            Some(_) => Err(self.err(key, "expected a list")),
        }
    }

    /// Accepts either a single string or a list of strings.
    pub fn str_or_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            _ => self.str_list(key),
        }
    }

    /// Returns a mapping's entries as ordered `(key, value)` string pairs.
    pub fn pairs(&self, key: &str) -> Result<Vec<(String, String)>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Mapping(map)) => map
                .iter()
                .map(|(k, v)| match (k, v) {
                    (Value::String(k), Value::String(v)) => Ok((k.clone(), v.clone())),
                    _ => Err(self.err(key, "expected a map of string pairs")),
                })
                .collect(),
            Some(_) => Err(self.err(key, "expected a map")),
        }
    }

    /// Returns a list of sub-mappings (for `sequence` tokens).
    pub fn map_list(&self, key: &str) -> Result<Vec<&'a Mapping>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(seq)) => seq
                .iter()
                .map(|v| match v {
                    Value::Mapping(m) => Ok(m),
                    _ => Err(self.err(key, "expected a list of mappings")),
                })
                .collect(),
            Some(_) => Err(self.err(key, "expected a list")),
        }
    }

}
