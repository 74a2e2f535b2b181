//! Vocabulary files: user wordlists that suppress or trigger alerts.
//!
//! A vocabulary lives under `<StylesPath>/Vocab/<Name>/` as `accept.txt`
//! and `reject.txt`, one token per line. Accepted tokens become exceptions
//! for the spelling, capitalization, and conditional kinds; rejected tokens
//! compile into an implicit existence rule.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::LintError;

/// Accepted and rejected token sets for a lint session.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    /// Tokens the user has whitelisted.
    pub accepted: BTreeSet<String>,
    /// Tokens the user has banned outright.
    pub rejected: BTreeSet<String>,
}

impl Vocab {
    /// Loads the named vocabularies from `<styles_path>/Vocab/`.
    ///
    /// Missing directories are an error; missing `accept.txt` or
    /// `reject.txt` inside an existing vocabulary are not.
    pub fn load(styles_path: &Path, names: &[String]) -> Result<Self, LintError> {
        let mut vocab = Vocab::default();
        for name in names {
            let dir = styles_path.join("Vocab").join(name);
            if !dir.is_dir() {
                return Err(LintError::runtime(format!(
                    "vocabulary '{}' not found under {}",
                    name,
                    styles_path.join("Vocab").display()
                )));
            }
            read_wordlist(&dir.join("accept.txt"), &mut vocab.accepted)?;
            read_wordlist(&dir.join("reject.txt"), &mut vocab.rejected)?;
        }
        debug!(
            accepted = vocab.accepted.len(),
            rejected = vocab.rejected.len(),
            "loaded vocabulary"
        );
        Ok(vocab)
    }
}

fn read_wordlist(path: &Path, into: &mut BTreeSet<String>) -> Result<(), LintError> {
    if !path.is_file() {
        return Ok(());
    }
    let content = fs::read_to_string(path)?;
    for line in content.lines() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        into.insert(token.to_string());
    }
    Ok(())
}
