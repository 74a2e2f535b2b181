//! `readability`: scores the whole document against a grade threshold.

use scribelint_text::{
    automated_readability_index, coleman_liau, flesch_kincaid_grade, gunning_fog, smog, TextStats,
};

use crate::error::ConfigError;
use crate::rule::compile::MatchOut;
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["grade", "metrics"];

/// The supported metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    GunningFog,
    ColemanLiau,
    FleschKincaid,
    Smog,
    AutomatedReadability,
}

impl Metric {
    fn parse(name: &str) -> Option<Metric> {
        let folded: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "gunningfog" => Some(Metric::GunningFog),
            "colemanliau" => Some(Metric::ColemanLiau),
            "fleschkincaid" => Some(Metric::FleschKincaid),
            "smog" => Some(Metric::Smog),
            "automatedreadability" | "automatedreadabilityindex" | "ari" => {
                Some(Metric::AutomatedReadability)
            }
            _ => None,
        }
    }

    fn score(&self, stats: &TextStats) -> f64 {
        match self {
            Metric::GunningFog => gunning_fog(stats),
            Metric::ColemanLiau => coleman_liau(stats),
            Metric::FleschKincaid => flesch_kincaid_grade(stats),
            Metric::Smog => smog(stats),
            Metric::AutomatedReadability => automated_readability_index(stats),
        }
    }
}

/// Decoded `readability` body.
#[derive(Debug, Clone)]
pub struct Readability {
    pub metrics: Vec<String>,
    pub grade: f64,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Readability, ConfigError> {
    let body = Readability {
        metrics: map.str_list("metrics")?,
        grade: map
            .f64("grade")?
            .ok_or_else(|| map.err("grade", "readability requires 'grade'"))?,
    };
    if body.metrics.is_empty() {
        return Err(map.err("metrics", "readability requires at least one metric"));
    }
    Ok(body)
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    metrics: Vec<Metric>,
    grade: f64,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Readability) -> Result<Self, ConfigError> {
        let mut metrics = Vec::with_capacity(body.metrics.len());
        for name in &body.metrics {
            match Metric::parse(name) {
                Some(m) => metrics.push(m),
                None => return Err(map.err(name, format!("unknown metric '{name}'"))),
            }
        }
        Ok(Self {
            metrics,
            grade: body.grade,
        })
    }

    /// Runs once per document over its concatenated prose; the alert, if
    /// any, is document-level (anchored at the start).
    pub fn check_document(&self, prose: &str) -> Option<MatchOut> {
        let stats = TextStats::compute(prose);
        if stats.words == 0 {
            return None;
        }

        let total: f64 = self.metrics.iter().map(|m| m.score(&stats)).sum();
        let average = total / self.metrics.len() as f64;

        if average >= self.grade {
            Some(MatchOut::new(0, 0, "").with_args(vec![format!("{average:.2}")]))
        } else {
            None
        }
    }
}
