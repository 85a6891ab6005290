//! Output records and human-readable renderings for the CLI.

use std::fmt::Write as _;

use attrnorm_core::{normalize_key, Engine, NormalizedAttribute, Outcome, RuleTable};
use attrnorm_feeds::RawPair;
use serde::Serialize;

/// One JSON line of `attrnorm normalize` output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Record<'a> {
    /// Default mode: just the `(type, value)` record.
    Attribute(&'a NormalizedAttribute),
    /// `--audit` mode: the raw pair with its outcome attached.
    Audit(AuditRecord<'a>),
}

/// The raw pair is kept under `raw_*` names so it never clashes with the
/// canonical `value` of a recognized outcome.
#[derive(Debug, Serialize)]
pub struct AuditRecord<'a> {
    pub line: u64,
    pub raw_key: &'a str,
    pub raw_value: &'a str,
    #[serde(flatten)]
    pub outcome: &'a Outcome,
}

impl<'a> Record<'a> {
    /// The record to emit for a classified pair, if any.
    pub fn new(pair: &'a RawPair, outcome: &'a Outcome, audit: bool) -> Option<Self> {
        if audit {
            return Some(Record::Audit(AuditRecord {
                line: pair.line,
                raw_key: &pair.key,
                raw_value: &pair.value,
                outcome,
            }));
        }
        outcome.attribute().map(Record::Attribute)
    }
}

/// Text shown by `attrnorm check`.
pub fn render_check(engine: &Engine, key: &str, value: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "key:      {key:?} (normalized {:?})", normalize_key(key));
    match engine.rules().resolve(key) {
        Some(rule) => {
            let _ = writeln!(out, "rule:     {} via {}", rule.attribute_type, rule.extractor);
        }
        None => {
            let _ = writeln!(out, "rule:     none");
        }
    }
    let outcome = engine.classify(key, value);
    let _ = writeln!(out, "outcome:  {}", outcome.reason());
    if let Some(attr) = outcome.attribute() {
        let _ = writeln!(out, "value:    {:?}", attr.value);
    }
    out
}

/// Text shown by `attrnorm rules`: one line per rule, in resolution order.
pub fn render_rules(table: &RuleTable) -> String {
    let mut out = String::new();
    for (i, rule) in table.rules().iter().enumerate() {
        let matchers = rule
            .key_matchers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{:>2}. {:<20} {:<24} {}",
            i + 1,
            rule.attribute_type.as_str(),
            rule.extractor.to_string(),
            matchers
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
