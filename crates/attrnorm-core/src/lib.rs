//! attrnorm-core — attribute normalization engine.
//!
//! Turns noisy `(key, value)` rows scraped from specification tables into
//! typed [`NormalizedAttribute`] records, or into nothing at all when a row is
//! not recognized.
//!
//! # Architecture
//!
//! ```text
//! raw key ──► normalize_key ──► RuleTable::resolve ──► AttributeRule
//!                                                          │
//! raw value ─────────────────────────────────► Extractor ──┴──► Outcome
//! ```
//!
//! The rule table is data: adding an attribute phrasing means appending an
//! alias or a rule, never editing the engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod rules;
pub mod types;

pub use engine::Engine;
pub use error::RuleTableError;
pub use extract::{Extractor, Unit};
pub use rules::{normalize_key, AttributeRule, KeyMatcher, RuleTable, RuleTableBuilder};
pub use types::{AttributeType, NormalizedAttribute, Outcome};
