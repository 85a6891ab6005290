//! Pipeline — feed ──► engine ──► JSON-lines writer.
//!
//! The feed runs on its own tokio task and hands pairs over a bounded
//! channel; classification itself is synchronous and happens on the
//! receiving side. Each non-extraction is logged with its reason so a high
//! miss rate can be traced back to the keys and values behind it.

use std::collections::BTreeMap;
use std::io::Write;

use attrnorm_core::{AttributeType, Engine, Outcome};
use attrnorm_feeds::{FeedSummary, InputFormat, RawPair, Source};
use tokio::sync::mpsc;

use crate::output::Record;

const CHANNEL_CAPACITY: usize = 1024;

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub recognized: u64,
    pub unrecognized_key: u64,
    pub malformed_value: u64,
    pub by_type: BTreeMap<AttributeType, u64>,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Recognized(attr) => {
                self.recognized += 1;
                *self.by_type.entry(attr.attribute_type).or_default() += 1;
            }
            Outcome::UnrecognizedKey => self.unrecognized_key += 1,
            Outcome::MalformedValue { .. } => self.malformed_value += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.recognized + self.unrecognized_key + self.malformed_value
    }

    /// Share of pairs that produced no attribute, in `0.0..=1.0`. Zero for an
    /// empty run.
    pub fn non_extraction_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (total - self.recognized) as f64 / total as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub feed: FeedSummary,
    pub tally: Tally,
}

/// Read every pair from `source`, classify it, and write one JSON line per
/// emitted record to `out`. Without `audit` only recognized pairs are written.
pub async fn run<W: Write>(
    engine: &Engine,
    source: Source,
    format: InputFormat,
    audit: bool,
    out: &mut W,
) -> anyhow::Result<RunSummary> {
    let (tx, mut rx) = mpsc::channel::<RawPair>(CHANNEL_CAPACITY);
    tracing::debug!(%source, ?format, audit, "pipeline starting");
    let feed = tokio::spawn(source.run(format, tx));

    let mut tally = Tally::default();
    while let Some(pair) = rx.recv().await {
        let outcome = engine.classify(&pair.key, &pair.value);
        log_outcome(&pair, &outcome);
        tally.record(&outcome);

        if let Some(record) = Record::new(&pair, &outcome, audit) {
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
        }
    }

    let feed = feed.await??;
    Ok(RunSummary { feed, tally })
}

fn log_outcome(pair: &RawPair, outcome: &Outcome) {
    match outcome {
        Outcome::Recognized(attr) => {
            tracing::trace!(line = pair.line, %attr, "recognized");
        }
        Outcome::UnrecognizedKey => {
            tracing::trace!(line = pair.line, key = %pair.key, "unrecognized key");
        }
        Outcome::MalformedValue { attribute_type } => {
            tracing::debug!(
                line = pair.line,
                key = %pair.key,
                value = %pair.value,
                %attribute_type,
                "recognized key, malformed value"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
