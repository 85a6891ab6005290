//! attrnorm-feeds — raw pair sources for attrnorm.
//!
//! Each source reads lines from stdin or a file, parses them as
//! [`InputFormat::Tsv`] or [`InputFormat::JsonLines`], and pushes [`RawPair`]
//! values onto an async channel for the normalizer. Malformed lines are
//! logged and counted, never fatal.

pub mod file;
pub mod format;
pub mod stdin;

pub use attrnorm_core::config::InputFormat;
pub use format::parse_line;

use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// One raw `(key, value)` row as produced by the upstream scraper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub key: String,
    pub value: String,
    /// 1-based input line number.
    pub line: u64,
}

impl RawPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>, line: u64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            line,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    MalformedLine { line: u64, reason: String },

    #[error("pair channel closed before the feed finished")]
    ChannelClosed,
}

/// Per-feed line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Lines turned into pairs and sent.
    pub pairs: u64,
    /// Blank and comment lines.
    pub skipped: u64,
    /// Lines that could not be parsed.
    pub malformed: u64,
}

/// Where raw pairs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Read the whole source, sending each pair on `tx`.
    pub async fn run(
        self,
        format: InputFormat,
        tx: mpsc::Sender<RawPair>,
    ) -> Result<FeedSummary, FeedError> {
        match self {
            Source::Stdin => stdin::read(format, &tx).await,
            Source::File(path) => file::read(&path, format, &tx).await,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Stdin => write!(f, "stdin"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Shared line loop behind every source.
pub async fn read_pairs<R>(
    reader: R,
    format: InputFormat,
    tx: &mpsc::Sender<RawPair>,
) -> Result<FeedSummary, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = FeedSummary::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match parse_line(&line, line_no, format) {
            Ok(Some(pair)) => {
                tx.send(pair).await.map_err(|_| FeedError::ChannelClosed)?;
                summary.pairs += 1;
            }
            Ok(None) => summary.skipped += 1,
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "skipping malformed input line");
                summary.malformed += 1;
            }
        }
    }

    tracing::debug!(
        pairs = summary.pairs,
        skipped = summary.skipped,
        malformed = summary.malformed,
        "feed finished"
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
