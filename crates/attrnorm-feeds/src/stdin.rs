//! Stdin source — reads raw pairs piped in from an upstream scraper.

use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::{read_pairs, FeedError, FeedSummary, InputFormat, RawPair};

pub async fn read(format: InputFormat, tx: &mpsc::Sender<RawPair>) -> Result<FeedSummary, FeedError> {
    tracing::debug!(?format, "reading pairs from stdin");
    read_pairs(BufReader::new(tokio::io::stdin()), format, tx).await
}
