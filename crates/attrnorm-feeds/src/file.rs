//! File source — reads raw pairs from a TSV or JSON-lines file on disk.

use std::path::Path;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::{read_pairs, FeedError, FeedSummary, InputFormat, RawPair};

pub async fn read(
    path: &Path,
    format: InputFormat,
    tx: &mpsc::Sender<RawPair>,
) -> Result<FeedSummary, FeedError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), ?format, "reading pairs from file");
    read_pairs(BufReader::new(file), format, tx).await
}
