//! attrnorm — normalizes scraped specification-table rows.
//!
//! The engine lives in [`attrnorm_core`] and the raw pair sources in
//! [`attrnorm_feeds`]. This crate wires them together for the CLI and exposes
//! the wiring as public modules so integration tests can drive it directly.
//!
//! # Architecture
//!
//! ```text
//! Source ──► mpsc ──► Engine::classify ──► Record ──► JSON lines
//!                            │
//!                            └──► Tally (recognized / unrecognized / malformed)
//! ```

pub mod output;
pub mod pipeline;

pub use attrnorm_core::{AttributeType, Engine, NormalizedAttribute, Outcome};
pub use attrnorm_feeds::{InputFormat, RawPair, Source};
