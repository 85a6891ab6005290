//! Domain-specific assertion macros for attrnorm harnesses.
//!
//! These add context-rich failure messages that make it clear which row was
//! classified and what came back instead.

use attrnorm_core::{Engine, Outcome};

/// Assert that a row normalizes to the given type and canonical value.
///
/// ```rust
/// assert_normalizes!(engine, "TDP", "115W", AttributeType::Power, "115");
/// ```
#[macro_export]
macro_rules! assert_normalizes {
    ($engine:expr, $key:expr, $value:expr, $ty:expr, $canonical:expr) => {{
        let engine: &attrnorm_core::Engine = &$engine;
        let (key, value): (&str, &str) = ($key, $value);
        let expected = attrnorm_core::NormalizedAttribute::new($ty, $canonical);
        match engine.classify(key, value) {
            attrnorm_core::Outcome::Recognized(actual) if actual == expected => {}
            other => panic!(
                "assert_normalizes! failed for ({:?}, {:?}):\n  expected: {}\n  actual:   {:?}",
                key, value, expected, other
            ),
        }
    }};
}

/// Assert that no rule claims the row's key.
#[macro_export]
macro_rules! assert_unrecognized_key {
    ($engine:expr, $key:expr, $value:expr) => {{
        let engine: &attrnorm_core::Engine = &$engine;
        let (key, value): (&str, &str) = ($key, $value);
        let outcome = engine.classify(key, value);
        if outcome != attrnorm_core::Outcome::UnrecognizedKey {
            panic!(
                "assert_unrecognized_key! failed for ({:?}, {:?}): got {:?}",
                key, value, outcome
            );
        }
    }};
}

/// Assert that a rule claims the key but rejects the value.
#[macro_export]
macro_rules! assert_malformed {
    ($engine:expr, $key:expr, $value:expr) => {{
        let engine: &attrnorm_core::Engine = &$engine;
        let (key, value): (&str, &str) = ($key, $value);
        let outcome = engine.classify(key, value);
        if !matches!(outcome, attrnorm_core::Outcome::MalformedValue { .. }) {
            panic!(
                "assert_malformed! failed for ({:?}, {:?}): got {:?}",
                key, value, outcome
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Snapshot helpers
// ---------------------------------------------------------------------------

/// Render classified rows one per line: `type=value` for recognized rows,
/// `"key": reason` otherwise.
pub fn render_outcomes(engine: &Engine, rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(k, v)| match engine.classify(k, v) {
            Outcome::Recognized(attr) => attr.to_string(),
            other => format!("{k:?}: {}", other.reason()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
