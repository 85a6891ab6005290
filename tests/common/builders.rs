//! Test builders — engines, input text and on-disk input files.
//!
//! These are designed for readability in test assertions, not for production
//! use. They panic on invalid input rather than returning `Result`.

use attrnorm_core::{AttributeType, Engine, RuleTable};
use std::path::{Path, PathBuf};

/// The engine over the built-in rule table.
pub fn engine() -> Engine {
    Engine::builtin().expect("built-in rule table must be valid")
}

/// The built-in engine plus extra aliases, collisions rejected.
pub fn engine_with_aliases(aliases: &[(AttributeType, &str)]) -> Engine {
    let builder = aliases.iter().fold(
        RuleTable::builtin_builder().expect("built-in rules must compile"),
        |builder, (ty, alias)| builder.alias(*ty, alias),
    );
    Engine::new(builder.build().expect("aliases must not collide"))
}

/// Render rows as TSV input text.
pub fn tsv_input(rows: &[(&str, &str)]) -> String {
    rows.iter().map(|(k, v)| format!("{k}\t{v}\n")).collect()
}

/// Render rows as JSON-lines input text.
pub fn jsonl_input(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(k, v)| format!("{}\n", serde_json::json!({ "key": k, "value": v })))
        .collect()
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write test input");
    path
}
