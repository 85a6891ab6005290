//! Normalization engine — classifies one raw `(key, value)` pair at a time.
//!
//! Resolution is attempted in order: key → rule → extractor. An unresolved
//! key short-circuits before any extractor runs.
//!
//! The engine owns nothing but an immutable [`RuleTable`]. It is `Send + Sync`
//! and every call is a pure function of the table and the input, so one
//! instance can be shared (behind an `Arc` or a plain reference) by any
//! number of threads or tasks.

use crate::config::{CollisionPolicy, Config, ConfigError};
use crate::error::RuleTableError;
use crate::rules::RuleTable;
use crate::types::{NormalizedAttribute, Outcome};

#[derive(Debug, Clone)]
pub struct Engine {
    table: RuleTable,
}

impl Engine {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// Engine over the built-in rule set.
    pub fn builtin() -> Result<Self, RuleTableError> {
        RuleTable::builtin().map(Self::new)
    }

    /// Engine over the built-in rule set plus the config's extra aliases,
    /// validated under the config's collision policy.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let builder = config
            .extra_aliases()?
            .into_iter()
            .fold(RuleTable::builtin_builder()?, |builder, (ty, alias)| {
                builder.alias(ty, &alias)
            });
        let table = match config.engine.collisions {
            CollisionPolicy::Reject => builder.build()?,
            CollisionPolicy::FirstWins => builder.build_first_wins()?,
        };
        Ok(Self::new(table))
    }

    pub fn rules(&self) -> &RuleTable {
        &self.table
    }

    /// Classify a raw pair, keeping the reason for a non-extraction.
    pub fn classify(&self, key: &str, value: &str) -> Outcome {
        let Some(rule) = self.table.resolve(key) else {
            return Outcome::UnrecognizedKey;
        };
        match rule.extract(value) {
            Some(attr) => Outcome::Recognized(attr),
            None => Outcome::MalformedValue {
                attribute_type: rule.attribute_type,
            },
        }
    }

    /// Normalize a raw pair. `None` covers both an unrecognized key and a
    /// recognized key whose value does not parse.
    pub fn normalize(&self, key: &str, value: &str) -> Option<NormalizedAttribute> {
        self.classify(key, value).into_attribute()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AliasConfig;
    use crate::types::AttributeType;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine {
        Engine::builtin().unwrap()
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn classify_distinguishes_failure_reasons() {
        let e = engine();
        assert_eq!(e.classify("Random Field", "115W"), Outcome::UnrecognizedKey);
        assert_eq!(
            e.classify("TDP", "unknown"),
            Outcome::MalformedValue {
                attribute_type: AttributeType::Power
            }
        );
        assert_eq!(
            e.classify("TDP", "115W"),
            Outcome::Recognized(NormalizedAttribute::new(AttributeType::Power, "115"))
        );
    }

    #[test]
    fn normalize_collapses_failures_to_none() {
        let e = engine();
        assert_eq!(e.normalize("Random Field", "115W"), None);
        assert_eq!(e.normalize("TDP", "unknown"), None);
    }

    #[test]
    fn config_aliases_extend_the_table() {
        let mut cfg = Config::defaults();
        cfg.aliases.push(AliasConfig {
            alias: "Thermal envelope".to_string(),
            attribute_type: "power".to_string(),
        });
        let e = Engine::from_config(&cfg).unwrap();
        assert_eq!(
            e.normalize("thermal envelope", "65 W"),
            Some(NormalizedAttribute::new(AttributeType::Power, "65"))
        );
    }

    #[test]
    fn config_collision_policy_is_honoured() {
        let mut cfg = Config::defaults();
        cfg.aliases.push(AliasConfig {
            alias: "TDP".to_string(),
            attribute_type: "designer".to_string(),
        });
        assert!(matches!(
            Engine::from_config(&cfg),
            Err(ConfigError::Rules(RuleTableError::AliasCollision { .. }))
        ));

        cfg.engine.collisions = CollisionPolicy::FirstWins;
        let e = Engine::from_config(&cfg).unwrap();
        // The designer rule is registered before the power rule.
        assert_eq!(
            e.normalize("TDP", "115W"),
            Some(NormalizedAttribute::new(AttributeType::Designer, "115W"))
        );
    }
}
