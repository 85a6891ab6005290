use thiserror::Error;

use crate::types::AttributeType;

/// Defects in a rule table, caught when the table is built.
///
/// These are configuration mistakes, not input errors: once a table exists,
/// classifying a pair can no longer fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleTableError {
    #[error("key alias {alias:?} is claimed by both {first} and {second}")]
    AliasCollision {
        alias: String,
        first: AttributeType,
        second: AttributeType,
    },

    #[error("empty key alias registered for {attribute_type}")]
    EmptyAlias { attribute_type: AttributeType },

    #[error("no rule handles {0}; cannot attach an alias to it")]
    NoRuleForType(AttributeType),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
