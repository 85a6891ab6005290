//! Rule table — ordered key-matcher → attribute type → extractor entries.
//!
//! Key resolution scans rules in registration order and stops at the first
//! rule with a matching alias or pattern, so the first-registered rule wins
//! whenever two rules could claim the same key. [`RuleTableBuilder::build`]
//! refuses to produce such a table; [`RuleTableBuilder::build_first_wins`]
//! keeps it and logs each shadowed alias.

use regex::Regex;

use crate::error::RuleTableError;
use crate::extract::{Extractor, Unit};
use crate::types::{AttributeType, NormalizedAttribute};

// ---------------------------------------------------------------------------
// Key normalization
// ---------------------------------------------------------------------------

/// Case-fold and trim a raw key, collapsing whitespace runs and dropping
/// trailing `:` and footnote markers (`Transistors[2]:` → `transistors`).
pub fn normalize_key(raw: &str) -> String {
    let mut key = raw.trim();
    loop {
        let before = key;
        key = key.trim_end_matches(':').trim_end();
        if key.ends_with(']') {
            if let Some(open) = key.rfind('[') {
                key = key[..open].trim_end();
            }
        }
        if key == before {
            break;
        }
    }
    key.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// KeyMatcher
// ---------------------------------------------------------------------------

/// How a rule recognizes a key. Both variants operate on the output of
/// [`normalize_key`].
#[derive(Debug, Clone)]
pub enum KeyMatcher {
    Alias(String),
    /// Anchored at both ends when compiled.
    Pattern(Regex),
}

impl KeyMatcher {
    pub fn alias(alias: &str) -> Self {
        KeyMatcher::Alias(normalize_key(alias))
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$")).map(KeyMatcher::Pattern)
    }

    pub fn matches(&self, normalized_key: &str) -> bool {
        match self {
            KeyMatcher::Alias(alias) => alias == normalized_key,
            KeyMatcher::Pattern(re) => re.is_match(normalized_key),
        }
    }
}

impl std::fmt::Display for KeyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMatcher::Alias(alias) => write!(f, "{alias:?}"),
            KeyMatcher::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// AttributeRule
// ---------------------------------------------------------------------------

/// One recognition unit.
#[derive(Debug, Clone)]
pub struct AttributeRule {
    pub attribute_type: AttributeType,
    pub key_matchers: Vec<KeyMatcher>,
    pub extractor: Extractor,
}

impl AttributeRule {
    pub fn new(attribute_type: AttributeType, extractor: Extractor) -> Self {
        Self {
            attribute_type,
            key_matchers: Vec::new(),
            extractor,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.key_matchers
            .extend(aliases.iter().map(|a| KeyMatcher::alias(a)));
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.key_matchers.push(KeyMatcher::pattern(pattern)?);
        Ok(self)
    }

    pub fn matches_key(&self, normalized_key: &str) -> bool {
        self.key_matchers.iter().any(|m| m.matches(normalized_key))
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.key_matchers.iter().filter_map(|m| match m {
            KeyMatcher::Alias(alias) => Some(alias.as_str()),
            KeyMatcher::Pattern(_) => None,
        })
    }

    fn patterns(&self) -> impl Iterator<Item = &Regex> {
        self.key_matchers.iter().filter_map(|m| match m {
            KeyMatcher::Pattern(re) => Some(re),
            KeyMatcher::Alias(_) => None,
        })
    }

    /// Run this rule's extractor over a raw value.
    pub fn extract(&self, raw_value: &str) -> Option<NormalizedAttribute> {
        self.extractor
            .extract(raw_value)
            .map(|value| NormalizedAttribute::new(self.attribute_type, value))
    }
}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// Immutable, validated set of rules.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AttributeRule>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// The built-in rule set.
    pub fn builtin() -> Result<Self, RuleTableError> {
        Self::builtin_builder()?.build()
    }

    /// A builder preloaded with the built-in rules, for adding aliases or
    /// rules before validation.
    pub fn builtin_builder() -> Result<RuleTableBuilder, RuleTableError> {
        builtin_rules()
    }

    /// Find the rule claiming `raw_key`, if any. The key is normalized first.
    pub fn resolve(&self, raw_key: &str) -> Option<&AttributeRule> {
        let key = normalize_key(raw_key);
        if key.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches_key(&key))
    }

    pub fn rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RuleTableBuilder
// ---------------------------------------------------------------------------

/// Accumulates rules and extra aliases, then validates them into a
/// [`RuleTable`].
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<AttributeRule>,
    extra_aliases: Vec<(AttributeType, String)>,
}

impl RuleTableBuilder {
    /// Append a rule. Registration order is resolution order.
    pub fn rule(mut self, rule: AttributeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Attach an extra alias to the first rule of `attribute_type`.
    pub fn alias(mut self, attribute_type: AttributeType, alias: &str) -> Self {
        self.extra_aliases
            .push((attribute_type, alias.to_string()));
        self
    }

    /// Build, rejecting any alias that more than one rule could claim.
    pub fn build(self) -> Result<RuleTable, RuleTableError> {
        let rules = self.assemble()?;
        match collisions(&rules).into_iter().next() {
            Some(collision) => Err(collision.into_error()),
            None => Ok(RuleTable { rules }),
        }
    }

    /// Build, letting the first-registered rule keep a contested alias. A
    /// later rule's copy of the alias is removed since it can never match.
    pub fn build_first_wins(self) -> Result<RuleTable, RuleTableError> {
        let mut rules = self.assemble()?;
        for collision in collisions(&rules) {
            tracing::warn!(
                alias = %collision.alias,
                kept = %collision.first,
                shadowed = %collision.second,
                "key alias collision; first-registered rule wins"
            );
            if let Some(index) = collision.shadowed_alias_rule {
                rules[index]
                    .key_matchers
                    .retain(|m| !matches!(m, KeyMatcher::Alias(a) if *a == collision.alias));
            }
        }
        Ok(RuleTable { rules })
    }

    fn assemble(self) -> Result<Vec<AttributeRule>, RuleTableError> {
        let mut rules = self.rules;
        for (attribute_type, alias) in self.extra_aliases {
            let rule = rules
                .iter_mut()
                .find(|r| r.attribute_type == attribute_type)
                .ok_or(RuleTableError::NoRuleForType(attribute_type))?;
            rule.key_matchers.push(KeyMatcher::alias(&alias));
        }

        for rule in &mut rules {
            if rule.aliases().any(str::is_empty) {
                return Err(RuleTableError::EmptyAlias {
                    attribute_type: rule.attribute_type,
                });
            }
            // The same alias listed twice on one rule is harmless; keep one.
            let mut seen = Vec::new();
            rule.key_matchers.retain(|m| match m {
                KeyMatcher::Alias(a) if seen.contains(a) => false,
                KeyMatcher::Alias(a) => {
                    seen.push(a.clone());
                    true
                }
                KeyMatcher::Pattern(_) => true,
            });
        }
        Ok(rules)
    }
}

struct Collision {
    alias: String,
    first: AttributeType,
    second: AttributeType,
    /// Index of the later rule whose own alias is shadowed, if the later
    /// claim is an alias rather than a pattern.
    shadowed_alias_rule: Option<usize>,
}

impl Collision {
    fn into_error(self) -> RuleTableError {
        RuleTableError::AliasCollision {
            alias: self.alias,
            first: self.first,
            second: self.second,
        }
    }
}

/// Every alias that some other rule could also claim, in rule order.
fn collisions(rules: &[AttributeRule]) -> Vec<Collision> {
    let mut found = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        // A later alias already claimed by an earlier alias or pattern.
        for alias in rule.aliases() {
            if let Some(earlier) = rules[..i].iter().find(|r| r.matches_key(alias)) {
                found.push(Collision {
                    alias: alias.to_string(),
                    first: earlier.attribute_type,
                    second: rule.attribute_type,
                    shadowed_alias_rule: Some(i),
                });
            }
        }
        // An earlier alias that a later pattern would also match.
        for alias in rule.aliases() {
            if let Some(later) = rules[i + 1..]
                .iter()
                .find(|r| r.patterns().any(|re| re.is_match(alias)))
            {
                found.push(Collision {
                    alias: alias.to_string(),
                    first: rule.attribute_type,
                    second: later.attribute_type,
                    shadowed_alias_rule: None,
                });
            }
        }
    }
    found
}

// ---------------------------------------------------------------------------
// Built-in rules
// ---------------------------------------------------------------------------

/// Uppercase-led code containing a digit (`AD10x`, `GA107`), followed by the
/// end of the value or a list/qualifier separator.
const CODENAME: &str = r"^(?P<value>[A-Z][A-Z0-9]*[0-9][A-Za-z0-9]*)(?:$|[\s,;/(\[-])";

/// Capitalized word plus an optional second word (`Ada Lovelace`, `Ampere`).
const ARCHITECTURE_WORDS: &str = r"^(?P<value>[A-Z][A-Za-z]*(?:\s+[A-Za-z]+)?)$";

/// Capitalized word plus a numeral (`RDNA 2`, `RDNA 3.5`).
const ARCHITECTURE_NUMBERED: &str = r"^(?P<value>[A-Z][A-Za-z]*\s+[0-9]+(?:\.[0-9]+)?)$";

fn builtin_rules() -> Result<RuleTableBuilder, RuleTableError> {
    use AttributeType::*;

    Ok(RuleTable::builder()
        .rule(AttributeRule::new(Manufacturer, Extractor::Trim).with_aliases(&[
            "manufacturer",
            "manufacturers",
            "manufactured by",
        ]))
        .rule(AttributeRule::new(Designer, Extractor::Trim).with_aliases(&["designer", "designed by"]))
        .rule(AttributeRule::new(Marketer, Extractor::Trim).with_aliases(&["marketer", "marketed by"]))
        .rule(
            AttributeRule::new(Codename, Extractor::capture(&[CODENAME])?)
                .with_aliases(&["codename", "code name", "codenames", "code names"]),
        )
        .rule(
            AttributeRule::new(
                Architecture,
                Extractor::capture(&[ARCHITECTURE_WORDS, ARCHITECTURE_NUMBERED])?,
            )
            .with_aliases(&["architecture", "microarchitecture", "micro-architecture"]),
        )
        .rule(AttributeRule::new(ReleaseDate, Extractor::date()?).with_aliases(&[
            "release date",
            "released",
            "launch date",
            "launched",
        ]))
        .rule(
            AttributeRule::new(TransistorCount, Extractor::quantity(Unit::Magnitude)?)
                .with_pattern(r"(?:number of |no\. of )?transistors?(?: count)?")?,
        )
        .rule(
            AttributeRule::new(FabricationProcess, Extractor::Trim).with_aliases(&[
                "fabrication process",
                "process",
                "process node",
                "fab process",
            ]),
        )
        .rule(AttributeRule::new(Interface, Extractor::Trim).with_aliases(&[
            "interface",
            "bus interface",
            "host interface",
        ]))
        .rule(
            AttributeRule::new(MemoryType, Extractor::Trim)
                .with_aliases(&["memory type", "ram type", "vram type"]),
        )
        .rule(
            AttributeRule::new(MemoryBusWidth, Extractor::quantity(Unit::Bits)?)
                .with_aliases(&["memory bus", "memory bus width", "bus width"]),
        )
        .rule(
            AttributeRule::new(Power, Extractor::quantity(Unit::Watts)?).with_aliases(&[
                "tdp",
                "power consumption",
                "thermal design power",
                "total board power",
                "tbp",
            ]),
        ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("  Release Date  ", "release date")]
    #[case("Memory\tbus", "memory bus")]
    #[case("Transistors[2]", "transistors")]
    #[case("TDP:", "tdp")]
    #[case("Codename[a][3]:", "codename")]
    #[case("", "")]
    #[case("[1]", "")]
    fn key_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(raw), expected);
    }

    #[test]
    fn builtin_table_covers_every_attribute_type() {
        let table = RuleTable::builtin().unwrap();
        for ty in AttributeType::ALL {
            assert!(
                table.rules().iter().any(|r| r.attribute_type == ty),
                "no builtin rule for {ty}"
            );
        }
        assert_eq!(table.len(), AttributeType::ALL.len());
    }

    #[rstest]
    #[case("TDP", AttributeType::Power)]
    #[case("Power consumption", AttributeType::Power)]
    #[case("Manufactured by", AttributeType::Manufacturer)]
    #[case("Designed by", AttributeType::Designer)]
    #[case("Interface", AttributeType::Interface)]
    #[case("Bus interface", AttributeType::Interface)]
    #[case("Transistors", AttributeType::TransistorCount)]
    #[case("Number of transistors", AttributeType::TransistorCount)]
    #[case("Memory bus", AttributeType::MemoryBusWidth)]
    fn builtin_aliases_resolve(#[case] key: &str, #[case] expected: AttributeType) {
        let table = RuleTable::builtin().unwrap();
        assert_eq!(table.resolve(key).map(|r| r.attribute_type), Some(expected));
    }

    #[test]
    fn unknown_and_empty_keys_do_not_resolve() {
        let table = RuleTable::builtin().unwrap();
        assert!(table.resolve("Random Field").is_none());
        assert!(table.resolve("").is_none());
        assert!(table.resolve("   ").is_none());
    }

    #[test]
    fn pattern_matchers_are_anchored() {
        let matcher = KeyMatcher::pattern("transistors?").unwrap();
        assert!(matcher.matches("transistors"));
        assert!(!matcher.matches("transistors per mm2"));
    }

    #[test]
    fn duplicate_alias_across_rules_is_rejected() {
        let err = RuleTable::builder()
            .rule(AttributeRule::new(AttributeType::Power, Extractor::Trim).with_aliases(&["tdp"]))
            .rule(AttributeRule::new(AttributeType::Designer, Extractor::Trim).with_aliases(&["TDP"]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleTableError::AliasCollision {
                alias: "tdp".to_string(),
                first: AttributeType::Power,
                second: AttributeType::Designer,
            }
        );
    }

    #[test]
    fn alias_shadowed_by_later_pattern_is_rejected() {
        let err = RuleTable::builder()
            .rule(AttributeRule::new(AttributeType::Codename, Extractor::Trim).with_aliases(&["chip"]))
            .rule(
                AttributeRule::new(AttributeType::Architecture, Extractor::Trim)
                    .with_pattern("chips?")
                    .unwrap(),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::AliasCollision { ref alias, first: AttributeType::Codename, .. } if alias == "chip"
        ));
    }

    #[test]
    fn first_registered_rule_wins_when_collisions_are_allowed() {
        let table = RuleTable::builder()
            .rule(AttributeRule::new(AttributeType::Power, Extractor::Trim).with_aliases(&["tdp"]))
            .rule(
                AttributeRule::new(AttributeType::Designer, Extractor::Trim)
                    .with_aliases(&["tdp", "designed by"]),
            )
            .build_first_wins()
            .unwrap();

        assert_eq!(table.resolve("TDP").unwrap().attribute_type, AttributeType::Power);
        let designer = &table.rules()[1];
        assert_eq!(designer.aliases().collect::<Vec<_>>(), vec!["designed by"]);
    }

    #[test]
    fn extra_alias_attaches_to_existing_rule() {
        let table = RuleTable::builtin_builder()
            .unwrap()
            .alias(AttributeType::Power, "Max. power draw")
            .build()
            .unwrap();
        assert_eq!(
            table.resolve("max. power draw").unwrap().attribute_type,
            AttributeType::Power
        );
    }

    #[test]
    fn extra_alias_colliding_with_builtin_is_rejected() {
        let err = RuleTable::builtin_builder()
            .unwrap()
            .alias(AttributeType::Designer, "TDP")
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleTableError::AliasCollision { .. }));
    }

    #[test]
    fn extra_alias_without_rule_is_rejected() {
        let err = RuleTable::builder()
            .alias(AttributeType::Power, "tdp")
            .build()
            .unwrap_err();
        assert_eq!(err, RuleTableError::NoRuleForType(AttributeType::Power));
    }

    #[test]
    fn empty_alias_is_rejected() {
        let err = RuleTable::builder()
            .rule(AttributeRule::new(AttributeType::Power, Extractor::Trim).with_aliases(&["  "]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleTableError::EmptyAlias {
                attribute_type: AttributeType::Power
            }
        );
    }

    #[test]
    fn repeated_alias_on_one_rule_is_not_a_collision() {
        let table = RuleTable::builder()
            .rule(AttributeRule::new(AttributeType::Power, Extractor::Trim).with_aliases(&["tdp", "TDP"]))
            .build()
            .unwrap();
        assert_eq!(table.rules()[0].aliases().count(), 1);
    }
}
