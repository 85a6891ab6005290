//! Core types for attrnorm-core.
//!
//! This module defines the closed [`AttributeType`] vocabulary, the
//! [`NormalizedAttribute`] record produced by the engine, and the [`Outcome`]
//! of a single classification.

use serde::Serialize;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// AttributeType
// ---------------------------------------------------------------------------

/// Canonical attribute tag. The set is closed: new phrasings are covered by
/// adding rules, never by adding ad-hoc tags at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Manufacturer,
    Designer,
    Marketer,
    Codename,
    Architecture,
    ReleaseDate,
    TransistorCount,
    FabricationProcess,
    Interface,
    MemoryType,
    MemoryBusWidth,
    Power,
}

static TAGS: phf::Map<&'static str, AttributeType> = phf::phf_map! {
    "manufacturer" => AttributeType::Manufacturer,
    "designer" => AttributeType::Designer,
    "marketer" => AttributeType::Marketer,
    "codename" => AttributeType::Codename,
    "architecture" => AttributeType::Architecture,
    "release_date" => AttributeType::ReleaseDate,
    "transistor_count" => AttributeType::TransistorCount,
    "fabrication_process" => AttributeType::FabricationProcess,
    "interface" => AttributeType::Interface,
    "memory_type" => AttributeType::MemoryType,
    "memory_bus_width" => AttributeType::MemoryBusWidth,
    "power" => AttributeType::Power,
};

impl AttributeType {
    /// Every tag, in declaration order.
    pub const ALL: [AttributeType; 12] = [
        AttributeType::Manufacturer,
        AttributeType::Designer,
        AttributeType::Marketer,
        AttributeType::Codename,
        AttributeType::Architecture,
        AttributeType::ReleaseDate,
        AttributeType::TransistorCount,
        AttributeType::FabricationProcess,
        AttributeType::Interface,
        AttributeType::MemoryType,
        AttributeType::MemoryBusWidth,
        AttributeType::Power,
    ];

    /// The snake_case tag used on the wire and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::Manufacturer => "manufacturer",
            AttributeType::Designer => "designer",
            AttributeType::Marketer => "marketer",
            AttributeType::Codename => "codename",
            AttributeType::Architecture => "architecture",
            AttributeType::ReleaseDate => "release_date",
            AttributeType::TransistorCount => "transistor_count",
            AttributeType::FabricationProcess => "fabrication_process",
            AttributeType::Interface => "interface",
            AttributeType::MemoryType => "memory_type",
            AttributeType::MemoryBusWidth => "memory_bus_width",
            AttributeType::Power => "power",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`AttributeType::from_str`] for a tag outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute type {0:?}")]
pub struct UnknownAttributeType(pub String);

impl FromStr for AttributeType {
    type Err = UnknownAttributeType;

    /// Accepts the snake_case tag case-insensitively; spaces and hyphens are
    /// read as underscores (`"Release date"` → `ReleaseDate`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        TAGS.get(tag.as_str())
            .copied()
            .ok_or_else(|| UnknownAttributeType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// NormalizedAttribute
// ---------------------------------------------------------------------------

/// A recognized attribute: canonical tag plus canonical value text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedAttribute {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub value: String,
}

impl NormalizedAttribute {
    pub fn new(attribute_type: AttributeType, value: impl Into<String>) -> Self {
        Self {
            attribute_type,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for NormalizedAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.attribute_type, self.value)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Diagnostic result of classifying one raw pair.
///
/// [`Engine::normalize`](crate::Engine::normalize) collapses both failure
/// variants into `None`; callers that need to tell them apart (tallies, debug
/// logging) use [`Engine::classify`](crate::Engine::classify) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Recognized(NormalizedAttribute),
    /// No rule claims the key. No extractor was run.
    UnrecognizedKey,
    /// A rule claimed the key but its extractor rejected the value.
    MalformedValue { attribute_type: AttributeType },
}

impl Outcome {
    pub fn attribute(&self) -> Option<&NormalizedAttribute> {
        match self {
            Outcome::Recognized(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn into_attribute(self) -> Option<NormalizedAttribute> {
        match self {
            Outcome::Recognized(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Outcome::Recognized(_))
    }

    /// Short human-readable reason, used in logs and `attrnorm check`.
    pub fn reason(&self) -> &'static str {
        match self {
            Outcome::Recognized(_) => "recognized",
            Outcome::UnrecognizedKey => "unrecognized key",
            Outcome::MalformedValue { .. } => "malformed value",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
