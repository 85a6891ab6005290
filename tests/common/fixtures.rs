//! Static row corpora used across harnesses.
//!
//! Each corpus is a `&'static [(&'static str, &'static str)]` of raw
//! `(key, value)` rows as an upstream scraper would hand them over.

/// A GPU infobox where every row is recognized, one per attribute type.
pub const ROWS_GPU: &[(&str, &str)] = &[
    ("Release date", "October 12, 2022; 3 years ago(2022-10-12)"),
    ("Manufactured by", "TSMC"),
    ("Designed by", "Nvidia"),
    ("Marketed by", "Nvidia"),
    ("Codename", "AD10x"),
    ("Architecture", "Ada Lovelace"),
    ("Transistors", "18.9B (AD107)"),
    ("Fabrication process", "TSMC 4N"),
    ("Interface", "PCIe 4.0 x8"),
    ("Memory type", "GDDR6"),
    ("Memory bus", "128-bit"),
    ("TDP", "115W"),
];

/// Rows whose key no rule claims.
pub const ROWS_UNRECOGNIZED: &[(&str, &str)] = &[
    ("Random Field", "some unrelated text"),
    ("Successor", "GeForce 50 series"),
    ("Cores", "3072"),
    ("", ""),
    ("Website[1]", "nvidia.com"),
];

/// Rows with a recognized key and a value the rule's extractor rejects.
pub const ROWS_MALFORMED: &[(&str, &str)] = &[
    ("Release date", "TBA"),
    ("Codename", "Ampere"),
    ("Memory bus", "wide"),
    ("Power consumption", "see footnote[4]"),
];

/// A second card, using alternative key phrasings.
pub const ROWS_ALIASES: &[(&str, &str)] = &[
    ("Launch date", "September 1, 2020"),
    ("Manufacturer", "Samsung"),
    ("Code name", "GA104-300-A1"),
    ("Microarchitecture", "Ampere"),
    ("Number of transistors", "17,400 million"),
    ("Process", "Samsung 8N"),
    ("Bus interface", "PCIe 4.0 x16"),
    ("Memory bus width", "256 bit"),
    ("Power consumption", "220 W"),
];

/// One key per attribute type, used for boundary checks.
pub const ONE_KEY_PER_TYPE: &[&str] = &[
    "Manufactured by",
    "Designed by",
    "Marketed by",
    "Codename",
    "Architecture",
    "Release date",
    "Transistors",
    "Fabrication process",
    "Interface",
    "Memory type",
    "Memory bus",
    "TDP",
];

/// Every fixture row, in a fixed order: GPU, unrecognized, malformed.
pub fn corpus_mixed() -> Vec<(&'static str, &'static str)> {
    ROWS_GPU
        .iter()
        .chain(ROWS_UNRECOGNIZED)
        .chain(ROWS_MALFORMED)
        .copied()
        .collect()
}
