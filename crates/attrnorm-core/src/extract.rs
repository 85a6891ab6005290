//! Value extractors — the reusable transform primitives a rule points at.
//!
//! Every extractor maps raw value text to canonical value text or returns
//! `None`. None of them guess: if the expected shape is absent the value is
//! rejected.

use chrono::NaiveDate;
use regex::Regex;

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// A value transform. Rules own their extractor; compiled patterns live
/// inside the variant so the whole table is built (and can fail) once.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Trimmed pass-through. Empty values are rejected.
    Trim,
    /// First pattern that matches wins. The `value` group is taken if the
    /// pattern defines one, the whole match otherwise; whitespace runs in the
    /// capture are collapsed to single spaces.
    Capture(Vec<Regex>),
    /// Calendar date, canonicalised to `YYYY-MM-DD`.
    Date(DateParser),
    /// Leading number followed by a unit.
    Quantity(Quantity),
}

impl Extractor {
    /// Compile a [`Extractor::Capture`] from pattern sources, tried in order.
    pub fn capture(patterns: &[&str]) -> Result<Self, regex::Error> {
        patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()
            .map(Extractor::Capture)
    }

    pub fn date() -> Result<Self, regex::Error> {
        DateParser::new().map(Extractor::Date)
    }

    pub fn quantity(unit: Unit) -> Result<Self, regex::Error> {
        Quantity::new(unit).map(Extractor::Quantity)
    }

    /// Run the transform. `None` means the value does not have the shape this
    /// extractor expects.
    pub fn extract(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match self {
            Extractor::Trim => Some(raw.to_string()),
            Extractor::Capture(patterns) => patterns.iter().find_map(|re| {
                let caps = re.captures(raw)?;
                let m = caps.name("value").or_else(|| caps.get(0))?;
                let value = collapse_whitespace(m.as_str());
                (!value.is_empty()).then_some(value)
            }),
            Extractor::Date(parser) => parser.parse(raw),
            Extractor::Quantity(quantity) => quantity.parse(raw),
        }
    }
}

impl std::fmt::Display for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extractor::Trim => write!(f, "trim"),
            Extractor::Capture(patterns) => {
                write!(f, "capture(")?;
                for (i, re) in patterns.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "/{}/", re.as_str())?;
                }
                write!(f, ")")
            }
            Extractor::Date(_) => write!(f, "date"),
            Extractor::Quantity(q) => write!(f, "quantity({})", q.unit),
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Leading human-readable forms tried when no parenthetical ISO date exists.
const HUMAN_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y-%m-%d",
];

/// Release-date parser.
///
/// Scraped dates usually look like `October 12, 2022; 3 years ago(2022-10-12)`.
/// The parenthetical ISO form is preferred; otherwise the leading date is
/// parsed against [`HUMAN_DATE_FORMATS`] and whatever annotation follows it
/// is ignored.
#[derive(Debug, Clone)]
pub struct DateParser {
    iso: Regex,
}

impl DateParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            iso: Regex::new(r"\(\s*(?P<iso>[0-9]{4}-[0-9]{2}-[0-9]{2})\s*\)")?,
        })
    }

    pub fn parse(&self, raw: &str) -> Option<String> {
        let iso = self
            .iso
            .captures(raw)
            .and_then(|caps| NaiveDate::parse_from_str(&caps["iso"], "%Y-%m-%d").ok());
        let date = match iso {
            Some(date) => date,
            None => parse_leading_date(raw)?,
        };
        Some(date.format("%Y-%m-%d").to_string())
    }
}

fn parse_leading_date(raw: &str) -> Option<NaiveDate> {
    let head = collapse_whitespace(raw.trim());
    HUMAN_DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(&head, fmt).ok()?;
        ends_date(rest).then_some(date)
    })
}

/// The date must be followed by nothing, whitespace or a separator.
fn ends_date(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ',' | ';' | '(' | '[' | '-' | '–' | '—'),
    }
}

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// Unit expected after a leading number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// `115W`, `115 W`, `115 watts` → `115`.
    Watts,
    /// `128-bit`, `128 bit` → `128`.
    Bits,
    /// `18.9B`, `18.9 billion`, `76,300 million` → `18.9B`, `18.9B`, `76300M`.
    Magnitude,
}

impl Unit {
    fn pattern(self) -> &'static str {
        match self {
            Unit::Watts => r"^(?P<number>[0-9]+)\s?(?:W|(?i:watts?))\b",
            Unit::Bits => r"^(?P<number>[0-9]+)\s?-?\s?(?i:bits?)\b",
            Unit::Magnitude => {
                r"^(?P<number>[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+(?:\.[0-9]+)?)\s?(?P<suffix>(?i:thousand|million|billion|trillion|bn|k|m|b|t))\b"
            }
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Watts => write!(f, "watts"),
            Unit::Bits => write!(f, "bits"),
            Unit::Magnitude => write!(f, "magnitude"),
        }
    }
}

static MAGNITUDES: phf::Map<&'static str, char> = phf::phf_map! {
    "k" => 'K',
    "thousand" => 'K',
    "m" => 'M',
    "million" => 'M',
    "b" => 'B',
    "bn" => 'B',
    "billion" => 'B',
    "t" => 'T',
    "trillion" => 'T',
};

/// Numeric-with-unit extractor.
#[derive(Debug, Clone)]
pub struct Quantity {
    unit: Unit,
    pattern: Regex,
}

impl Quantity {
    pub fn new(unit: Unit) -> Result<Self, regex::Error> {
        Ok(Self {
            unit,
            pattern: Regex::new(unit.pattern())?,
        })
    }

    pub fn parse(&self, raw: &str) -> Option<String> {
        let caps = self.pattern.captures(raw)?;
        let number = caps.name("number")?.as_str();
        match self.unit {
            Unit::Watts | Unit::Bits => Some(number.to_string()),
            Unit::Magnitude => {
                let suffix = caps.name("suffix")?.as_str().to_ascii_lowercase();
                let suffix = MAGNITUDES.get(suffix.as_str())?;
                Some(format!("{}{}", number.replace(',', ""), suffix))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
