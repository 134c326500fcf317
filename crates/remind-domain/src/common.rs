//! Shared traits and enums for reminder primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Display languages supported by the message catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::English, Locale::Korean];

    /// Short language tag used in configuration files and CLI flags.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Korean => "ko",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a locale tag is not one of the supported languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale `{}`", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts bare language tags as well as region-qualified ones (`en-US`, `ko_KR`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let language = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Ok(Locale::English),
            "ko" => Ok(Locale::Korean),
            _ => Err(UnknownLocale(value.to_string())),
        }
    }
}

/// Calendar month used to scope budget spend lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
