use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Languages the LUDOS service is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fi,
    Sv,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fi, Locale::Sv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fi => "fi",
            Self::Sv => "sv",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fi" => Ok(Self::Fi),
            "sv" => Ok(Self::Sv),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of `GET /localisation?category=…`.
///
/// `locale` is kept as the raw string so an unexpected code can be reported
/// by the collector instead of failing the whole response. Other fields the
/// service returns (ids, timestamps, authors) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub key: String,
    pub locale: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

impl TranslationRecord {
    pub fn new(key: impl Into<String>, locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locale: locale.into(),
            value: value.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One positional spreadsheet row: `(key, fi, sv)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    pub key: String,
    pub fi: String,
    pub sv: String,
}

impl SheetRow {
    pub fn new(key: impl Into<String>, fi: impl Into<String>, sv: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fi: fi.into(),
            sv: sv.into(),
        }
    }

    pub fn value(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fi => &self.fi,
            Locale::Sv => &self.sv,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived entries
// ---------------------------------------------------------------------------

/// Finnish and Swedish values of a single key. An absent locale is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationEntry {
    pub fi: String,
    pub sv: String,
}

impl TranslationEntry {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fi => &self.fi,
            Locale::Sv => &self.sv,
        }
    }

    pub fn set(&mut self, locale: Locale, value: impl Into<String>) {
        match locale {
            Locale::Fi => self.fi = value.into(),
            Locale::Sv => self.sv = value.into(),
        }
    }
}

/// Key → entry, iterated in first-seen key order.
pub type TranslationMap = IndexMap<String, TranslationEntry>;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One element of the `POST /localisation/update` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadItem {
    pub category: String,
    pub key: String,
    pub locale: Locale,
    pub value: String,
}
