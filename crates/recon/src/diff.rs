// Locale-level comparison of two translation sets.
// Pure: two maps in, sorted diff rows and counts out.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::model::{Locale, TranslationMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    OnlyInFrom,
    OnlyInTo,
    Changed,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::OnlyInFrom => "only_in_from",
            DiffStatus::OnlyInTo => "only_in_to",
            DiffStatus::Changed => "changed",
        }
    }
}

/// One `(key, locale)` pair whose value differs between the two sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    pub key: String,
    pub locale: Locale,
    pub status: DiffStatus,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    /// Distinct keys on either side.
    pub keys: usize,
    pub unchanged: usize,
    pub only_in_from: usize,
    pub only_in_to: usize,
    pub changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub rows: Vec<DiffRow>,
    pub stats: DiffStats,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pairs whose `from` value has to be written for `to` to match:
    /// changed values and values only present in `from`.
    pub fn pending(&self) -> HashSet<(&str, Locale)> {
        self.rows
            .iter()
            .filter(|row| row.status != DiffStatus::OnlyInTo)
            .map(|row| (row.key.as_str(), row.locale))
            .collect()
    }
}

/// Compare `from` against `to`, key by key and locale by locale.
///
/// Rows come out sorted by key, `fi` before `sv`. A key missing from one
/// side has both of its locales reported as only in the other side, empty
/// values included, so copying the pending rows never leaves a key with a
/// single locale.
pub fn diff(from: &TranslationMap, to: &TranslationMap) -> Diff {
    let keys: BTreeSet<&str> = from.keys().chain(to.keys()).map(String::as_str).collect();
    let mut out = Diff {
        rows: Vec::new(),
        stats: DiffStats { keys: keys.len(), ..Default::default() },
    };

    for key in keys {
        let (from_entry, to_entry) = (from.get(key), to.get(key));
        for locale in Locale::ALL {
            let from_value = from_entry.map(|e| e.get(locale));
            let to_value = to_entry.map(|e| e.get(locale));

            let status = match (from_value, to_value) {
                (Some(a), Some(b)) if a == b => {
                    out.stats.unchanged += 1;
                    continue;
                }
                (Some(_), Some(_)) => {
                    out.stats.changed += 1;
                    DiffStatus::Changed
                }
                (Some(_), None) => {
                    out.stats.only_in_from += 1;
                    DiffStatus::OnlyInFrom
                }
                (None, Some(_)) => {
                    out.stats.only_in_to += 1;
                    DiffStatus::OnlyInTo
                }
                (None, None) => continue,
            };

            out.rows.push(DiffRow {
                key: key.to_string(),
                locale,
                status,
                from: from_value.map(str::to_string),
                to: to_value.map(str::to_string),
            });
        }
    }

    log::debug!(
        "diff: {} keys, {} changed, {} only in from, {} only in to",
        out.stats.keys,
        out.stats.changed,
        out.stats.only_in_from,
        out.stats.only_in_to
    );
    out
}
