use serde::{Deserialize, Serialize};

use crate::model::{TranslationEntry, TranslationMap};

/// Which entries an export keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFilter {
    /// Finnish present, Swedish empty: the translator's work list.
    #[default]
    MissingSwedish,
    /// Finnish present, Swedish in any state: a full review sheet.
    HasFinnish,
}

impl ExportFilter {
    pub fn matches(&self, entry: &TranslationEntry) -> bool {
        match self {
            Self::MissingSwedish => !entry.fi.is_empty() && entry.sv.is_empty(),
            Self::HasFinnish => !entry.fi.is_empty(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSwedish => "missing_swedish",
            Self::HasFinnish => "has_finnish",
        }
    }
}

impl std::fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep the entries accepted by `filter`, preserving iteration order.
pub fn classify(entries: &TranslationMap, filter: ExportFilter) -> TranslationMap {
    let kept: TranslationMap = entries
        .iter()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(key, entry)| (key.clone(), entry.clone()))
        .collect();

    log::debug!("{}: kept {} of {} keys", filter, kept.len(), entries.len());
    kept
}

/// Translation coverage of a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub keys: usize,
    pub fi: usize,
    pub sv: usize,
    pub missing_sv: usize,
}

/// Count keys and non-empty values per locale.
pub fn stats(entries: &TranslationMap) -> TranslationStats {
    entries.values().fold(
        TranslationStats { keys: entries.len(), ..Default::default() },
        |mut acc, entry| {
            acc.fi += usize::from(!entry.fi.is_empty());
            acc.sv += usize::from(!entry.sv.is_empty());
            acc.missing_sv += usize::from(ExportFilter::MissingSwedish.matches(entry));
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fi: &str, sv: &str) -> TranslationEntry {
        TranslationEntry { fi: fi.into(), sv: sv.into() }
    }

    fn sample() -> TranslationMap {
        let mut map = TranslationMap::new();
        map.insert("both".into(), entry("Hei", "Hej"));
        map.insert("fi_only".into(), entry("Moi", ""));
        map.insert("sv_only".into(), entry("", "Tjena"));
        map.insert("neither".into(), entry("", ""));
        map.insert("fi_only_2".into(), entry("Terve", ""));
        map
    }

    #[test]
    fn missing_swedish_keeps_fi_without_sv() {
        let out = classify(&sample(), ExportFilter::MissingSwedish);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["fi_only", "fi_only_2"]);
    }

    #[test]
    fn has_finnish_keeps_all_fi_backed() {
        let out = classify(&sample(), ExportFilter::HasFinnish);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["both", "fi_only", "fi_only_2"]);
        assert_eq!(out["both"], entry("Hei", "Hej"));
    }

    #[test]
    fn stats_counts_non_empty_values() {
        assert_eq!(
            stats(&sample()),
            TranslationStats { keys: 5, fi: 3, sv: 2, missing_sv: 2 }
        );
        assert_eq!(stats(&TranslationMap::new()), TranslationStats::default());
    }

    #[test]
    fn empty_map_stays_empty() {
        assert!(classify(&TranslationMap::new(), ExportFilter::HasFinnish).is_empty());
    }

    #[test]
    fn filter_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrap {
            filter: ExportFilter,
        }
        let w: Wrap = serde_json::from_str(r#"{"filter":"has_finnish"}"#).unwrap();
        assert_eq!(w.filter, ExportFilter::HasFinnish);
    }
}
