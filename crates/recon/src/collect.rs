use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{Locale, SheetRow, TranslationEntry, TranslationMap, TranslationRecord};

/// What to do with a record whose locale is neither `fi` nor `sv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLocalePolicy {
    /// Drop the record and report it in [`Collected::unknown_locale`].
    #[default]
    Skip,
    /// Abort collection on the first such record.
    Fail,
}

/// Result of folding a flat record list into per-key entries.
#[derive(Debug, Default)]
pub struct Collected {
    pub entries: TranslationMap,
    pub unknown_locale: Vec<TranslationRecord>,
}

/// Group records by key, in first-seen key order.
///
/// A later record for the same (key, locale) overwrites the earlier one.
pub fn collect(
    records: &[TranslationRecord],
    policy: UnknownLocalePolicy,
) -> Result<Collected, ReconError> {
    let mut out = Collected::default();

    for record in records {
        let locale = match record.locale.parse::<Locale>() {
            Ok(locale) => locale,
            Err(_) => match policy {
                UnknownLocalePolicy::Fail => {
                    return Err(ReconError::UnknownLocale {
                        key: record.key.clone(),
                        locale: record.locale.clone(),
                    });
                }
                UnknownLocalePolicy::Skip => {
                    log::warn!(
                        "skipping key '{}': unsupported locale '{}'",
                        record.key,
                        record.locale
                    );
                    out.unknown_locale.push(record.clone());
                    continue;
                }
            },
        };

        out.entries
            .entry(record.key.clone())
            .or_insert_with(TranslationEntry::default)
            .set(locale, record.value.as_str());
    }

    log::debug!(
        "collected {} keys from {} records ({} skipped)",
        out.entries.len(),
        records.len(),
        out.unknown_locale.len()
    );
    Ok(out)
}

/// Fold spreadsheet rows into per-key entries. A repeated key keeps its
/// first position and takes the values of its last row.
pub fn collect_rows(rows: &[SheetRow]) -> TranslationMap {
    let mut entries = TranslationMap::new();
    for row in rows {
        let entry = entries.entry(row.key.clone()).or_default();
        for locale in Locale::ALL {
            entry.set(locale, row.value(locale));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str, locale: &str, value: &str) -> TranslationRecord {
        TranslationRecord::new(key, locale, value)
    }

    #[test]
    fn absent_locale_defaults_to_empty() {
        let out = collect(&[rec("a", "fi", "Hei")], UnknownLocalePolicy::Skip).unwrap();
        assert_eq!(out.entries["a"].fi, "Hei");
        assert_eq!(out.entries["a"].sv, "");
    }

    #[test]
    fn last_record_wins() {
        let records = [
            rec("a", "sv", "Hej"),
            rec("a", "fi", "Hei"),
            rec("a", "sv", "Hejsan"),
        ];
        let out = collect(&records, UnknownLocalePolicy::Skip).unwrap();
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries["a"].sv, "Hejsan");
        assert_eq!(out.entries["a"].fi, "Hei");
    }

    #[test]
    fn later_empty_value_overwrites() {
        let records = [rec("a", "sv", "Hej"), rec("a", "sv", "")];
        let out = collect(&records, UnknownLocalePolicy::Skip).unwrap();
        assert_eq!(out.entries["a"].sv, "");
    }

    #[test]
    fn keys_keep_first_seen_order() {
        let records = [
            rec("b", "fi", "1"),
            rec("a", "fi", "2"),
            rec("b", "sv", "3"),
            rec("c", "sv", "4"),
        ];
        let out = collect(&records, UnknownLocalePolicy::Skip).unwrap();
        let keys: Vec<&str> = out.entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn unknown_locale_skipped() {
        let records = [rec("a", "en", "Hello"), rec("b", "fi", "Moi")];
        let out = collect(&records, UnknownLocalePolicy::Skip).unwrap();
        assert!(!out.entries.contains_key("a"));
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.unknown_locale, vec![rec("a", "en", "Hello")]);
    }

    #[test]
    fn unknown_locale_does_not_drop_valid_siblings() {
        let records = [rec("a", "fi", "Hei"), rec("a", "en", "Hi")];
        let out = collect(&records, UnknownLocalePolicy::Skip).unwrap();
        assert_eq!(out.entries["a"].fi, "Hei");
        assert_eq!(out.unknown_locale.len(), 1);
    }

    #[test]
    fn unknown_locale_fails_when_strict() {
        let records = [rec("a", "fi", "Hei"), rec("b", "de", "Hallo")];
        let err = collect(&records, UnknownLocalePolicy::Fail).unwrap_err();
        assert_eq!(
            err,
            ReconError::UnknownLocale { key: "b".into(), locale: "de".into() }
        );
    }

    #[test]
    fn rows_fold_by_key() {
        let rows = [
            SheetRow::new("b", "Moi", ""),
            SheetRow::new("a", "Hei", "Hej"),
            SheetRow::new("b", "Moikka", "Tjena"),
        ];
        let entries = collect_rows(&rows);
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(entries["b"].fi, "Moikka");
        assert_eq!(entries["b"].sv, "Tjena");
    }

    #[test]
    fn empty_input() {
        let out = collect(&[], UnknownLocalePolicy::Fail).unwrap();
        assert!(out.entries.is_empty());
        assert!(out.unknown_locale.is_empty());
    }
}
