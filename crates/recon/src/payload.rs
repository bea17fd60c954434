use serde::{Deserialize, Serialize};

use crate::model::{Locale, SheetRow, UploadItem};

/// Item order in the update body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadOrder {
    /// Every `fi` item in row order, then every `sv` item in row order.
    #[default]
    LocaleMajor,
    /// `fi` then `sv` for each row in turn.
    RowMajor,
}

/// Expand spreadsheet rows into update items, two per row.
///
/// Blank values and repeated keys are passed through untouched.
pub fn build_payload(rows: &[SheetRow], category: &str, order: PayloadOrder) -> Vec<UploadItem> {
    let item = |row: &SheetRow, locale: Locale| UploadItem {
        category: category.to_string(),
        key: row.key.clone(),
        locale,
        value: row.value(locale).to_string(),
    };

    let mut items = Vec::with_capacity(rows.len() * 2);
    match order {
        PayloadOrder::LocaleMajor => {
            for locale in Locale::ALL {
                items.extend(rows.iter().map(|row| item(row, locale)));
            }
        }
        PayloadOrder::RowMajor => {
            for row in rows {
                items.extend(Locale::ALL.iter().map(|&locale| item(row, locale)));
            }
        }
    }
    items
}
