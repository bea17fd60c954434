// Spreadsheet and JSON file I/O
//
// Spreadsheets are always laid out as a header row followed by one row per
// key, with the key, Finnish and Swedish values in the first three columns.

use std::path::Path;

use lokal_recon::{SheetRow, TranslationMap};

pub mod csv;
pub mod json;
pub mod xlsx;

/// Header written above exported rows.
pub const HEADER: [&str; 3] = ["key", "fi", "sv"];

/// Tabular file formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// xlsx, xlsm, xls, xlsb, ods (read); xlsx (write)
    Spreadsheet,
    Csv,
    Tsv,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "" => Err(format!("{}: missing file extension", path.display())),
            other => Err(format!("{}: unsupported file type '.{}'", path.display(), other)),
        }
    }
}

/// Read `(key, fi, sv)` rows from a spreadsheet or CSV/TSV file.
pub fn read_rows(path: &Path) -> Result<Vec<SheetRow>, String> {
    let rows = match FileKind::from_path(path)? {
        FileKind::Spreadsheet => xlsx::import_rows(path)?,
        FileKind::Csv => csv::import_rows(path)?,
        FileKind::Tsv => csv::import_rows_tsv(path)?,
    };
    log::info!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Write entries under a `key, fi, sv` header. Returns the number of data rows.
pub fn write_entries(path: &Path, entries: &TranslationMap, sheet_name: &str) -> Result<usize, String> {
    let written = match FileKind::from_path(path)? {
        FileKind::Spreadsheet => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if !ext.eq_ignore_ascii_case("xlsx") {
                return Err(format!("{}: can only write .xlsx spreadsheets", path.display()));
            }
            xlsx::export_entries(path, entries, sheet_name)?
        }
        FileKind::Csv => csv::export_entries(path, entries)?,
        FileKind::Tsv => csv::export_entries_tsv(path, entries)?,
    };
    log::info!("wrote {} rows to {}", written, path.display());
    Ok(written)
}

/// Turn raw table rows into positional sheet rows.
///
/// The first row is the header and is dropped. Missing trailing cells read as
/// empty; rows whose first three cells are all blank are dropped.
pub(crate) fn to_sheet_rows<I>(table: I) -> Vec<SheetRow>
where
    I: IntoIterator<Item = Vec<String>>,
{
    table
        .into_iter()
        .skip(1)
        .filter_map(|cells| {
            let mut cells = cells.into_iter();
            let row = SheetRow {
                key: cells.next().unwrap_or_default(),
                fi: cells.next().unwrap_or_default(),
                sv: cells.next().unwrap_or_default(),
            };
            if row.key.trim().is_empty() && row.fi.trim().is_empty() && row.sv.trim().is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_is_skipped() {
        let rows = to_sheet_rows(table(&[&["Key", "fi", "sv"], &["a", "Hei", "Hej"]]));
        assert_eq!(rows, vec![SheetRow::new("a", "Hei", "Hej")]);
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = to_sheet_rows(table(&[&["h"], &["a", "Hei"], &["b"]]));
        assert_eq!(rows, vec![SheetRow::new("a", "Hei", ""), SheetRow::new("b", "", "")]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = to_sheet_rows(table(&[&["h"], &["a", "1", "2", "comment"]]));
        assert_eq!(rows, vec![SheetRow::new("a", "1", "2")]);
    }

    #[test]
    fn blank_rows_are_dropped_but_blank_values_kept() {
        let rows = to_sheet_rows(table(&[&["h"], &["", "", ""], &["a", "", ""], &[]]));
        assert_eq!(rows, vec![SheetRow::new("a", "", "")]);
    }

    #[test]
    fn file_kind_by_extension() {
        assert_eq!(FileKind::from_path(Path::new("x.XLSX")), Ok(FileKind::Spreadsheet));
        assert_eq!(FileKind::from_path(Path::new("x.ods")), Ok(FileKind::Spreadsheet));
        assert_eq!(FileKind::from_path(Path::new("x.csv")), Ok(FileKind::Csv));
        assert_eq!(FileKind::from_path(Path::new("x.tsv")), Ok(FileKind::Tsv));
        assert!(FileKind::from_path(Path::new("x.pdf")).unwrap_err().contains(".pdf"));
        assert!(FileKind::from_path(Path::new("x")).is_err());
    }

    #[test]
    fn write_refuses_legacy_spreadsheet_formats() {
        let err = write_entries(Path::new("out.xls"), &TranslationMap::new(), "s").unwrap_err();
        assert!(err.contains(".xlsx"));
    }
}
