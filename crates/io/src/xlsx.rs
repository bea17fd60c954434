// Excel import/export
//
// Reading goes through calamine (xlsx, xlsm, xls, xlsb, ods); writing is
// always xlsx via rust_xlsxwriter.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::Timelike;
use lokal_recon::{SheetRow, TranslationMap};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::HEADER;

/// Column widths (in Excel character units) for key, fi, sv.
const COLUMN_WIDTHS: [f64; 3] = [48.0, 60.0, 60.0];

/// Read positional rows from the first worksheet.
///
/// The first row of the used range is treated as the header. Columns are
/// absolute: a sheet whose data starts in column B has an empty key column.
pub fn import_rows(path: &Path) -> Result<Vec<SheetRow>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open spreadsheet {}: {}", path.display(), e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format!("{}: spreadsheet contains no sheets", path.display()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    if range.is_empty() {
        log::warn!("sheet '{}' in {} is empty", sheet_name, path.display());
        return Ok(Vec::new());
    }

    // Range start offset (data may not begin at A1)
    let (_, data_start_col) = range.start().unwrap_or((0, 0));
    let pad = data_start_col as usize;

    let table = range.rows().map(|row| {
        let mut cells = vec![String::new(); pad];
        cells.extend(row.iter().map(cell_to_string));
        cells
    });

    Ok(crate::to_sheet_rows(table))
}

/// Render a cell the way it reads in the spreadsheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) if d.hour() == 0 && d.minute() == 0 && d.second() == 0 => {
                d.format("%Y-%m-%d").to_string()
            }
            Some(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Write entries to a single-sheet xlsx workbook with a bold, frozen header.
pub fn export_entries(path: &Path, entries: &TranslationMap, sheet_name: &str) -> Result<usize, String> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", sheet_name, e))?;

    for (col, (title, width)) in HEADER.iter().zip(COLUMN_WIDTHS).enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| format!("Failed to set column width: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header row: {}", e))?;

    for (idx, (key, entry)) in entries.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in [key.as_str(), entry.fi.as_str(), entry.sv.as_str()].into_iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value)
                .map_err(|e| format!("Failed to write cell {}{}: {}", col_to_letter(col), row + 1, e))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    Ok(entries.len())
}

/// Convert column index to Excel column letter (0 = A, 25 = Z, 26 = AA, etc.)
fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
