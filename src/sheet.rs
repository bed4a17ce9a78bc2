//! Price-list workbook reader.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::info;

use crate::error::CatalogError;
use crate::parser::normalize::{CostCell, RawRow};

/// Column indices (0-based) of the price list.
mod cols {
    pub const CODE: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const COST: usize = 8;
}

/// Rows of the configured sheet, header row skipped.
pub fn read_price_list(path: &Path, sheet: &str) -> Result<Vec<RawRow>, CatalogError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| CatalogError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(CatalogError::SheetMissing {
            sheet: sheet.to_string(),
            available: names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| CatalogError::Sheet {
            sheet: sheet.to_string(),
            source,
        })?;

    let rows = rows_from_range(&range);
    info!("Loaded {} rows from sheet '{}'", rows.len(), sheet);
    Ok(rows)
}

pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    range.rows().skip(1).map(raw_row).collect()
}

fn raw_row(row: &[Data]) -> RawRow {
    RawRow {
        code: cell_text(row, cols::CODE),
        description: cell_text(row, cols::DESCRIPTION),
        unit_cost: cell_cost(row, cols::COST),
    }
}

fn cell_text(row: &[Data], col: usize) -> Option<String> {
    row.get(col).and_then(|c| match c {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn cell_cost(row: &[Data], col: usize) -> CostCell {
    match row.get(col) {
        Some(Data::Float(f)) => CostCell::Number(*f),
        Some(Data::Int(i)) => CostCell::Number(*i as f64),
        Some(Data::String(s)) => CostCell::Text(s.clone()),
        _ => CostCell::Empty,
    }
}

/// First rows of one sheet, for `inspect`.
pub struct SheetPreview {
    pub name: String,
    pub height: usize,
    pub width: usize,
    pub rows: Vec<Vec<(usize, String)>>,
}

pub fn preview(path: &Path, max_rows: usize) -> Result<Vec<SheetPreview>, CatalogError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| CatalogError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let mut previews = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| CatalogError::Sheet {
                sheet: name.clone(),
                source,
            })?;
        let (height, width) = range.get_size();
        let rows = range
            .rows()
            .take(max_rows)
            .map(|row| {
                (0..row.len())
                    .filter_map(|col| cell_text(row, col).map(|v| (col + 1, v)))
                    .filter(|(_, v)| !v.trim().is_empty())
                    .collect::<Vec<_>>()
            })
            .collect();
        previews.push(SheetPreview {
            name,
            height,
            width,
            rows,
        });
    }
    Ok(previews)
}

// ── Tests ──
