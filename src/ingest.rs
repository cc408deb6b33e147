//! Loading reference datasets from CSV and spreadsheet files

use crate::domain::reference::{Cell, RawTable};
use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("unsupported file type '{0}', expected csv, xlsx, xlsm, xls or ods")]
    UnsupportedFormat(String),
    #[error("sheet '{name}' not found, available: {}", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("input is empty")]
    Empty,
}

/// Read a reference dataset (or stdin with "-", as CSV)
pub fn read_table(path: &Path, sheet: Option<&str>) -> anyhow::Result<RawTable> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        return parse_csv_bytes(&buffer);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let bytes =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            parse_csv_bytes(&bytes)
        }
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path, sheet),
        _ => Err(IngestError::UnsupportedFormat(ext).into()),
    }
}

/// UTF-8 first (a leading BOM is dropped), Windows-1252 when that fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(err) => {
            log::warn!(
                "Input is not valid UTF-8 (at byte {}), decoding as Windows-1252",
                err.valid_up_to()
            );
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}

pub fn parse_csv_bytes(bytes: &[u8]) -> anyhow::Result<RawTable> {
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(IngestError::Empty.into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| Cell::from(field.trim())).collect());
    }

    log::info!("Read {} csv records", rows.len());
    Ok(RawTable { headers, rows })
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> anyhow::Result<RawTable> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening {}", path.display()))?;

    let sheet_names = workbook.sheet_names();
    let name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IngestError::SheetNotFound {
                    name: name.to_string(),
                    available: sheet_names,
                }
                .into());
            }
            name.to_string()
        }
        None => sheet_names.first().cloned().ok_or(IngestError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading sheet '{}'", name))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or(IngestError::Empty)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    let rows: Vec<Vec<Cell>> = sheet_rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    log::info!("Read {} rows from sheet '{}'", rows.len(), name);
    Ok(RawTable { headers, rows })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::from(s.trim()),
        other => Cell::Text(other.to_string()),
    }
}
