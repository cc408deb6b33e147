use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;

pub const MAKE: &str = "MAKE";
pub const MODEL: &str = "MODEL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error(
        "reference table must contain 'Make' and 'Model' columns (missing {}); found: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<&'static str>,
        found: Vec<String>,
    },
}

/// A single spreadsheet or CSV cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
            Cell::Empty => true,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            // Spreadsheets hand integers back as floats
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Tabular data exactly as loaded, before any header clean-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// One reference entry. `make` and `model` are trimmed and upper-cased;
/// `values` holds every column (including make and model) as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRow {
    pub make: String,
    pub model: String,
    pub values: Vec<String>,
}

/// A validated reference table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    columns: Vec<String>,
    rows: Vec<ReferenceRow>,
    fingerprint: String,
}

impl ReferenceTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// SHA-256 of the normalised content, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Trim, drop quote characters, collapse inner whitespace and upper-case.
pub fn normalize_header(header: &str) -> String {
    header
        .replace('"', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn is_make_column(header: &str) -> bool {
    header == MAKE
}

/// A model name column, not a model number or code column
fn is_model_column(header: &str) -> bool {
    header.contains(MODEL) && !header.contains("NUMBER")
}

/// Normalise headers and pick out the make and model columns.
///
/// When several headers qualify, the first one in column order is used and
/// the others pass through untouched. A table without both columns is
/// rejected as a whole.
pub fn normalize_reference_table(raw: &RawTable) -> Result<ReferenceTable, SchemaError> {
    let mut columns: Vec<String> = raw.headers.iter().map(|h| normalize_header(h)).collect();

    let make_idx = columns.iter().position(|h| is_make_column(h));
    let model_idx = columns.iter().position(|h| is_model_column(h));

    let (make_idx, model_idx) = match (make_idx, model_idx) {
        (Some(make), Some(model)) => (make, model),
        (make, model) => {
            let mut missing = Vec::new();
            if make.is_none() {
                missing.push("Make");
            }
            if model.is_none() {
                missing.push("Model");
            }
            return Err(SchemaError::MissingColumns {
                missing,
                found: columns,
            });
        }
    };
    columns[make_idx] = MAKE.to_string();
    columns[model_idx] = MODEL.to_string();

    let width = columns.len();
    let rows: Vec<ReferenceRow> = raw
        .rows
        .iter()
        .filter(|cells| !cells.iter().all(Cell::is_blank))
        .map(|cells| {
            let values: Vec<String> = (0..width)
                .map(|i| cells.get(i).map_or(String::new(), |c| c.to_string().trim().to_string()))
                .collect();
            ReferenceRow {
                make: values[make_idx].to_uppercase(),
                model: values[model_idx].to_uppercase(),
                values,
            }
        })
        .collect();

    let fingerprint = fingerprint(&columns, &rows);
    log::info!(
        "Loaded reference table: {} rows, {} columns, sha256 {}",
        rows.len(),
        width,
        &fingerprint[..12]
    );
    log::debug!("Reference columns: {}", columns.join(", "));

    Ok(ReferenceTable {
        columns,
        rows,
        fingerprint,
    })
}

fn fingerprint(columns: &[String], rows: &[ReferenceRow]) -> String {
    let mut hasher = Sha256::new();
    for column in columns {
        hasher.update(column.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update([0x1e]);
    for row in rows {
        for value in &row.values {
            hasher.update(value.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}

/// Rows whose make contains `make` and whose model contains `model`.
///
/// Plain substring containment after trimming and upper-casing, in table
/// order. An empty query matches nothing rather than everything.
pub fn search_reference_table<'a>(
    make: &str,
    model: &str,
    table: &'a ReferenceTable,
) -> Vec<&'a ReferenceRow> {
    let make = make.trim().to_uppercase();
    let model = model.trim().to_uppercase();
    if make.is_empty() || model.is_empty() {
        log::debug!("Empty make or model query, no matches");
        return Vec::new();
    }

    let matches: Vec<_> = table
        .rows
        .iter()
        .filter(|row| row.make.contains(&make) && row.model.contains(&model))
        .collect();
    log::debug!("Search {} / {}: {} matches", make, model, matches.len());
    matches
}

fn engine_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(\d\.\d{1,2})|\b(\d{1,2}(?:\.\d{1,2})?)\s*l\b|\b(\d{3,4})\s*cc\b")
            .expect("engine size pattern is valid")
    })
}

/// Best guess at engine displacement in litres from a model description,
/// e.g. `A4 2.0TFSI`, `HARRIER 2.5L` or `COROLLA 1800CC`.
pub fn extract_engine_size(text: &str) -> Option<Decimal> {
    let caps = engine_size_pattern().captures(text)?;
    let liters = if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
        m.as_str().parse::<Decimal>().ok()?
    } else {
        let cc = caps.get(3)?.as_str().parse::<Decimal>().ok()?;
        cc / Decimal::ONE_THOUSAND
    };
    (liters > Decimal::ZERO).then_some(liters)
}
