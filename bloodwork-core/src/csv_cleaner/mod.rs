//! Knowledge-base CSV cleaner
//!
//! Recognises a Sources, Tiroirs or Questions export from its header row,
//! keeps only the columns of that kind and normalizes every kept cell.

pub mod cell;
pub mod kind;

pub use cell::clean_cell;
pub use kind::CsvKind;

use crate::error::{BloodworkError, Result};
use csv::ReaderBuilder;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanStats {
    pub original_columns: usize,
    pub cleaned_columns: usize,
    pub rows: usize,
    pub columns_kept: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedCsv {
    pub csv: String,
    pub kind: CsvKind,
    pub stats: CleanStats,
}

fn read_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Clean a knowledge-base export.
pub fn clean_csv(text: &str) -> Result<CleanedCsv> {
    let mut rows = read_rows(text)?.into_iter();
    let headers: Vec<String> = rows
        .next()
        .ok_or(BloodworkError::EmptyCsv)?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let kind = CsvKind::detect(&headers).ok_or(BloodworkError::UnrecognizedCsv)?;
    let kept = kind.kept_columns();

    let indices: Vec<Option<usize>> = kept
        .iter()
        .map(|column| headers.iter().position(|h| h.eq_ignore_ascii_case(column)))
        .collect();

    let missing: Vec<&str> = kept
        .iter()
        .zip(&indices)
        .filter(|(_, idx)| idx.is_none())
        .map(|(column, _)| *column)
        .collect();
    if missing.len() == kept.len() {
        return Err(BloodworkError::NoMatchingColumns {
            kind: kind.to_string(),
        });
    }
    if !missing.is_empty() {
        tracing::warn!("Missing {kind} columns: {}", missing.join(", "));
    }

    let mut lines = vec![kept.join(",")];
    let mut row_count = 0;
    for row in rows {
        let cells: Vec<String> = kept
            .iter()
            .zip(&indices)
            .map(|(column, idx)| match idx.and_then(|i| row.get(i)) {
                Some(value) => clean_cell(value, column),
                None => String::new(),
            })
            .collect();
        lines.push(cells.join(","));
        row_count += 1;
    }

    tracing::info!("🧹 Cleaned {kind} export: {row_count} rows, {} columns kept", kept.len());

    Ok(CleanedCsv {
        csv: lines.join("\n"),
        kind,
        stats: CleanStats {
            original_columns: headers.len(),
            cleaned_columns: kept.len(),
            rows: row_count,
            columns_kept: kept.iter().map(|c| c.to_string()).collect(),
        },
    })
}
