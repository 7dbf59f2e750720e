//! Trusted-fact CSV ingestion.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{IndexError, Result};

pub const STATEMENT_COLUMN: &str = "statement";

/// Read the `statement` column of a fact CSV.
///
/// Other columns are ignored. Empty and whitespace-only statements are
/// dropped; the rest are trimmed and returned in file order.
pub fn ingest_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) if is_not_found(&e) => return Err(IndexError::NotFound(path.to_path_buf())),
        Err(e) => return Err(e.into()),
    };

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == STATEMENT_COLUMN)
        .ok_or_else(|| IndexError::MissingColumn(STATEMENT_COLUMN.to_string()))?;

    let mut statements = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match record.get(column).map(str::trim) {
            Some(statement) if !statement.is_empty() => statements.push(statement.to_string()),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} empty statements from {}", dropped, path.display());
    }
    info!("Read {} statements from {}", statements.len(), path.display());
    Ok(statements)
}

fn is_not_found(error: &csv::Error) -> bool {
    matches!(error.kind(), csv::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
}
