// Shared helpers for the CSV loaders
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::LoadError;

pub fn read_file(path: &Path) -> Result<String, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = File::open(path).map_err(io_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(io_error)?;
    Ok(contents)
}

pub fn reader(contents: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes())
}

/// Position of a named column in the header row.
pub fn column(headers: &StringRecord, name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::InvalidField {
            row: 0,
            field: name.to_string(),
            reason: "missing column".to_string(),
        })
}

pub fn text<'r>(record: &'r StringRecord, index: usize, row: usize, field: &str) -> Result<&'r str, LoadError> {
    record.get(index).ok_or_else(|| LoadError::InvalidField {
        row,
        field: field.to_string(),
        reason: "missing value".to_string(),
    })
}

pub fn number(record: &StringRecord, index: usize, row: usize, field: &str) -> Result<f64, LoadError> {
    let raw = text(record, index, row, field)?;
    raw.parse().map_err(|_| LoadError::InvalidField {
        row,
        field: field.to_string(),
        reason: format!("'{}' is not a number", raw),
    })
}

/// Empty cells read as `None`.
pub fn optional_number(record: &StringRecord, index: Option<usize>, row: usize, field: &str) -> Result<Option<f64>, LoadError> {
    match index {
        None => Ok(None),
        Some(index) => match record.get(index) {
            None | Some("") => Ok(None),
            Some(_) => number(record, index, row, field).map(Some),
        },
    }
}
