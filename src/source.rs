//! CSV decoding for task exports.
//!
//! Turns the text of an export into an ordered list of [`RawRow`] records keyed by the
//! header row. Quoted fields may contain commas, doubled quotes and line breaks.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// One decoded CSV record: column name to raw cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        RawRow {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Raw text of a column, or `None` when the record did not reach that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Read and decode a CSV file.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(&text)
}

/// Decode CSV text whose first record is the header.
///
/// Blank records are skipped. Records shorter than the header leave the trailing
/// columns absent and extra cells past the header are ignored.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();

    let header: Vec<String> = match records.next() {
        Some(h) => h.into_iter().map(|name| name.trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let rows: Vec<RawRow> = records
        .filter(|record| !(record.len() == 1 && record[0].trim().is_empty()))
        .map(|record| RawRow {
            cells: header.iter().cloned().zip(record).collect(),
        })
        .collect();

    debug!(columns = header.len(), rows = rows.len(), "decoded csv");
    Ok(rows)
}

/// Split text into records of fields, honouring quotes across line breaks.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_opened_at = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_opened_at = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(Error::Csv {
            line: quote_opened_at,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
