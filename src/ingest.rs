//! Delimited text ingestion
//!
//! One record per line, fields separated by a single delimiter character,
//! every field a finite `f64` literal. No header row, no quoting. Blank lines
//! are skipped. Lines may carry different field counts.

use crate::error::{Result, VectorError};
use crate::vector::VectorRecord;

/// Parses one line into a record.
///
/// # Arguments
///
/// * `line` - The raw line, with or without its line terminator
/// * `line_number` - 1-based position of the line, reported in errors
/// * `delimiter` - Field separator
///
/// # Returns
///
/// * `Ok(None)` - The line is empty or whitespace only
/// * `Ok(Some(VectorRecord))` - One component per field
/// * `Err(VectorError::Parse)` - The first field that is not a finite number
///
/// # Examples
///
/// ```
/// use vecstore::parse_delimited_line;
///
/// let record = parse_delimited_line("1, 2.5 ,-3", 1, ',').unwrap().unwrap();
/// assert_eq!(record.values(), &[1.0, 2.5, -3.0]);
///
/// assert!(parse_delimited_line("   ", 2, ',').unwrap().is_none());
/// assert!(parse_delimited_line("1,x", 3, ',').is_err());
/// ```
pub fn parse_delimited_line(line: &str, line_number: usize, delimiter: char) -> Result<Option<VectorRecord>> {
    // only the terminator is stripped, so empty edge fields stay visible
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let values = line.split(delimiter)
        .map(str::trim)
        .map(|token| parse_finite(token).ok_or_else(|| VectorError::Parse {
            line: line_number,
            token: token.to_string(),
        }))
        .collect::<Result<Vec<f64>>>()?;

    Ok(Some(VectorRecord::from_values(values)))
}

/// Parses a finite `f64`; `inf`, `-inf` and `NaN` are rejected.
pub fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses a whole batch of lines, numbering them from 1.
///
/// Stops at the first malformed line; nothing parsed so far is returned.
pub fn parse_delimited<I, S>(lines: I, delimiter: char) -> Result<Vec<VectorRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if let Some(record) = parse_delimited_line(line.as_ref(), i + 1, delimiter)? {
            records.push(record);
        }
    }
    Ok(records)
}
