//! CSV ingestion: decode fields, infer a tagged [`Cell`] per token, and build a
//! [`Dataset`] for the recommendation engine.

use std::{collections::HashSet, path::Path, sync::OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};
use regex::Regex;

use crate::{
    data::{Cell, Column, Dataset},
    error::IngestionError,
    io_utils,
};

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub has_headers: bool,
    /// Maximum number of data rows to read; 0 reads everything.
    pub limit: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            has_headers: true,
            limit: 0,
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

pub fn read_dataset(path: &Path, options: &IngestOptions) -> Result<Dataset, IngestionError> {
    let mut reader = io_utils::open_csv_reader(path, options.delimiter, options.has_headers)?;
    let mut names = if options.has_headers {
        let headers = reader.byte_headers()?.clone();
        headers
            .iter()
            .enumerate()
            .map(|(index, field)| {
                io_utils::decode_field(field, options.encoding).ok_or(
                    IngestionError::UndecodableHeader {
                        index,
                        encoding: options.encoding.name(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    let mut buffers: Vec<Vec<RawField>> = vec![Vec::new(); names.len()];
    let mut record = csv::ByteRecord::new();
    let mut rows = 0usize;
    let mut decode_errors = 0usize;
    while (options.limit == 0 || rows < options.limit)
        && reader.read_byte_record(&mut record)?
    {
        if !options.has_headers && names.is_empty() {
            names = vec![String::new(); record.len()];
            buffers = vec![Vec::new(); record.len()];
        }
        for (idx, field) in record.iter().enumerate() {
            let raw = match io_utils::decode_field(field, options.encoding) {
                Some(text) => RawField::Decoded(text),
                None => {
                    decode_errors += 1;
                    RawField::Undecodable(field.to_vec())
                }
            };
            buffers[idx].push(raw);
        }
        rows += 1;
    }

    if decode_errors > 0 {
        warn!(
            "{decode_errors} field(s) in {path:?} could not be decoded as {}",
            options.encoding.name()
        );
    }
    info!(
        "Read {rows} row(s) across {} column(s) from {path:?}",
        names.len()
    );

    Ok(unique_column_names(&names)
        .into_iter()
        .zip(buffers)
        .map(|(name, fields)| Column::new(name, settle_column(fields)))
        .collect())
}

#[derive(Debug, Clone)]
enum RawField {
    Decoded(String),
    Undecodable(Vec<u8>),
}

/// Types a whole column of tokens.
///
/// Tokens are parsed one by one, then the column decides: when it holds any
/// text, boolean-looking tokens (`F`, `yes`) are words too, and when it holds
/// zero-padded codes, its integers are codes too. Other mixtures are left
/// for the classifier.
fn settle_column(fields: Vec<RawField>) -> Vec<Cell> {
    let parsed: Vec<(RawField, Cell)> = fields
        .into_iter()
        .map(|field| {
            let cell = match &field {
                RawField::Decoded(text) => parse_cell(text),
                RawField::Undecodable(bytes) => Cell::Opaque(bytes.clone()),
            };
            (field, cell)
        })
        .collect();
    let has_text = parsed.iter().any(|(_, cell)| matches!(cell, Cell::Text(_)));
    let has_padded_codes = parsed.iter().any(|(field, _)| {
        matches!(field, RawField::Decoded(text) if is_zero_padded(text.trim()))
    });
    parsed
        .into_iter()
        .map(|(field, cell)| match (field, cell) {
            (RawField::Decoded(text), Cell::Integer(_)) if has_padded_codes => {
                Cell::Text(text.trim().to_string())
            }
            (RawField::Decoded(text), Cell::Boolean(_)) if has_text => {
                Cell::Text(text.trim().to_string())
            }
            (_, cell) => cell,
        })
        .collect()
}

/// Fills blank names with `column_N` and suffixes repeats with `_2`, `_3`, ...
pub fn unique_column_names(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for (idx, name) in raw.iter().enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

/// Infers the tagged value of a single textual token.
pub fn parse_cell(raw: &str) -> Cell {
    let token = raw.trim();
    if token.is_empty() || is_placeholder(token) {
        return Cell::Missing;
    }
    if is_zero_padded(token) {
        // Zero-padded codes such as ZIPs keep their text form.
        return Cell::Text(token.to_string());
    }
    if let Ok(value) = token.parse::<i64>() {
        return Cell::Integer(value);
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => return Cell::Float(value),
        _ => {}
    }
    if let Some(value) = parse_boolean(token) {
        return Cell::Boolean(value);
    }
    if let Some(value) = parse_timestamp(token) {
        return Cell::Timestamp(value);
    }
    if let Some(value) = parse_duration(token) {
        return Cell::Duration(value);
    }
    Cell::Text(token.to_string())
}

fn is_placeholder(token: &str) -> bool {
    let lowered = token.to_ascii_lowercase();
    matches!(
        lowered.trim_start_matches('#'),
        "na" | "n/a" | "n.a." | "nan" | "null" | "none" | "unknown" | "missing"
    )
}

fn is_zero_padded(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    digits.len() > 1 && digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_boolean(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" => Some(true),
        "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
        return Some(parsed.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-)?(\d+):([0-5]\d):([0-5]\d)(?:\.(\d{1,9}))?$")
            .expect("duration pattern is valid")
    })
}

/// Parses `[-]H:MM:SS[.fraction]`; hours may exceed 23.
pub fn parse_duration(token: &str) -> Option<TimeDelta> {
    let captures = duration_pattern().captures(token)?;
    let hours: i64 = captures[2].parse().ok()?;
    let minutes: i64 = captures[3].parse().ok()?;
    let seconds: i64 = captures[4].parse().ok()?;
    let nanos = match captures.get(5) {
        Some(fraction) => {
            let digits = fraction.as_str();
            let padded = format!("{digits:0<9}");
            padded.parse::<i64>().ok()?
        }
        None => 0,
    };
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    let delta = TimeDelta::try_seconds(total)?.checked_add(&TimeDelta::nanoseconds(nanos))?;
    if captures.get(1).is_some() {
        Some(-delta)
    } else {
        Some(delta)
    }
}
