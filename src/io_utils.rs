//! Reader and writer construction shared by ingestion and export.
//!
//! The `-` path routes through stdin/stdout. Input delimiters default from the
//! file extension (`.tsv` → tab, anything else → comma) and input text is
//! decoded with `encoding_rs`, defaulting to UTF-8. Exports are always UTF-8.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::IngestionError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, IngestionError> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| IngestionError::UnknownEncoding(value.to_string())),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader(
    path: &Path,
    delimiter: u8,
    has_headers: bool,
) -> Result<csv::Reader<Box<dyn Read>>, IngestionError> {
    let source: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        let file = File::open(path).map_err(|source| IngestionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(source))
}

/// Opens `path` for writing, or stdout when `path` is `-`.
pub fn open_output(path: &Path) -> std::io::Result<Box<dyn Write>> {
    if is_dash(path) {
        Ok(Box::new(std::io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

/// Decodes a field, or `None` when the bytes are not valid in `encoding`.
pub fn decode_field(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}
