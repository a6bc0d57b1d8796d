use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::MultiGzDecoder;

use crate::config::Separator;
use crate::consts::MISSING_VALUE;
use crate::errors::{HeatmapError, Result};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|source| HeatmapError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Wrap any reader into a header-aware delimited table reader.
///
pub fn table_reader<R: Read>(reader: R, separator: Separator) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader)
}

///
/// Resolve the position of a required column in a header row.
///
pub fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| HeatmapError::MissingColumn {
            column: column.to_string(),
        })
}

///
/// Parse a float field, mapping the literal `NA` to NaN.
///
pub fn parse_value(raw: &str, column: &str, line: u64) -> Result<f64> {
    if raw == MISSING_VALUE {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| HeatmapError::InvalidValue {
        column: column.to_string(),
        value: raw.to_string(),
        line,
    })
}

///
/// Parse an integer field (coordinates, read counts).
///
pub fn parse_integer(raw: &str, column: &str, line: u64) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| HeatmapError::InvalidValue {
        column: column.to_string(),
        value: raw.to_string(),
        line,
    })
}
