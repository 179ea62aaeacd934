//! GeoNames place ingestion.
//!
//! Reads tab-separated gazetteer rows in the GeoNames `allCountries.txt`
//! layout. Only four columns are used:
//!
//! | column | field        |
//! |--------|--------------|
//! | 1      | name         |
//! | 4      | latitude     |
//! | 5      | longitude    |
//! | 8      | country code |
//!
//! Rows with fewer than ten columns or unusable coordinates are dropped and
//! logged; ingestion carries on. Only I/O failures abort a load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, MalformedRecord, Result};
use crate::store::{PointRecord, PointStore};

const MIN_FIELDS: usize = 10;
const NAME_FIELD: usize = 1;
const LAT_FIELD: usize = 4;
const LON_FIELD: usize = 5;
const COUNTRY_FIELD: usize = 8;

/// Counts reported after a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows turned into records.
    pub loaded: usize,
    /// Non-blank rows dropped as malformed.
    pub skipped: usize,
}

/// Loads every well-formed place row from a file.
pub fn load_places<P: AsRef<Path>>(path: P) -> Result<PointStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (store, summary) = read_places(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        loaded = summary.loaded,
        skipped = summary.skipped,
        "Loaded places"
    );
    Ok(store)
}

/// Reads place rows from any buffered reader, preserving row order.
///
/// ```
/// use revgeo::loader::read_places;
///
/// let data = "5128581\tNew York City\tNew York City\t\t40.71427\t-74.00597\tP\tPPL\tUS\t\n\
///             broken row\n";
/// let (store, summary) = read_places(data.as_bytes()).unwrap();
/// assert_eq!(store.len(), 1);
/// assert_eq!(summary.skipped, 1);
/// ```
pub fn read_places<R: BufRead>(reader: R) -> Result<(PointStore, LoadSummary)> {
    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_place_line(&line) {
            Ok(record) => {
                records.push(record);
                summary.loaded += 1;
            }
            Err(reason) => {
                tracing::debug!(line = line_no + 1, %reason, "Skipping malformed place row");
                summary.skipped += 1;
            }
        }
    }

    Ok((PointStore::new(records), summary))
}

/// Parses one gazetteer row.
pub fn parse_place_line(line: &str) -> std::result::Result<PointRecord, MalformedRecord> {
    let parts: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
    if parts.len() < MIN_FIELDS {
        return Err(MalformedRecord::TooFewFields {
            expected: MIN_FIELDS,
            found: parts.len(),
        });
    }

    let lat = parts[LAT_FIELD].trim();
    let latitude = lat
        .parse::<f64>()
        .ok()
        .filter(|v| (-90.0..=90.0).contains(v))
        .ok_or_else(|| MalformedRecord::InvalidLatitude(lat.to_string()))?;

    let lon = parts[LON_FIELD].trim();
    let longitude = lon
        .parse::<f64>()
        .ok()
        .filter(|v| (-180.0..=180.0).contains(v))
        .ok_or_else(|| MalformedRecord::InvalidLongitude(lon.to_string()))?;

    Ok(PointRecord::from_degrees(
        latitude,
        longitude,
        parts[NAME_FIELD].trim(),
        Some(parts[COUNTRY_FIELD]),
    ))
}
