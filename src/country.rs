//! ISO country code to display name lookup.
//!
//! The table is loaded once from a GeoNames `countryInfo.txt`-style file:
//! tab-separated rows with the ISO code in the first column and the display
//! name in the fifth. Comment lines (`#`) and blank lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

const CODE_FIELD: usize = 0;
const NAME_FIELD: usize = 4;

/// Immutable mapping from country code to country name.
///
/// Unknown codes are not an error: [`CountryNameTable::name_for`] echoes them back.
#[derive(Debug, Clone, Default)]
pub struct CountryNameTable {
    names: FxHashMap<String, String>,
}

impl CountryNameTable {
    /// Loads the table from a file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), countries = table.len(), "Loaded country names");
        Ok(table)
    }

    /// Parses the table from any buffered reader.
    ///
    /// ```
    /// use revgeo::CountryNameTable;
    ///
    /// let data = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\nJP\tJPN\t392\tJA\tJapan\n";
    /// let table = CountryNameTable::from_reader(data.as_bytes()).unwrap();
    /// assert_eq!(table.name_for("JP"), "Japan");
    /// assert_eq!(table.name_for("ZZ"), "ZZ");
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut names = FxHashMap::default();
        for line in reader.lines() {
            let line = line?;
            if let Some((code, name)) = parse_country_line(&line) {
                names.insert(code.to_string(), name.to_string());
            }
        }
        Ok(Self { names })
    }

    /// Builds a table from explicit `(code, name)` pairs.
    pub fn from_pairs<I, C, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }

    /// Display name for `code`, if the table has one.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Display name for `code`, falling back to the code itself.
    pub fn name_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).unwrap_or(code)
    }

    /// Number of mapped codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no codes are mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn parse_country_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches('\r');
    if line.starts_with('#') || line.trim().is_empty() {
        return None;
    }
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() <= NAME_FIELD {
        return None;
    }
    let code = parts[CODE_FIELD].trim();
    if code.is_empty() {
        return None;
    }
    Some((code, parts[NAME_FIELD].trim()))
}
