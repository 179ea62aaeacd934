//! Reverse geocoding over GeoNames data with a spherical ball-tree index.
//!
//! `revgeo` turns a latitude/longitude pair into the nearest known place and
//! its country. Places are loaded once from a GeoNames gazetteer dump, indexed
//! in a ball tree under the great-circle metric, and then queried as often as
//! needed from as many threads as needed.
//!
//! # Features
//!
//! - **Exact nearest neighbour** - Branch-and-bound search returns the same
//!   answer as a full scan, including tie-breaking by input order
//! - **Spherical geometry** - Haversine distances and unit-vector centroids, so
//!   the poles and the antimeridian are not special cases
//! - **Build once, query forever** - The index is immutable after construction
//!   and needs no locks to query
//! - **Typed coordinates** - [`Location`] is degrees, [`Point`] is radians; the
//!   index only accepts the latter
//! - **Lenient ingestion** - Malformed rows are logged and skipped
//!
//! # Quick Start
//!
//! ```no_run
//! use revgeo::{IndexConfig, ReverseGeocoder};
//!
//! # fn main() -> revgeo::Result<()> {
//! let geocoder = ReverseGeocoder::load(
//!     "data/allCountries.txt",
//!     "data/countryInfo.txt",
//!     IndexConfig::default(),
//! )?;
//!
//! let place = geocoder.lookup(40.7128, -74.0060)?;
//! println!("{}, {}", place.place, place.country);
//! // Output: New York City, United States
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Components, leaf first:
//!
//! - [`metric`] - Great-circle distance and unit-vector helpers
//! - [`store`] - Immutable, position-addressed place records
//! - [`index`] - The ball tree: construction and nearest-neighbour search
//! - [`country`] - Country code to display name table
//! - [`loader`] - GeoNames row parsing
//! - [`geocoder`] - The façade tying the above together
//!
//! At startup the place file is parsed into a [`PointStore`], a
//! [`SphericalIndex`] is built over its coordinates, and both are wrapped with a
//! [`CountryNameTable`] into a [`ReverseGeocoder`]. Each query converts degrees
//! to radians, asks the index for the nearest record, and resolves the
//! record's country code to a name.
//!
//! ## Lookup Algorithm
//!
//! 1. Validate the coordinates and convert them to radians
//! 2. Descend the tree, nearer child first, skipping any node whose
//!    `distance to centroid - covering radius` exceeds the best match so far
//! 3. Scan the points of each surviving leaf
//! 4. Map the winning record's country code to a display name
//!
//! Well-distributed data gives `O(log n)` expected query time; pathological
//! layouts degrade toward a full scan.
//!
//! # Thread Safety
//!
//! [`ReverseGeocoder`] is `Send + Sync` and never mutates after construction.
//! Share it with `Arc`:
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use revgeo::{CountryNameTable, IndexConfig, PointRecord, PointStore, ReverseGeocoder};
//!
//! let store = PointStore::new(vec![
//!     PointRecord::from_degrees(40.7128, -74.0060, "New York", Some("US")),
//!     PointRecord::from_degrees(35.6762, 139.6503, "Tokyo", Some("JP")),
//! ]);
//! let geocoder = Arc::new(
//!     ReverseGeocoder::new(store, CountryNameTable::default(), IndexConfig::default()).unwrap(),
//! );
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let geocoder = Arc::clone(&geocoder);
//!         thread::spawn(move || geocoder.lookup(40.0 + i as f64, -74.0).unwrap())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap().place, "New York");
//! }
//! ```
//!
//! To refresh the data, build a new geocoder and swap it in through a
//! [`GeocoderHandle`]; the live tree is never modified in place.
//!
//! # Data Sources
//!
//! The loader expects the [GeoNames](https://www.geonames.org/) `allCountries.txt`
//! dump (or any per-country extract) and `countryInfo.txt`. Downloading them is
//! left to the caller.

#![warn(missing_docs)]

pub mod country;
pub mod error;
pub mod geocoder;
pub mod index;
pub mod loader;
pub mod metric;
pub mod store;
pub mod types;

pub use country::CountryNameTable;
pub use error::{Error, MalformedRecord, Result};
pub use geocoder::{GeocoderHandle, ReverseGeocoder};
pub use index::{IndexConfig, Neighbor, SphericalIndex};
pub use store::{PointRecord, PointStore};
pub use types::{Location, Place, Point};
