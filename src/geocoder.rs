//! The reverse geocoding façade.
//!
//! [`ReverseGeocoder`] bundles the place records, the spatial index built over
//! them, and the country name table into one immutable context object. Build
//! it once at startup and share it by reference or `Arc`.
//!
//! [`GeocoderHandle`] is for processes that reload their data: a fresh
//! geocoder is built off the hot path and swapped in whole, while in-flight
//! queries keep the instance they started with.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::country::CountryNameTable;
use crate::error::{Error, Result};
use crate::index::{IndexConfig, SphericalIndex};
use crate::loader;
use crate::store::PointStore;
use crate::types::{Location, Place};

/// Immutable reverse geocoding context.
///
/// # Examples
///
/// ```
/// use revgeo::{CountryNameTable, IndexConfig, PointRecord, PointStore, ReverseGeocoder};
///
/// let store = PointStore::new(vec![
///     PointRecord::from_degrees(40.7128, -74.0060, "New York", Some("US")),
///     PointRecord::from_degrees(51.5074, -0.1278, "London", Some("GB")),
/// ]);
/// let countries = CountryNameTable::from_pairs([("US", "United States")]);
/// let geocoder = ReverseGeocoder::new(store, countries, IndexConfig::default()).unwrap();
///
/// let place = geocoder.lookup(40.73, -73.99).unwrap();
/// assert_eq!(place.place, "New York");
/// assert_eq!(place.country, "United States");
///
/// // unmapped codes fall back to the code itself
/// assert_eq!(geocoder.lookup(51.50, -0.12).unwrap().country, "GB");
/// ```
#[derive(Debug, Default)]
pub struct ReverseGeocoder {
    store: PointStore,
    index: SphericalIndex,
    countries: CountryNameTable,
}

impl ReverseGeocoder {
    /// Builds the spatial index over `store` and wraps everything into a geocoder.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyIndex`] if `store` holds no records, or any error from
    /// [`SphericalIndex::build`].
    pub fn new(store: PointStore, countries: CountryNameTable, config: IndexConfig) -> Result<Self> {
        let index = SphericalIndex::from_store(&store, config)?;
        Ok(Self {
            store,
            index,
            countries,
        })
    }

    /// Loads a GeoNames place dump and a country info file, then builds the index.
    pub fn load<P, C>(places: P, countries: C, config: IndexConfig) -> Result<Self>
    where
        P: AsRef<Path>,
        C: AsRef<Path>,
    {
        let store = loader::load_places(places)?;
        let countries = CountryNameTable::load(countries)?;
        Self::new(store, countries, config)
    }

    /// Finds the place nearest to the given decimal-degree coordinates.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCoordinate`] if the latitude is outside [-90, 90] or either value is not finite
    /// - [`Error::EmptyIndex`] if the geocoder holds no places
    pub fn lookup(&self, latitude: f64, longitude: f64) -> Result<Place> {
        self.lookup_with_distance(latitude, longitude)
            .map(|(place, _)| place)
    }

    /// Like [`lookup`](Self::lookup), also returning the distance to the match in kilometers.
    pub fn lookup_with_distance(&self, latitude: f64, longitude: f64) -> Result<(Place, f64)> {
        let location = Location::new(latitude, longitude);
        if !location.is_valid() {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        let hit = self.index.nearest(location.to_point())?;
        let record = &self.store[hit.index];
        let code = record.country_code.as_deref().unwrap_or("");

        let place = Place {
            place: record.label.clone(),
            country_code: code.to_string(),
            country: self.countries.name_for(code).to_string(),
        };
        Ok((place, hit.distance_km()))
    }

    /// Number of indexed places.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no places are loaded. Every lookup on such a geocoder fails with [`Error::EmptyIndex`].
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The underlying spatial index.
    pub fn index(&self) -> &SphericalIndex {
        &self.index
    }

    /// The country name table.
    pub fn countries(&self) -> &CountryNameTable {
        &self.countries
    }
}

/// Shared, swappable reference to the live [`ReverseGeocoder`].
///
/// Cloning the handle is cheap and every clone sees the same geocoder. The
/// lock only guards the pointer: readers clone the inner `Arc` and query
/// without holding it.
#[derive(Debug, Clone)]
pub struct GeocoderHandle {
    live: Arc<RwLock<Arc<ReverseGeocoder>>>,
}

impl GeocoderHandle {
    /// Wraps an initial geocoder.
    pub fn new(geocoder: ReverseGeocoder) -> Self {
        Self {
            live: Arc::new(RwLock::new(Arc::new(geocoder))),
        }
    }

    /// The geocoder currently in service.
    pub fn current(&self) -> Arc<ReverseGeocoder> {
        let guard = self.live.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Puts `geocoder` into service and returns the one it replaced.
    pub fn replace(&self, geocoder: ReverseGeocoder) -> Arc<ReverseGeocoder> {
        let fresh = Arc::new(geocoder);
        let mut guard = self.live.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, fresh);
        tracing::info!(
            previous = previous.len(),
            current = guard.len(),
            "Swapped geocoder"
        );
        previous
    }

    /// Looks up against whichever geocoder is live at call time.
    pub fn lookup(&self, latitude: f64, longitude: f64) -> Result<Place> {
        self.current().lookup(latitude, longitude)
    }
}

impl Default for GeocoderHandle {
    fn default() -> Self {
        Self::new(ReverseGeocoder::default())
    }
}
