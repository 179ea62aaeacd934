//! Core coordinate and response types.
//!
//! Degrees and radians never share a type:
//!
//! - [`Location`] - Caller-facing coordinate pair in decimal degrees
//! - [`Point`] - Index-facing coordinate pair in radians
//! - [`Place`] - The reverse geocoding response
//!
//! The only conversions between the two coordinate types are
//! [`Location::to_point`] and [`Point::to_location`].

use serde::{Deserialize, Serialize};

use crate::metric;

/// A position on the unit sphere, in radians.
///
/// Latitude lies in `[-π/2, π/2]` and longitude in `(-π, π]` when the point
/// was produced by [`Location::to_point`]. All distance computations in the
/// crate take `Point`s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in radians.
    pub latitude: f64,
    /// Longitude in radians.
    pub longitude: f64,
}

impl Point {
    /// Constructs a point from radian coordinates without normalising them.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts decimal degrees to a radian point, wrapping the longitude into `(-180, 180]` first.
    ///
    /// ```
    /// use revgeo::Point;
    ///
    /// let a = Point::from_degrees(0.0, 180.0);
    /// let b = Point::from_degrees(0.0, -180.0);
    /// assert_eq!(a, b);
    /// ```
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Location::new(latitude, longitude).to_point()
    }

    /// Converts back to decimal degrees.
    pub fn to_location(self) -> Location {
        Location {
            latitude: self.latitude.to_degrees(),
            longitude: self.longitude.to_degrees(),
        }
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A coordinate pair in decimal degrees.
///
/// This is what callers hand to the geocoder. It must be converted with
/// [`Location::to_point`] before it reaches the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl Location {
    /// Constructs a new Location from coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use revgeo::Location;
    ///
    /// let loc = Location::new(40.7128, -74.0060);
    /// assert_eq!(loc.latitude, 40.7128);
    /// assert_eq!(loc.longitude, -74.0060);
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts to radians, wrapping the longitude into `(-180, 180]`.
    pub fn to_point(self) -> Point {
        Point {
            latitude: self.latitude.to_radians(),
            longitude: normalize_longitude(self.longitude).to_radians(),
        }
    }

    /// Returns true if the latitude lies in `[-90, 90]` and both values are finite.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Calculates the great-circle distance to another location in kilometers.
    ///
    /// Assumes a spherical Earth of radius [`metric::EARTH_RADIUS_KM`].
    ///
    /// # Examples
    ///
    /// ```
    /// use revgeo::Location;
    ///
    /// let nyc = Location::new(40.7128, -74.0060);
    /// let la = Location::new(34.0522, -118.2437);
    ///
    /// let distance = nyc.distance_km(&la);
    /// assert!(distance > 3900.0 && distance < 4000.0); // ~3944 km
    /// ```
    pub fn distance_km(&self, other: &Location) -> f64 {
        metric::distance(self.to_point(), other.to_point()) * metric::EARTH_RADIUS_KM
    }
}

/// Wraps a longitude in degrees into `(-180, 180]`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = longitude.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// The reverse geocoding response.
///
/// Serialises to `{"place": ..., "countryCode": ..., "country": ...}`.
///
/// ```
/// use revgeo::Place;
///
/// let place = Place {
///     place: "London".to_string(),
///     country_code: "GB".to_string(),
///     country: "United Kingdom".to_string(),
/// };
/// let json = serde_json::to_string(&place).unwrap();
/// assert_eq!(json, r#"{"place":"London","countryCode":"GB","country":"United Kingdom"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Name of the nearest known place (e.g., "New York", "Tokyo")
    pub place: String,
    /// ISO 3166-1 alpha-2 code, empty when the record carried none
    pub country_code: String,
    /// Display name of the country, or the code itself when unmapped
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longitude_wraps_into_half_open_range() {
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
        assert!((normalize_longitude(-74.006) + 74.006).abs() < 1e-9);
    }

    #[test]
    fn degrees_round_trip_through_point() {
        let loc = Location::new(51.5074, -0.1278);
        let back = loc.to_point().to_location();
        assert!((back.latitude - loc.latitude).abs() < 1e-12);
        assert!((back.longitude - loc.longitude).abs() < 1e-12);
    }

    #[test]
    fn validity_rejects_out_of_range_latitude() {
        assert!(Location::new(90.0, 0.0).is_valid());
        assert!(!Location::new(90.5, 0.0).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
        assert!(!Location::new(0.0, f64::INFINITY).is_valid());
        // longitude is wrapped, not rejected
        assert!(Location::new(0.0, 540.0).is_valid());
    }

    #[test]
    fn zero_distance_to_self() {
        let tokyo = Location::new(35.6762, 139.6503);
        assert_eq!(tokyo.distance_km(&tokyo), 0.0);
    }
}
