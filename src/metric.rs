//! Great-circle geometry on the unit sphere.
//!
//! [`distance`] is the only metric the index uses. It is symmetric, zero for
//! identical points, and satisfies the triangle inequality, which is what makes
//! ball-tree pruning sound.
//!
//! Non-finite inputs propagate NaN rather than panicking.

use crate::types::Point;

/// Mean Earth radius used to turn angular distances into kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle angular distance between two points, in radians.
///
/// Uses the haversine formula
/// `2 * asin(sqrt(sin²(Δlat/2) + cos(lat_a) * cos(lat_b) * sin²(Δlon/2)))`.
/// The inner term is clamped to `[0, 1]` so rounding near antipodal pairs
/// cannot push `asin` out of its domain.
///
/// ```
/// use revgeo::{metric, Point};
///
/// let north = Point::from_degrees(90.0, 0.0);
/// let south = Point::from_degrees(-90.0, 0.0);
/// assert!((metric::distance(north, south) - std::f64::consts::PI).abs() < 1e-12);
/// ```
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    let half_dlat = (b.latitude - a.latitude) / 2.0;
    let half_dlon = (b.longitude - a.longitude) / 2.0;

    let h = half_dlat.sin().powi(2)
        + a.latitude.cos() * b.latitude.cos() * half_dlon.sin().powi(2);

    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Converts a point to a 3D Cartesian unit vector.
#[inline]
pub fn to_unit_vector(p: Point) -> [f64; 3] {
    let (sin_lat, cos_lat) = p.latitude.sin_cos();
    let (sin_lon, cos_lon) = p.longitude.sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

/// Projects a 3D vector back onto the sphere.
///
/// Returns `None` when the vector is too short to have a direction, which
/// happens when averaging perfectly opposed points.
pub fn from_unit_vector(v: [f64; 3]) -> Option<Point> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if norm.is_nan() || norm <= f64::EPSILON {
        return None;
    }
    let [x, y, z] = [v[0] / norm, v[1] / norm, v[2] / norm];
    Some(Point::new(z.clamp(-1.0, 1.0).asin(), y.atan2(x)))
}

/// Spherical centroid of a set of points: the renormalised mean of their unit vectors.
///
/// Averaging vectors rather than raw latitude/longitude keeps sets that
/// straddle the antimeridian centred on it instead of on the prime meridian.
pub fn centroid<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut sum = [0.0; 3];
    let mut count = 0usize;
    for p in points {
        let v = to_unit_vector(p);
        sum[0] += v[0];
        sum[1] += v[1];
        sum[2] += v[2];
        count += 1;
    }
    if count == 0 {
        return None;
    }
    from_unit_vector(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-12;

    fn random_point(rng: &mut StdRng) -> Point {
        Point::from_degrees(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..180.0))
    }

    #[test]
    fn symmetric_and_zero_on_self() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let a = random_point(&mut rng);
            let b = random_point(&mut rng);
            assert_eq!(distance(a, b), distance(b, a));
            assert_eq!(distance(a, a), 0.0);
        }
    }

    #[test]
    fn triangle_inequality() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let a = random_point(&mut rng);
            let b = random_point(&mut rng);
            let c = random_point(&mut rng);
            assert!(distance(a, c) <= distance(a, b) + distance(b, c) + TOLERANCE);
        }
    }

    #[test]
    fn antimeridian_is_seamless() {
        let east = Point::from_degrees(10.0, 179.9);
        let west = Point::from_degrees(10.0, -179.9);
        // 0.2 degrees of longitude at 10N
        let expected = (0.2_f64.to_radians()) * 10.0_f64.to_radians().cos();
        assert!((distance(east, west) - expected).abs() < 1e-6);
    }

    #[test]
    fn longitude_is_irrelevant_at_the_pole() {
        let a = Point::from_degrees(90.0, 0.0);
        let b = Point::from_degrees(90.0, 123.0);
        assert!(distance(a, b) < TOLERANCE);
    }

    #[test]
    fn nan_propagates() {
        let a = Point::new(f64::NAN, 0.0);
        let b = Point::new(0.0, 0.0);
        assert!(distance(a, b).is_nan());
    }

    #[test]
    fn unit_vector_round_trip() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let p = random_point(&mut rng);
            let back = from_unit_vector(to_unit_vector(p)).unwrap();
            assert!(distance(p, back) < 1e-9);
        }
    }

    #[test]
    fn centroid_straddling_antimeridian_stays_on_it() {
        let points = [
            Point::from_degrees(0.0, 179.0),
            Point::from_degrees(0.0, -179.0),
        ];
        let c = centroid(points).unwrap();
        assert!(c.latitude.abs() < 1e-12);
        assert!((c.longitude.abs() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_opposed_points_is_undefined() {
        let points = [Point::from_degrees(0.0, 0.0), Point::from_degrees(0.0, 180.0)];
        assert!(centroid(points).is_none());
        assert!(centroid(std::iter::empty()).is_none());
    }
}
