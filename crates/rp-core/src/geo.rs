//! Geographic coordinate type and distance helpers.
//!
//! `GeoPoint` uses `f32` latitude/longitude (~1 m precision at the
//! equator), which is plenty for snapping route anchors to road nodes.
//! Distances are accumulated in `f64`.

/// A WGS-84 geographic coordinate stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// `true` if both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Squared Euclidean distance in degree space.
    #[inline]
    pub fn planar_distance_2(self, other: GeoPoint) -> f64 {
        let dlat = other.lat as f64 - self.lat as f64;
        let dlon = other.lon as f64 - self.lon as f64;
        dlat * dlat + dlon * dlon
    }

    /// Euclidean distance in degree space.  Good enough to compare
    /// distances within one city; not a length in metres.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        self.planar_distance_2(other).sqrt()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat as f64 - self.lat as f64).to_radians();
        let d_lon = (other.lon as f64 - self.lon as f64).to_radians();

        let lat1 = (self.lat as f64).to_radians();
        let lat2 = (other.lat as f64).to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
