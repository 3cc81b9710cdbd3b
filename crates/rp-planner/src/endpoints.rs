//! Route anchor selection from an existing geometry.

use rp_core::GeoPoint;

/// The two points of `points` that are farthest apart in planar lat/lon
/// distance.
///
/// Exhaustive O(n²) comparison; route geometries are tens of points.  The
/// first pair (in `(i, j)`, `i < j` order) reaching the maximum is kept.
/// A single point pairs with itself.  Non-finite points are ignored; a
/// geometry without a finite point has no endpoints.
pub fn select_endpoints(points: &[GeoPoint]) -> Option<(GeoPoint, GeoPoint)> {
    let points: Vec<GeoPoint> = points.iter().copied().filter(|p| p.is_finite()).collect();
    let (&first, _) = points.split_first()?;

    let mut best: Option<(f64, GeoPoint, GeoPoint)> = None;
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            let d = a.planar_distance_2(b);
            match best {
                Some((best_d, _, _)) if d <= best_d => {}
                _ => best = Some((d, a, b)),
            }
        }
    }

    Some(best.map_or((first, first), |(_, a, b)| (a, b)))
}
