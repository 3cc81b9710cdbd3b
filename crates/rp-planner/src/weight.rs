//! Edge cost functions.
//!
//! [`DensityWeight`] is the planner's default: `length / density`, so a
//! segment serving a denser population is cheaper to traverse.
//! [`LengthWeight`] ignores density and prices by physical length alone.
//!
//! Both return finite, non-negative costs for every input, including
//! missing, NaN, negative, or zero attributes.

use rp_network::{EdgeAttrs, EdgeWeight};

/// Length used when an edge has none (or an unusable one).
const DEFAULT_LENGTH: f32 = 1.0;

/// Density used when an edge has none.
const DEFAULT_DENSITY: f32 = 1.0;

/// Usable length of an edge: missing or NaN lengths fall back to 1,
/// negative lengths clamp to 0, infinite lengths clamp to `f32::MAX`.
///
/// The upper clamp keeps `length / density` finite in `f64` for any
/// positive density while still pricing the edge above every real path.
#[inline]
fn sanitized_length(attrs: &EdgeAttrs) -> f64 {
    match attrs.length_m {
        Some(len) if !len.is_nan() => len.clamp(0.0, f32::MAX) as f64,
        _ => DEFAULT_LENGTH as f64,
    }
}

// ── DensityWeight ─────────────────────────────────────────────────────────────

/// `cost = length / max(density, min_density)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DensityWeight {
    min_density: f32,
}

impl DensityWeight {
    /// Create a weight with the given density floor.  A floor that is not
    /// finite and strictly positive is replaced by 1.
    pub fn new(min_density: f32) -> Self {
        let min_density = if min_density.is_finite() && min_density > 0.0 {
            min_density
        } else {
            DEFAULT_DENSITY
        };
        Self { min_density }
    }

    pub fn min_density(&self) -> f32 {
        self.min_density
    }

    /// Density after defaulting and clamping.  Always `>= min_density`.
    #[inline]
    pub fn effective_density(&self, attrs: &EdgeAttrs) -> f64 {
        // f32::max returns the non-NaN operand, so NaN clamps to the floor.
        attrs
            .density
            .unwrap_or(DEFAULT_DENSITY)
            .max(self.min_density) as f64
    }
}

impl Default for DensityWeight {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY)
    }
}

impl EdgeWeight for DensityWeight {
    #[inline]
    fn cost(&self, attrs: &EdgeAttrs) -> f64 {
        sanitized_length(attrs) / self.effective_density(attrs)
    }
}

// ── LengthWeight ──────────────────────────────────────────────────────────────

/// `cost = length`.  Shortest physical path, population ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LengthWeight;

impl EdgeWeight for LengthWeight {
    #[inline]
    fn cost(&self, attrs: &EdgeAttrs) -> f64 {
        sanitized_length(attrs)
    }
}
