use super::Point3;

/// Grid spacing used by [`PointKey::new`], in drawing units.
pub const DEFAULT_QUANTUM: f64 = 1e-3;

/// Integer-quantized point, usable as a hash or ordered map key.
///
/// Two points that round to the same grid cell compare equal, so values
/// that differ only by floating-point noise deduplicate correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    /// Quantizes a point on the default grid.
    #[must_use]
    pub fn new(p: &Point3) -> Self {
        Self::with_quantum(p, DEFAULT_QUANTUM)
    }

    /// Quantizes a point on a grid of the given spacing.
    #[must_use]
    pub fn with_quantum(p: &Point3, quantum: f64) -> Self {
        Self {
            x: quantize(p.x, quantum),
            y: quantize(p.y, quantum),
            z: quantize(p.z, quantum),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(v: f64, quantum: f64) -> i64 {
    (v / quantum).round() as i64
}
