pub mod angle;
pub mod polygon_2d;
pub mod quantize;

pub use angle::Cardinal;
pub use quantize::PointKey;

/// 3D point type. Plan positions use `z` for the height above the slab.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for lengths expressed in catalog units (mm).
///
/// Run lengths measured from drawing coordinates carry rounding noise, so
/// `999.9999999` must still take a 1000 panel.
pub const LENGTH_TOLERANCE: f64 = 1e-6;

/// Returns `true` if `value` is within `tolerance` of an integer.
#[must_use]
pub fn is_integral(value: f64, tolerance: f64) -> bool {
    (value - value.round()).abs() < tolerance
}
