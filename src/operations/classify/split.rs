use crate::math::{is_integral, polygon_2d, Point3};

/// Component tolerance for "axis-aligned" unit directions.
const CARDINAL_TOLERANCE: f64 = 1e-6;

/// Returns the index of the first corner whose outgoing direction is not
/// axis-aligned, wrapping from the last corner to the first.
///
/// Zero-length steps are ignored.
#[must_use]
pub fn find_seam(corners: &[Point3]) -> Option<usize> {
    let n = corners.len();
    (0..n).find(|&i| {
        let Ok(dir) = polygon_2d::segment_direction(&corners[i], &corners[(i + 1) % n]) else {
            return false;
        };
        !(is_integral(dir.x, CARDINAL_TOLERANCE) && is_integral(dir.y, CARDINAL_TOLERANCE))
    })
}

/// Splits a flat corner list into at most two loops at the seam edge.
///
/// Corners up to and including the seam corner form the first loop, the rest
/// the second. Returns the split loops and the index of the first loop's
/// last corner. Without a seam, or when the only diagonal is the closing
/// edge, the whole list is one loop.
#[must_use]
pub fn split_at_seam(corners: &[Point3]) -> (Vec<Vec<Point3>>, usize) {
    let n = corners.len();
    match find_seam(corners) {
        Some(end) if end + 1 < n => (
            vec![corners[..=end].to_vec(), corners[end + 1..].to_vec()],
            end,
        ),
        _ => (vec![corners.to_vec()], n.saturating_sub(1)),
    }
}
