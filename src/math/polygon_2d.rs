use super::{Point3, Vector3, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. An explicitly
/// closed input (last point equal to the first) gives the same result.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the normalized direction from point `a` to point `b` in the XY plane.
///
/// # Errors
///
/// Returns `GeometryError::ZeroLengthSegment` if the segment has zero length.
pub fn segment_direction(a: &Point3, b: &Point3) -> Result<Vector3> {
    let d = b - a;
    let len = (d.x * d.x + d.y * d.y).sqrt();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroLengthSegment { x: a.x, y: a.y }.into());
    }
    Ok(Vector3::new(d.x / len, d.y / len, 0.0))
}

/// Plan length of the segment `a`→`b`, ignoring `z`.
#[must_use]
pub fn plan_distance(a: &Point3, b: &Point3) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Z component of `(cur - prev) × (next - cur)`.
///
/// Positive for a left (counter-clockwise) turn at `cur`, negative for a
/// right turn, zero when the three points are collinear.
#[must_use]
pub fn turn_cross(prev: &Point3, cur: &Point3, next: &Point3) -> f64 {
    let a = cur - prev;
    let b = next - cur;
    a.x * b.y - a.y * b.x
}

/// Unsigned turn angle at `cur` between the incoming and outgoing directions.
///
/// `0` means straight on, `π/2` a square corner, `π` a full reversal.
///
/// # Errors
///
/// Returns `GeometryError::ZeroLengthSegment` if either adjacent segment has
/// zero length.
pub fn turn_angle(prev: &Point3, cur: &Point3, next: &Point3) -> Result<f64> {
    let incoming = segment_direction(prev, cur)?;
    let outgoing = segment_direction(cur, next)?;
    Ok(incoming.dot(&outgoing).clamp(-1.0, 1.0).acos())
}

/// Returns the index and value of the maximum x coordinate.
///
/// Ties keep the earlier point: only a strictly greater x moves the maximum.
#[must_use]
pub fn rightmost(points: &[Point3]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        match best {
            Some((_, x)) if p.x <= x => {}
            _ => best = Some((i, p.x)),
        }
    }
    best
}
