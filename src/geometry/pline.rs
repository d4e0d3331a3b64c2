use crate::math::{PointKey, Point3};

/// A host polyline as read from the drawing.
///
/// Only straight segments are modelled: wall outlines are rectilinear. For
/// closed polylines the last vertex connects back to the first; some hosts
/// also repeat the first vertex at the end, which [`Pline::distinct_vertices`]
/// strips.
#[derive(Debug, Clone, PartialEq)]
pub struct Pline {
    pub vertices: Vec<Point3>,
    pub closed: bool,
}

impl Pline {
    /// Creates a `Pline` from plan points.
    #[must_use]
    pub fn from_points(points: &[Point3], closed: bool) -> Self {
        Self {
            vertices: points.to_vec(),
            closed,
        }
    }

    /// Creates a closed `Pline` from `(x, y)` pairs at `z = 0`.
    #[must_use]
    pub fn closed_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            vertices: coords
                .iter()
                .map(|&(x, y)| Point3::new(x, y, 0.0))
                .collect(),
            closed: true,
        }
    }

    /// Returns the vertices with consecutive duplicates removed.
    ///
    /// A trailing vertex equal to the first one is treated as explicit
    /// closure and dropped as well.
    #[must_use]
    pub fn distinct_vertices(&self) -> Vec<Point3> {
        let mut out: Vec<Point3> = Vec::with_capacity(self.vertices.len());
        let mut last_key: Option<PointKey> = None;
        for p in &self.vertices {
            let key = PointKey::new(p);
            if last_key == Some(key) {
                continue;
            }
            out.push(*p);
            last_key = Some(key);
        }
        if out.len() > 1 {
            let first = PointKey::new(&out[0]);
            if out.last().map(PointKey::new) == Some(first) {
                out.pop();
            }
        }
        out
    }
}
