use crate::error::{GeometryError, Result};
use crate::math::{polygon_2d, PointKey, Point3};

/// Rotational direction in which a loop's corners are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    /// Returns the opposite winding.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// `+1.0` for counter-clockwise, `-1.0` for clockwise.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// A closed, ordered sequence of wall corners.
///
/// The last corner implicitly connects back to the first. Construction
/// guarantees at least three corners and no two consecutive corners at the
/// same position (including the wrap from last to first).
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    points: Vec<Point3>,
}

impl Loop {
    /// Creates a loop from ordered corners.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateLoop` if fewer than three corners are
    /// given or two consecutive corners coincide.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::DegenerateLoop(format!(
                "{} corners, at least 3 required",
                points.len()
            ))
            .into());
        }
        let n = points.len();
        for i in 0..n {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            if PointKey::new(a) == PointKey::new(b) {
                return Err(GeometryError::DegenerateLoop(format!(
                    "repeated corner at ({}, {})",
                    a.x, a.y
                ))
                .into());
            }
        }
        Ok(Self { points })
    }

    /// Returns the corners in order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the number of corners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a loop holds at least three corners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the corner after `i`, wrapping to the loop start.
    #[must_use]
    pub fn next_index(&self, i: usize) -> usize {
        (i + 1) % self.points.len()
    }

    /// Index of the corner before `i`, wrapping to the loop end.
    #[must_use]
    pub fn prev_index(&self, i: usize) -> usize {
        (i + self.points.len() - 1) % self.points.len()
    }

    /// Shoelace signed area: positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        polygon_2d::signed_area_2d(&self.points)
    }

    /// Returns a loop with the corners in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Returns `true` if every edge is parallel to the X or Y axis within
    /// `tolerance` (in drawing units of perpendicular drift).
    #[must_use]
    pub fn is_rectilinear(&self, tolerance: f64) -> bool {
        let n = self.points.len();
        (0..n).all(|i| {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            (b.x - a.x).abs() < tolerance || (b.y - a.y).abs() < tolerance
        })
    }
}

/// The loops of one floor plan, with nesting and winding resolved.
#[derive(Debug, Clone)]
pub struct LoopSet {
    pub loops: Vec<Loop>,
    /// Index into `loops` of the outer wall boundary.
    pub outer: usize,
    /// Winding of each loop, parallel to `loops`.
    pub windings: Vec<Winding>,
    /// Last index of the first loop in the flat corner list it was split
    /// from, or `None` if the loops were given explicitly.
    pub first_loop_end: Option<usize>,
}

impl LoopSet {
    /// Total number of corners across all loops.
    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.loops.iter().map(Loop::len).sum()
    }

    /// Iterates `(loop_index, local_index, point)` in flat order.
    pub fn corners(&self) -> impl Iterator<Item = (usize, usize, &Point3)> {
        self.loops
            .iter()
            .enumerate()
            .flat_map(|(li, l)| l.points().iter().enumerate().map(move |(i, p)| (li, i, p)))
    }
}
