mod split;
mod winding;

pub use split::{find_seam, split_at_seam};
pub use winding::winding_of;

use crate::error::{GeometryError, Result};
use crate::geometry::{Loop, LoopSet};
use crate::math::{polygon_2d, Point3, LENGTH_TOLERANCE};

#[derive(Debug)]
enum LoopInput {
    /// One flat list holding up to two loops joined by a seam edge.
    Flat(Vec<Point3>),
    /// Loops already separated by the host geometry.
    Explicit(Vec<Vec<Point3>>),
}

/// Splits corners into loops and resolves the outer loop and each loop's
/// winding.
///
/// The outer loop is the one holding the rightmost corner. Degenerate loops
/// (fewer than three corners, repeated corners) are dropped with a warning.
/// Loops with edges off the X and Y axes are kept with a warning; their
/// skewed corners are skipped when frames are built.
#[derive(Debug)]
pub struct ClassifyLoops {
    input: LoopInput,
}

impl ClassifyLoops {
    /// Classifies a flat corner list drawn as two back-to-back loops.
    ///
    /// The first non-axis-aligned step marks the seam between the loops.
    #[must_use]
    pub fn from_flat(corners: &[Point3]) -> Self {
        Self {
            input: LoopInput::Flat(corners.to_vec()),
        }
    }

    /// Classifies loops that are already separated, e.g. one per polyline.
    #[must_use]
    pub fn from_loops(loops: Vec<Vec<Point3>>) -> Self {
        Self {
            input: LoopInput::Explicit(loops),
        }
    }

    /// Executes the classification.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::LoopCount` if no non-degenerate loop remains.
    pub fn execute(&self) -> Result<LoopSet> {
        let (raw, first_loop_end) = match &self.input {
            LoopInput::Flat(corners) => {
                let (loops, end) = split_at_seam(corners);
                (loops, Some(end))
            }
            LoopInput::Explicit(loops) => (loops.clone(), None),
        };

        let mut loops = Vec::with_capacity(raw.len());
        for (i, points) in raw.into_iter().enumerate() {
            match Loop::new(points) {
                Ok(l) => {
                    if !l.is_rectilinear(LENGTH_TOLERANCE) {
                        tracing::warn!(loop_index = i, "Loop has edges off the X and Y axes");
                    }
                    loops.push(l);
                }
                Err(err) => tracing::warn!(loop_index = i, %err, "Dropping degenerate loop"),
            }
        }
        if loops.is_empty() {
            return Err(GeometryError::LoopCount(0).into());
        }

        let outer = outer_loop(&loops);
        let windings = loops
            .iter()
            .enumerate()
            .map(|(i, l)| winding_of(l, i))
            .collect();

        tracing::debug!(loops = loops.len(), outer, "Loops classified");
        Ok(LoopSet {
            loops,
            outer,
            windings,
            first_loop_end,
        })
    }
}

/// Index of the loop holding the vertex that last raised the running
/// maximum x across all loops in order.
fn outer_loop(loops: &[Loop]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, l) in loops.iter().enumerate() {
        if let Some((_, x)) = polygon_2d::rightmost(l.points()) {
            match best {
                Some((_, bx)) if x <= bx => {}
                _ => best = Some((i, x)),
            }
        }
    }
    best.map_or(0, |(i, _)| i)
}
