use rustc_hash::FxHashMap;

use crate::error::{GeometryError, LayoutError};
use crate::geometry::{LoopSet, Winding};
use crate::math::{polygon_2d, Cardinal, Point3, TOLERANCE};

/// Default rotation snapping tolerance in radians.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 0.15;

/// Placement frame of one corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerFrame {
    pub position: Point3,
    /// Hardware rotation: the run direction, turned a quarter at reflex corners.
    pub rotation: Cardinal,
    /// Direction of the outgoing wall run, towards the next corner.
    pub run_direction: Cardinal,
    /// Direction back along the incoming wall run, towards the previous
    /// corner. `None` when that edge is not axis-aligned.
    pub back_direction: Option<Cardinal>,
    pub is_inside: bool,
    /// The loop turns against its own winding here.
    pub is_reflex: bool,
    pub loop_index: usize,
    /// Index of the corner within its loop.
    pub local_index: usize,
    /// Index in flat order across all loops.
    pub corner_index: usize,
    /// Plan length of the outgoing run.
    pub run_length: f64,
    /// Plan length of the incoming run.
    pub back_length: f64,
}

impl CornerFrame {
    /// Rotation in radians, in `[0, 2π)`.
    #[must_use]
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.radians()
    }
}

/// A corner that produced no frame.
#[derive(Debug)]
pub struct SkippedCorner {
    pub corner_index: usize,
    pub error: LayoutError,
}

/// Frames for every corner that could be resolved, in flat corner order.
#[derive(Debug, Default)]
pub struct CornerFrames {
    pub frames: Vec<CornerFrame>,
    pub skipped: Vec<SkippedCorner>,
    index: FxHashMap<(usize, usize), usize>,
}

impl CornerFrames {
    /// Looks up the frame of a corner by loop and local index.
    #[must_use]
    pub fn get(&self, loop_index: usize, local_index: usize) -> Option<&CornerFrame> {
        self.index
            .get(&(loop_index, local_index))
            .map(|&i| &self.frames[i])
    }

    fn push(&mut self, frame: CornerFrame) {
        self.index
            .insert((frame.loop_index, frame.local_index), self.frames.len());
        self.frames.push(frame);
    }
}

/// Computes a [`CornerFrame`] for each corner of a [`LoopSet`].
///
/// A corner is classified inside when:
/// 1. it lies on a loop other than the outer one,
/// 2. inverted if its loop winds clockwise,
/// 3. inverted again at a reflex vertex, which also turns the rotation a
///    quarter counter-clockwise.
///
/// Corners whose run direction does not snap to a [`Cardinal`] are skipped
/// and recorded in [`CornerFrames::skipped`].
#[derive(Debug)]
pub struct BuildCornerFrames<'a> {
    loops: &'a LoopSet,
    snap_tolerance: f64,
}

impl<'a> BuildCornerFrames<'a> {
    /// Creates a frame builder with the default snapping tolerance.
    #[must_use]
    pub fn new(loops: &'a LoopSet) -> Self {
        Self {
            loops,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }

    /// Sets the rotation snapping tolerance in radians.
    #[must_use]
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Builds the frames.
    #[must_use]
    pub fn execute(&self) -> CornerFrames {
        let mut out = CornerFrames::default();
        out.frames.reserve(self.loops.corner_count());
        for (corner_index, (loop_index, local_index, _)) in self.loops.corners().enumerate() {
            match self.frame_at(corner_index, loop_index, local_index) {
                Ok(frame) => out.push(frame),
                Err(error) => {
                    tracing::warn!(corner = corner_index, %error, "Skipping corner");
                    out.skipped.push(SkippedCorner {
                        corner_index,
                        error,
                    });
                }
            }
        }
        tracing::debug!(
            frames = out.frames.len(),
            skipped = out.skipped.len(),
            "Corner frames built"
        );
        out
    }

    fn frame_at(
        &self,
        corner_index: usize,
        loop_index: usize,
        local_index: usize,
    ) -> Result<CornerFrame, LayoutError> {
        let l = &self.loops.loops[loop_index];
        let winding = self.loops.windings[loop_index];
        let pts = l.points();
        let cur = pts[local_index];
        let prev = pts[l.prev_index(local_index)];
        // The far point wraps within the loop, so the seam corner closes back
        // onto its own loop start.
        let next = pts[l.next_index(local_index)];

        let outgoing = polygon_2d::segment_direction(&cur, &next)?;
        let raw = outgoing.y.atan2(outgoing.x);
        let run_direction =
            Cardinal::snap(raw, self.snap_tolerance).ok_or(GeometryError::UnrecognizedRotation {
                corner: corner_index,
                angle: raw,
            })?;
        let back_direction = polygon_2d::segment_direction(&cur, &prev)
            .ok()
            .and_then(|d| Cardinal::from_direction(&d, self.snap_tolerance));

        let mut is_inside = loop_index != self.loops.outer;
        if winding == Winding::Clockwise {
            is_inside = !is_inside;
        }

        let turn = polygon_2d::turn_cross(&prev, &cur, &next) * winding.sign();
        let is_reflex = turn < -TOLERANCE;
        let mut rotation = run_direction;
        if is_reflex {
            is_inside = !is_inside;
            rotation = rotation.quarter_turn();
        }

        Ok(CornerFrame {
            position: cur,
            rotation,
            run_direction,
            back_direction,
            is_inside,
            is_reflex,
            loop_index,
            local_index,
            corner_index,
            run_length: polygon_2d::plan_distance(&cur, &next),
            back_length: polygon_2d::plan_distance(&cur, &prev),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::classify::ClassifyLoops;
    use crate::test_support::{nested_flat, pts, rect_ccw};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn frames_of(corners: &[Point3]) -> CornerFrames {
        let set = ClassifyLoops::from_flat(corners).execute().unwrap();
        BuildCornerFrames::new(&set).execute()
    }

    #[test]
    fn rectangle_all_outside_in_cardinal_order() {
        let frames = frames_of(&rect_ccw());
        assert_eq!(frames.frames.len(), 4);
        assert!(frames.skipped.is_empty());
        assert!(frames.frames.iter().all(|f| !f.is_inside));
        let rotations: Vec<f64> = frames.frames.iter().map(CornerFrame::rotation_radians).collect();
        let expected = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
        for (r, e) in rotations.iter().zip(expected) {
            assert!((r - e).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn reversed_rectangle_inverts_every_corner() {
        let mut rev = rect_ccw();
        rev.reverse();
        let a = frames_of(&rect_ccw());
        let b = frames_of(&rev);
        assert_eq!(a.frames.len(), b.frames.len());
        assert!(b.frames.iter().all(|f| f.is_inside));
    }

    #[test]
    fn inner_loop_corners_are_inside() {
        // Inner loop counter-clockwise, like the outer one.
        let flat = pts(&[
            (0.0, 0.0),
            (1000.0, 0.0),
            (1000.0, 800.0),
            (0.0, 800.0),
            (200.0, 200.0),
            (800.0, 200.0),
            (800.0, 600.0),
            (200.0, 600.0),
        ]);
        let frames = frames_of(&flat);
        assert_eq!(frames.frames.len(), 8);
        for f in &frames.frames {
            assert_eq!(f.is_inside, f.loop_index == 1, "corner {}", f.corner_index);
        }
    }

    #[test]
    fn seam_corner_closes_onto_its_own_loop() {
        let frames = frames_of(&nested_flat());
        assert!(frames.skipped.is_empty());
        // Corner 3 is (0,800); its run closes back to (0,0).
        let seam = frames.get(0, 3).unwrap();
        assert_eq!(seam.run_direction, Cardinal::South);
        assert!((seam.run_length - 800.0).abs() < 1e-9);
        // Last inner corner (800,200) closes to (200,200).
        let last = frames.get(1, 3).unwrap();
        assert_eq!(last.run_direction, Cardinal::West);
    }

    #[test]
    fn reflex_corner_rotates_and_inverts() {
        let l_shape = pts(&[
            (0.0, 0.0),
            (2000.0, 0.0),
            (2000.0, 1000.0),
            (1000.0, 1000.0),
            (1000.0, 2000.0),
            (0.0, 2000.0),
        ]);
        let frames = frames_of(&l_shape);
        let reflex = frames.get(0, 3).unwrap();
        assert!(reflex.is_reflex);
        assert!(reflex.is_inside);
        assert_eq!(reflex.run_direction, Cardinal::North);
        assert_eq!(reflex.rotation, Cardinal::West);
        let convex: Vec<_> = frames.frames.iter().filter(|f| !f.is_reflex).collect();
        assert_eq!(convex.len(), 5);
        assert!(convex.iter().all(|f| !f.is_inside));
    }

    #[test]
    fn diagonal_run_is_skipped() {
        let chamfered = pts(&[
            (0.0, 0.0),
            (1000.0, 0.0),
            (1000.0, 700.0),
            (900.0, 800.0),
            (0.0, 800.0),
        ]);
        let set = ClassifyLoops::from_loops(vec![chamfered]).execute().unwrap();
        let frames = BuildCornerFrames::new(&set).execute();
        assert_eq!(frames.frames.len(), 4);
        assert_eq!(frames.skipped.len(), 1);
        assert_eq!(frames.skipped[0].corner_index, 2);
        assert!(frames.skipped[0].error.is_recoverable());
        // The corner after the chamfer keeps its frame but has no back face.
        let after = frames.get(0, 3).unwrap();
        assert_eq!(after.back_direction, None);
    }

    #[test]
    fn snap_tolerance_controls_skew_acceptance() {
        // Right edge leans by ~0.1 rad.
        let skewed = pts(&[(0.0, 0.0), (1000.0, 0.0), (1080.0, 800.0), (0.0, 800.0)]);
        let set = ClassifyLoops::from_loops(vec![skewed]).execute().unwrap();
        let strict = BuildCornerFrames::new(&set).with_snap_tolerance(0.05).execute();
        let loose = BuildCornerFrames::new(&set).with_snap_tolerance(0.19).execute();
        assert_eq!(strict.skipped.len(), 1);
        assert!(loose.skipped.is_empty());
    }

    fn assert_reversal_inverts(loops: Vec<Vec<Point3>>) {
        let reversed: Vec<Vec<Point3>> = loops
            .iter()
            .map(|l| l.iter().rev().copied().collect())
            .collect();
        let fwd = BuildCornerFrames::new(&ClassifyLoops::from_loops(loops).execute().unwrap())
            .execute();
        let rev = BuildCornerFrames::new(&ClassifyLoops::from_loops(reversed).execute().unwrap())
            .execute();
        assert!(fwd.skipped.is_empty() && rev.skipped.is_empty());
        assert_eq!(fwd.frames.len(), rev.frames.len());
        for f in &fwd.frames {
            let r = rev
                .frames
                .iter()
                .find(|r| r.loop_index == f.loop_index && (r.position - f.position).norm() < 1e-9)
                .unwrap();
            assert_ne!(f.is_inside, r.is_inside, "corner at {:?}", f.position);
            assert_eq!(f.is_reflex, r.is_reflex);
        }
    }

    #[test]
    fn reversed_l_shape_inverts_every_corner() {
        assert_reversal_inverts(vec![pts(&[
            (0.0, 0.0),
            (2000.0, 0.0),
            (2000.0, 1000.0),
            (1000.0, 1000.0),
            (1000.0, 2000.0),
            (0.0, 2000.0),
        ])]);
    }

    #[test]
    fn reversed_nested_loops_invert_every_corner() {
        let flat = nested_flat();
        assert_reversal_inverts(vec![flat[..4].to_vec(), flat[4..].to_vec()]);
    }
}
