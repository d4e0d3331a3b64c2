//! Stock-size tiling of wall runs, corners and course heights.

pub mod corner_layout;
pub mod course;
pub mod run;
pub mod symmetry;
pub mod wall_layout;

pub use corner_layout::{CornerHardware, CornerLayout, Face, MAX_FACE_PANELS};
pub use course::{CourseLayer, StackCourses};
pub use run::{TileRun, TimberFallback};
pub use symmetry::center_remainder;
pub use wall_layout::LayoutWalls;

use crate::catalog::PanelSpec;

/// One catalog piece at an offset along a run or course.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub spec: PanelSpec,
    pub position_along_run: f64,
    pub height_above_base: f64,
}

impl Tile {
    /// Offset of the tile's far end along the run.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.position_along_run + self.spec.len_f64()
    }
}
