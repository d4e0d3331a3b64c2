//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use crate::catalog::{Catalog, Course, CourseTable, PanelSpec};
use crate::math::Point3;

/// Installs a test-writer `tracing` subscriber once per test binary.
///
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=formwork_layout=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Plan points at `z = 0`.
pub fn pts(coords: &[(f64, f64)]) -> Vec<Point3> {
    coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect()
}

/// Counter-clockwise 1000x800 rectangle starting at the origin.
pub fn rect_ccw() -> Vec<Point3> {
    pts(&[(0.0, 0.0), (1000.0, 0.0), (1000.0, 800.0), (0.0, 800.0)])
}

/// Counter-clockwise outer rectangle and clockwise inner rectangle,
/// concatenated with a diagonal seam from (0,800) to (200,200).
pub fn nested_flat() -> Vec<Point3> {
    pts(&[
        (0.0, 0.0),
        (1000.0, 0.0),
        (1000.0, 800.0),
        (0.0, 800.0),
        (200.0, 200.0),
        (200.0, 600.0),
        (800.0, 600.0),
        (800.0, 200.0),
    ])
}

/// Wall panel widths {600, 450, 300, 150, 100, 50}.
pub fn wall_catalog() -> Catalog {
    Catalog::from_panels(&[
        (600, "P600"),
        (450, "P450"),
        (300, "P300"),
        (150, "P150"),
        (100, "P100"),
        (50, "P050"),
    ])
    .unwrap()
}

/// 1350 and 600 high courses, each with the full wall panel width range.
///
/// Panel ids are `WP{height}x{width}`, posts `IC{height}` / `OC{height}`.
pub fn two_course_table() -> CourseTable {
    let widths = [600, 450, 300, 150, 100, 50];
    let course = |h: u32| Course {
        height: h,
        panels: Catalog::new(
            widths
                .iter()
                .map(|&w| PanelSpec::panel(w, format!("WP{h}x{w}")))
                .collect(),
        )
        .unwrap(),
        inside_post_id: format!("IC{h}"),
        outside_post_id: format!("OC{h}"),
    };
    CourseTable::new(vec![course(600), course(1350)]).unwrap()
}
