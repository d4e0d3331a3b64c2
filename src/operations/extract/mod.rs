mod throttle;

pub use throttle::ScanThrottle;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::geometry::pline::Pline;
use crate::math::{polygon_2d, PointKey, Point3};

const ANGLE_EPSILON: f64 = 1e-9;

/// Decides which polyline vertices count as corners.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CornerFilter {
    /// Keep every distinct vertex.
    KeepAll,
    /// Keep vertices whose turn angle reaches `degrees`.
    TurnAngle { degrees: f64 },
}

impl Default for CornerFilter {
    fn default() -> Self {
        Self::TurnAngle { degrees: 45.0 }
    }
}

impl CornerFilter {
    /// Returns `true` if a vertex with the given turn angle (radians) is kept.
    #[must_use]
    pub fn keeps(&self, turn_angle: f64) -> bool {
        match *self {
            Self::KeepAll => true,
            // Square corners must pass a 90° threshold despite acos rounding.
            Self::TurnAngle { degrees } => turn_angle > degrees.to_radians() - ANGLE_EPSILON,
        }
    }
}

/// Ordered corners extracted from one host polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerList {
    /// Index of the polyline in the scanned input.
    pub source: usize,
    pub corners: Vec<Point3>,
}

/// Extracts ordered corner lists from raw host polylines.
///
/// Each polyline is treated as closed. Polylines with fewer than three
/// distinct vertices produce nothing. The polyline's final vertex is always
/// part of its corner list, whether or not the filter picked it.
#[derive(Debug)]
pub struct ExtractCorners<'a> {
    plines: &'a [Pline],
    filter: CornerFilter,
    throttle: ScanThrottle,
}

impl<'a> ExtractCorners<'a> {
    /// Creates an extraction over the given polylines with the default
    /// 45° filter and no throttle.
    #[must_use]
    pub fn new(plines: &'a [Pline]) -> Self {
        Self {
            plines,
            filter: CornerFilter::default(),
            throttle: ScanThrottle::disabled(),
        }
    }

    /// Sets the corner filter.
    #[must_use]
    pub fn with_filter(mut self, filter: CornerFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the scan throttle.
    #[must_use]
    pub fn with_throttle(mut self, throttle: ScanThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Runs the extraction. An empty result means there is nothing to place.
    #[must_use]
    pub fn execute(&self) -> Vec<CornerList> {
        let mut out = Vec::new();
        for (source, pline) in self.plines.iter().enumerate() {
            if let Some(corners) = self.extract_one(source, pline) {
                out.push(CornerList { source, corners });
            }
            self.throttle.tick(source + 1);
        }
        tracing::debug!(
            scanned = self.plines.len(),
            extracted = out.len(),
            "Corner extraction complete"
        );
        out
    }

    fn extract_one(&self, source: usize, pline: &Pline) -> Option<Vec<Point3>> {
        let pts = pline.distinct_vertices();
        let n = pts.len();
        if n < 3 {
            tracing::debug!(source, vertices = n, "Skipping degenerate polyline");
            return None;
        }
        if !pline.closed {
            tracing::debug!(source, "Open polyline treated as closed");
        }

        let mut corners = Vec::with_capacity(n);
        let mut seen = FxHashSet::default();
        for i in 0..n {
            let prev = &pts[(i + n - 1) % n];
            let next = &pts[(i + 1) % n];
            let Ok(angle) = polygon_2d::turn_angle(prev, &pts[i], next) else {
                continue;
            };
            if self.filter.keeps(angle) {
                corners.push(pts[i]);
                seen.insert(PointKey::new(&pts[i]));
            }
        }

        let last = pts[n - 1];
        if !seen.contains(&PointKey::new(&last)) {
            corners.push(last);
        }
        Some(corners)
    }
}
