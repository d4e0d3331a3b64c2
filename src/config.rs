//! Per-invocation layout settings and per-command placement policy.

use std::f64::consts::FRAC_PI_4;

use serde::Deserialize;

use crate::catalog::CourseTable;
use crate::error::ConfigError;
use crate::operations::accessory::AccessoryRule;
use crate::operations::extract::{CornerFilter, ScanThrottle};
use crate::operations::frame::DEFAULT_SNAP_TOLERANCE;
use crate::operations::props::PropSettings;
use crate::operations::tile::{CornerHardware, TimberFallback, MAX_FACE_PANELS};

/// Wall height and drawing scale of one placement run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawLayoutConfig")]
pub struct LayoutConfig {
    wall_height: f64,
    scale: f64,
}

#[derive(Deserialize)]
struct RawLayoutConfig {
    wall_height: f64,
    #[serde(default = "default_scale")]
    scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl LayoutConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` unless both values are finite and
    /// positive.
    pub fn new(wall_height: f64, scale: f64) -> Result<Self, ConfigError> {
        if !wall_height.is_finite() || wall_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "wall height must be positive, got {wall_height}"
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale must be positive, got {scale}"
            )));
        }
        Ok(Self { wall_height, scale })
    }

    /// Height of the walls above the slab, in drawing units.
    #[must_use]
    pub fn wall_height(&self) -> f64 {
        self.wall_height
    }

    /// Scale stamped onto every placed instance.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl TryFrom<RawLayoutConfig> for LayoutConfig {
    type Error = ConfigError;

    fn try_from(raw: RawLayoutConfig) -> Result<Self, Self::Error> {
        Self::new(raw.wall_height, raw.scale)
    }
}

/// How extracted corner lists become loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopSource {
    /// Each polyline holds up to two loops joined by a seam edge.
    SeamSplit,
    /// Each polyline is one loop; all polylines form one loop set.
    #[default]
    PerPolyline,
}

/// Which hardware a command places and how.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacementPolicy {
    #[serde(default)]
    pub corner_filter: CornerFilter,
    /// Rotation snapping tolerance in radians.
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    #[serde(default)]
    pub throttle: ScanThrottle,
    #[serde(default)]
    pub loop_source: LoopSource,
    pub courses: CourseTable,
    /// Close a wall-height remainder with one extra shortest course.
    #[serde(default)]
    pub top_up_courses: bool,
    /// Filler ids whose gap is centered on each run.
    #[serde(default)]
    pub center_ids: Vec<String>,
    #[serde(default)]
    pub timber: Option<TimberFallback>,
    #[serde(default)]
    pub corner: CornerHardware,
    #[serde(default)]
    pub props: PropSettings,
    #[serde(default)]
    pub connectors: Vec<AccessoryRule>,
    #[serde(default)]
    pub brackets: Vec<AccessoryRule>,
}

fn default_snap_tolerance() -> f64 {
    DEFAULT_SNAP_TOLERANCE
}

impl PlacementPolicy {
    /// Creates a policy over a course table with every other setting at its
    /// default.
    #[must_use]
    pub fn new(courses: CourseTable) -> Self {
        Self {
            corner_filter: CornerFilter::default(),
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            throttle: ScanThrottle::default(),
            loop_source: LoopSource::default(),
            courses,
            top_up_courses: false,
            center_ids: Vec::new(),
            timber: None,
            corner: CornerHardware::default(),
            props: PropSettings::default(),
            connectors: Vec::new(),
            brackets: Vec::new(),
        }
    }

    /// Parses and validates a JSON policy document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed documents (including an
    /// empty course table) and `ConfigError::Invalid` for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let policy: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.snap_tolerance > 0.0 && self.snap_tolerance < FRAC_PI_4) {
            return Err(ConfigError::Invalid(format!(
                "snap tolerance must be in (0, π/4), got {}",
                self.snap_tolerance
            )));
        }
        if self.corner.outside_panel_widths.len() > MAX_FACE_PANELS {
            return Err(ConfigError::Invalid(format!(
                "at most {MAX_FACE_PANELS} outside corner panels per face, got {}",
                self.corner.outside_panel_widths.len()
            )));
        }
        if self.props.fallback_spacing <= 0.0 {
            return Err(ConfigError::Invalid(
                "prop fallback spacing must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
