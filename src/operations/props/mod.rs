use serde::Deserialize;

use crate::catalog::{PropHardware, PropRow};
use crate::error::Result;
use crate::geometry::{LoopSet, Winding};
use crate::math::{Cardinal, LENGTH_TOLERANCE};
use crate::operations::emit::PlacementCommand;
use crate::operations::frame::CornerFrames;

/// Prop placement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropSettings {
    /// Prop and kicker ids by wall height.
    pub hardware: PropHardware,
    /// Spacing used when the props row gives none.
    pub fallback_spacing: f64,
    /// Clear distance kept from each corner along a run.
    pub edge_margin: f64,
}

impl Default for PropSettings {
    fn default() -> Self {
        Self {
            hardware: PropHardware::default(),
            fallback_spacing: 2000.0,
            edge_margin: 300.0,
        }
    }
}

/// Sets push-pull props and their kickers along the outer loop.
///
/// Props stand on the side of each run facing away from the loop interior,
/// spread evenly between the edge margins at the row's spacing. The prop foot
/// sits `Distance` off the wall face and the kicker foot `Distance1` off it.
/// Both are rotated to face the wall. A run too short for the margins gets a
/// single prop at its middle.
#[derive(Debug)]
pub struct PlaceProps<'a> {
    loops: &'a LoopSet,
    frames: &'a CornerFrames,
    row: &'a PropRow,
    settings: &'a PropSettings,
    wall_height: f64,
    scale: f64,
}

impl<'a> PlaceProps<'a> {
    /// Creates a placement for the walls of `loops` using one props row.
    #[must_use]
    pub fn new(
        loops: &'a LoopSet,
        frames: &'a CornerFrames,
        row: &'a PropRow,
        settings: &'a PropSettings,
    ) -> Self {
        Self {
            loops,
            frames,
            row,
            settings,
            wall_height: f64::from(row.height),
            scale: 1.0,
        }
    }

    /// Sets the wall height used to pick the prop hardware. Defaults to the
    /// row height.
    #[must_use]
    pub fn with_wall_height(mut self, wall_height: f64) -> Self {
        self.wall_height = wall_height;
        self
    }

    /// Sets the scale stamped onto every command.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Executes the placement, a prop followed by its kicker at each station.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoPropRow` if no hardware tier covers the wall
    /// height.
    pub fn execute(&self) -> Result<Vec<PlacementCommand>> {
        let tier = self.settings.hardware.for_height(self.wall_height)?;
        let winding = self.loops.windings[self.loops.outer];

        let mut commands = Vec::new();
        for frame in self
            .frames
            .frames
            .iter()
            .filter(|f| f.loop_index == self.loops.outer)
        {
            let outward = outward_of(frame.run_direction, winding);
            let normal = outward.unit();
            let facing = outward.opposite();
            for station in self.stations(frame.run_length) {
                let wall = frame.position + frame.run_direction.unit() * station;
                commands.push(PlacementCommand::square(
                    &tier.prop_id,
                    wall + normal * self.row.distance,
                    facing,
                    self.scale,
                ));
                commands.push(PlacementCommand::square(
                    &tier.kicker_id,
                    wall + normal * self.row.distance1,
                    facing,
                    self.scale,
                ));
            }
        }
        tracing::info!(
            props = commands.len() / 2,
            prop_id = %tier.prop_id,
            row_height = self.row.height,
            "Props laid out"
        );
        Ok(commands)
    }

    fn spacing(&self) -> f64 {
        if self.row.distance2 > LENGTH_TOLERANCE {
            self.row.distance2
        } else {
            self.settings.fallback_spacing
        }
    }

    /// Offsets along a run where props stand.
    fn stations(&self, run_length: f64) -> Vec<f64> {
        if run_length <= LENGTH_TOLERANCE {
            return Vec::new();
        }
        let usable = run_length - 2.0 * self.settings.edge_margin;
        let spacing = self.spacing();
        if usable < 0.0 || spacing <= LENGTH_TOLERANCE {
            return vec![run_length / 2.0];
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let gaps = ((usable + LENGTH_TOLERANCE) / spacing).floor() as usize;
        #[allow(clippy::cast_precision_loss)]
        let start = self.settings.edge_margin + (usable - gaps as f64 * spacing) / 2.0;
        #[allow(clippy::cast_precision_loss)]
        (0..=gaps).map(|i| start + i as f64 * spacing).collect()
    }
}

/// Side of a run facing away from the loop interior.
fn outward_of(run_direction: Cardinal, winding: Winding) -> Cardinal {
    let left = run_direction.quarter_turn();
    match winding {
        Winding::CounterClockwise => left.opposite(),
        Winding::Clockwise => left,
    }
}
