//! Host commands: one method per registered placement command.

use crate::catalog::PropTable;
use crate::config::{LayoutConfig, LoopSource, PlacementPolicy};
use crate::error::{CatalogError, ErrorKind, Result};
use crate::geometry::pline::Pline;
use crate::geometry::LoopSet;
use crate::host::{CatalogLookup, DrawingReader, PlacementSink, Prompter};
use crate::operations::accessory::{AccessoryRule, PlaceAccessories};
use crate::operations::classify::ClassifyLoops;
use crate::operations::emit::{EmitReport, PlacementCommand, PlacementEmitter};
use crate::operations::extract::{CornerList, ExtractCorners};
use crate::operations::frame::{BuildCornerFrames, CornerFrames};
use crate::operations::props::PlaceProps;
use crate::operations::tile::{LayoutWalls, StackCourses};

/// Summary of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Loops laid out.
    pub loops: usize,
    /// Corners that received a frame.
    pub corners: usize,
    /// Corners left without hardware.
    pub skipped_corners: usize,
    /// Commands generated, before asset resolution.
    pub commands: usize,
    pub emit: EmitReport,
}

/// Loop sets with their corner frames, ready for layout.
struct Walls {
    sets: Vec<(LoopSet, CornerFrames)>,
}

impl Walls {
    fn report(&self, commands: usize) -> PlacementReport {
        PlacementReport {
            loops: self.sets.iter().map(|(s, _)| s.loops.len()).sum(),
            corners: self.sets.iter().map(|(_, f)| f.frames.len()).sum(),
            skipped_corners: self.sets.iter().map(|(_, f)| f.skipped.len()).sum(),
            commands,
            emit: EmitReport::default(),
        }
    }
}

/// Runs placement commands against one drawing.
///
/// Every command reads the drawing, computes its whole placement and only
/// then appends to the sink, so a failure to read the drawing leaves it
/// untouched. Per-corner and per-asset problems are logged and skipped.
pub struct PlacementSession<'a> {
    reader: &'a dyn DrawingReader,
    lookup: &'a dyn CatalogLookup,
    sink: &'a mut dyn PlacementSink,
    config: LayoutConfig,
    policy: PlacementPolicy,
}

impl<'a> PlacementSession<'a> {
    /// Creates a session over the host collaborators.
    #[must_use]
    pub fn new(
        reader: &'a dyn DrawingReader,
        lookup: &'a dyn CatalogLookup,
        sink: &'a mut dyn PlacementSink,
        config: LayoutConfig,
        policy: PlacementPolicy,
    ) -> Self {
        Self {
            reader,
            lookup,
            sink,
            config,
            policy,
        }
    }

    /// Places corner posts and corner panels for every course.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read, and
    /// `CatalogError::NoCourse` if the wall is lower than the shortest
    /// course.
    pub fn place_corners(&mut self) -> Result<PlacementReport> {
        let plines = self.reader.enumerate_polylines()?;
        self.place_layout(&plines, false)
    }

    /// Places corner hardware plus the panels of every wall run, for every
    /// course.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read, and
    /// `CatalogError::NoCourse` if the wall is lower than the shortest
    /// course.
    pub fn place_walls(&mut self) -> Result<PlacementReport> {
        let plines = self.reader.enumerate_polylines()?;
        self.place_layout(&plines, true)
    }

    /// Places props and kickers along the outer walls.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read, and
    /// `CatalogError::NoPropRow` if the props table or prop hardware does not
    /// cover the wall height. Nothing is placed in either case.
    pub fn place_props(&mut self, table: &PropTable) -> Result<PlacementReport> {
        let plines = self.reader.enumerate_polylines()?;
        let row = table.row_for(self.config.wall_height())?;
        let Some(walls) = self.walls(&plines) else {
            return Ok(PlacementReport::default());
        };

        let mut commands = Vec::new();
        for (set, frames) in &walls.sets {
            commands.extend(
                PlaceProps::new(set, frames, row, &self.policy.props)
                    .with_wall_height(self.config.wall_height())
                    .with_scale(self.config.scale())
                    .execute()?,
            );
        }
        let mut report = walls.report(commands.len());
        report.emit = self.emit(&commands);
        Ok(report)
    }

    /// Places connectors on already placed panels.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read.
    pub fn place_connectors(&mut self) -> Result<PlacementReport> {
        let rules = self.policy.connectors.clone();
        self.place_accessories(&rules)
    }

    /// Places brackets on already placed hardware.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read.
    pub fn place_brackets(&mut self) -> Result<PlacementReport> {
        let rules = self.policy.brackets.clone();
        self.place_accessories(&rules)
    }

    /// Prompts for one wall outline and its base point, then places walls
    /// for it. The picked point sets the base level of the walls.
    ///
    /// Cancelling either prompt, or selecting something that is not a
    /// polyline, places nothing.
    ///
    /// # Errors
    ///
    /// Returns an environment error if the drawing cannot be read, and
    /// `CatalogError::NoCourse` if the wall is lower than the shortest
    /// course.
    pub fn place_selected(&mut self, prompter: &mut dyn Prompter) -> Result<PlacementReport> {
        let Some(entity) = prompter.select_entity("Select wall outline") else {
            tracing::info!("Selection cancelled");
            return Ok(PlacementReport::default());
        };
        let Some(base) = prompter.pick_point("Pick wall base point") else {
            tracing::info!("Base point cancelled");
            return Ok(PlacementReport::default());
        };

        let mut pline = match self.reader.polyline(entity) {
            Ok(p) => p,
            Err(err) if err.kind() == ErrorKind::Input => {
                tracing::info!(%err, "Selection is not a wall outline");
                return Ok(PlacementReport::default());
            }
            Err(err) => return Err(err),
        };
        for v in &mut pline.vertices {
            v.z = base.z;
        }
        self.place_layout(&[pline], true)
    }

    fn place_layout(&mut self, plines: &[Pline], include_runs: bool) -> Result<PlacementReport> {
        let Some(walls) = self.walls(plines) else {
            return Ok(PlacementReport::default());
        };
        let layers = StackCourses::new(self.config.wall_height(), &self.policy.courses)
            .with_top_up(self.policy.top_up_courses)
            .execute();
        if layers.is_empty() {
            return Err(CatalogError::NoCourse {
                height: self.config.wall_height(),
            }
            .into());
        }

        let mut commands = Vec::new();
        for (set, frames) in &walls.sets {
            commands.extend(
                LayoutWalls::new(set, frames, &layers, &self.policy.corner)
                    .with_timber(self.policy.timber.as_ref())
                    .with_center_ids(&self.policy.center_ids)
                    .with_runs(include_runs)
                    .with_scale(self.config.scale())
                    .execute(),
            );
        }
        let mut report = walls.report(commands.len());
        report.emit = self.emit(&commands);
        Ok(report)
    }

    fn place_accessories(&mut self, rules: &[AccessoryRule]) -> Result<PlacementReport> {
        let instances = self
            .reader
            .enumerate_placed_instances(&|i| rules.iter().any(|r| r.matches(&i.catalog_id)))?;
        let commands = PlaceAccessories::new(&instances, rules)
            .with_scale(self.config.scale())
            .execute();
        let emit = self.emit(&commands);
        Ok(PlacementReport {
            commands: commands.len(),
            emit,
            ..PlacementReport::default()
        })
    }

    /// Extracts, classifies and frames the loops of `plines`. `None` means
    /// there is nothing to place.
    fn walls(&self, plines: &[Pline]) -> Option<Walls> {
        let lists = ExtractCorners::new(plines)
            .with_filter(self.policy.corner_filter)
            .with_throttle(self.policy.throttle)
            .execute();
        if lists.is_empty() {
            tracing::info!(polylines = plines.len(), "No wall outlines found");
            return None;
        }

        let sets: Vec<LoopSet> = match self.policy.loop_source {
            LoopSource::SeamSplit => lists
                .iter()
                .filter_map(|l| classify(ClassifyLoops::from_flat(&l.corners), l.source))
                .collect(),
            LoopSource::PerPolyline => {
                let loops = lists.into_iter().map(|l: CornerList| l.corners).collect();
                classify(ClassifyLoops::from_loops(loops), 0)
                    .into_iter()
                    .collect()
            }
        };
        if sets.is_empty() {
            return None;
        }

        let sets = sets
            .into_iter()
            .map(|set| {
                let frames = BuildCornerFrames::new(&set)
                    .with_snap_tolerance(self.policy.snap_tolerance)
                    .execute();
                (set, frames)
            })
            .collect();
        Some(Walls { sets })
    }

    fn emit(&mut self, commands: &[PlacementCommand]) -> EmitReport {
        PlacementEmitter::new(self.lookup, &mut *self.sink).emit(commands)
    }
}

fn classify(op: ClassifyLoops, source: usize) -> Option<LoopSet> {
    match op.execute() {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::warn!(source, %err, "No usable loops");
            None
        }
    }
}
