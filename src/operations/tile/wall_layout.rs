use super::{
    center_remainder, CornerHardware, CornerLayout, CourseLayer, Face, TileRun, TimberFallback,
};
use crate::catalog::PanelSpec;
use crate::geometry::LoopSet;
use crate::math::{Vector3, LENGTH_TOLERANCE};
use crate::operations::emit::PlacementCommand;
use crate::operations::frame::{CornerFrame, CornerFrames};

/// Lays out corner hardware and wall-run panels for every course.
///
/// Output is grouped by course, bottom first. Within a course each corner's
/// hardware is followed by the compensator and the tiles of the run leaving
/// it. A run is the wall between a corner and the next corner of the same
/// loop, less the length both corner layouts take up. Two framed corners
/// share a run half and half. Corners without a frame contribute no hardware
/// and leave their ends of the adjacent runs to the other corner.
#[derive(Debug)]
pub struct LayoutWalls<'a> {
    loops: &'a LoopSet,
    frames: &'a CornerFrames,
    layers: &'a [CourseLayer<'a>],
    hardware: &'a CornerHardware,
    timber: Option<&'a TimberFallback>,
    center_ids: &'a [String],
    include_runs: bool,
    scale: f64,
}

/// Where the corner hardware of a run ends and the run tiles begin.
#[derive(Debug)]
struct RunSpan<'h> {
    /// Length taken by the corner at the run start.
    start: f64,
    /// Length taken by the corner at the run end.
    end: f64,
    /// Compensator and its offset along the run.
    compensator: Option<(&'h PanelSpec, f64)>,
    /// Offset along the run where the run tiles begin.
    tiles_from: f64,
}

impl RunSpan<'_> {
    fn compensator_length(&self) -> f64 {
        self.compensator.map_or(0.0, |(c, _)| c.len_f64())
    }
}

impl<'a> LayoutWalls<'a> {
    /// Creates a wall layout over the given frames and course layers.
    #[must_use]
    pub fn new(
        loops: &'a LoopSet,
        frames: &'a CornerFrames,
        layers: &'a [CourseLayer<'a>],
        hardware: &'a CornerHardware,
    ) -> Self {
        Self {
            loops,
            frames,
            layers,
            hardware,
            timber: None,
            center_ids: &[],
            include_runs: true,
            scale: 1.0,
        }
    }

    /// Enables the timber fallback on run remainders.
    #[must_use]
    pub fn with_timber(mut self, timber: Option<&'a TimberFallback>) -> Self {
        self.timber = timber;
        self
    }

    /// Sets the filler ids whose gap is moved to the middle of each run.
    #[must_use]
    pub fn with_center_ids(mut self, center_ids: &'a [String]) -> Self {
        self.center_ids = center_ids;
        self
    }

    /// Includes or leaves out the wall runs. Without runs only corner
    /// hardware and compensators are laid out.
    #[must_use]
    pub fn with_runs(mut self, include_runs: bool) -> Self {
        self.include_runs = include_runs;
        self
    }

    /// Sets the scale stamped onto every command.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Executes the layout.
    #[must_use]
    pub fn execute(&self) -> Vec<PlacementCommand> {
        let mut commands = Vec::new();
        for layer in self.layers {
            for frame in &self.frames.frames {
                let corner = self.corner(frame, *layer);
                commands.extend(corner.execute());
                let span = self.span(frame, *layer, &corner);
                if let Some((comp, at)) = span.compensator {
                    commands.push(self.along_run(
                        frame,
                        &comp.catalog_id,
                        at,
                        layer.height_above_base,
                    ));
                }
                if self.include_runs {
                    commands.extend(self.run_commands(frame, *layer, &span));
                }
            }
        }
        tracing::debug!(
            courses = self.layers.len(),
            corners = self.frames.frames.len(),
            commands = commands.len(),
            "Walls laid out"
        );
        commands
    }

    fn next_frame(&self, frame: &CornerFrame) -> Option<&'a CornerFrame> {
        let l = &self.loops.loops[frame.loop_index];
        self.frames.get(frame.loop_index, l.next_index(frame.local_index))
    }

    fn prev_frame(&self, frame: &CornerFrame) -> Option<&'a CornerFrame> {
        let l = &self.loops.loops[frame.loop_index];
        self.frames.get(frame.loop_index, l.prev_index(frame.local_index))
    }

    /// Corner layout with each face limited to its share of the run.
    fn corner(&self, frame: &'a CornerFrame, layer: CourseLayer<'a>) -> CornerLayout<'a> {
        let share = |length: f64, shared: bool| if shared { length / 2.0 } else { length };
        CornerLayout::new(frame, layer, self.hardware)
            .with_face_limits(
                share(frame.run_length, self.next_frame(frame).is_some()),
                share(frame.back_length, self.prev_frame(frame).is_some()),
            )
            .with_scale(self.scale)
    }

    fn span(
        &self,
        frame: &'a CornerFrame,
        layer: CourseLayer<'a>,
        corner: &CornerLayout<'_>,
    ) -> RunSpan<'a> {
        let start = corner.face_extent(Face::Run);
        let next = self.next_frame(frame);
        let end = match next {
            Some(next) => self.corner(next, layer).face_extent(Face::Back),
            None => {
                tracing::debug!(corner = frame.corner_index, "Run ends at a corner without frame");
                0.0
            }
        };
        let mut span = RunSpan {
            start,
            end,
            compensator: None,
            tiles_from: start,
        };
        span.compensator = self.compensator(frame, next, layer, &span);
        if let Some((comp, _)) = span.compensator {
            if !frame.is_inside {
                span.tiles_from += comp.len_f64();
            }
        }
        span
    }

    /// Decides the one compensator of a run.
    ///
    /// A run takes a compensator when one of its corners is an outside
    /// corner, its length is not the exempt length, the wall left between the
    /// corners does not tile exactly, and it does once the compensator is
    /// set. The compensator sits against the outside corner, the start
    /// corner first.
    fn compensator(
        &self,
        frame: &CornerFrame,
        next: Option<&CornerFrame>,
        layer: CourseLayer<'_>,
        span: &RunSpan<'_>,
    ) -> Option<(&'a PanelSpec, f64)> {
        let comp = self.hardware.compensator.as_ref()?;
        let start_outside = !frame.is_inside;
        let end_outside = next.is_some_and(|n| !n.is_inside);
        if !start_outside && !end_outside {
            return None;
        }
        if (frame.run_length - self.hardware.compensator_exempt_run).abs() < LENGTH_TOLERANCE {
            return None;
        }
        let panels = &layer.course.panels;
        let rest = frame.run_length - span.start - span.end;
        if rest < -LENGTH_TOLERANCE || panels.tiles_exactly(rest) {
            return None;
        }
        let closed = rest - comp.len_f64();
        if closed < -LENGTH_TOLERANCE || !panels.tiles_exactly(closed.max(0.0)) {
            tracing::debug!(
                corner = frame.corner_index,
                rest,
                compensator = %comp.catalog_id,
                "Compensator does not close the run"
            );
            return None;
        }
        let at = if start_outside {
            span.start
        } else {
            frame.run_length - span.end - comp.len_f64()
        };
        Some((comp, at))
    }

    fn run_commands(
        &self,
        frame: &CornerFrame,
        layer: CourseLayer<'_>,
        span: &RunSpan<'_>,
    ) -> Vec<PlacementCommand> {
        let length = frame.run_length - span.start - span.end - span.compensator_length();
        if length <= LENGTH_TOLERANCE {
            tracing::debug!(corner = frame.corner_index, length, "Run fully taken by corners");
            return Vec::new();
        }

        let tiles = TileRun::new(length, &layer.course.panels)
            .with_timber(self.timber)
            .with_height(layer.height_above_base)
            .execute();
        let tiles = center_remainder(&tiles, self.center_ids);

        tiles
            .iter()
            .map(|t| {
                self.along_run(
                    frame,
                    &t.spec.catalog_id,
                    span.tiles_from + t.position_along_run,
                    t.height_above_base,
                )
            })
            .collect()
    }

    /// A piece inserted `offset` along the run leaving `frame`, pointing down
    /// the run.
    fn along_run(
        &self,
        frame: &CornerFrame,
        catalog_id: &str,
        offset: f64,
        height: f64,
    ) -> PlacementCommand {
        let position = frame.position
            + frame.run_direction.unit() * offset
            + Vector3::new(0.0, 0.0, height);
        PlacementCommand::square(catalog_id, position, frame.run_direction, self.scale)
    }
}
