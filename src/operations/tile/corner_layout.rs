use serde::Deserialize;

use super::CourseLayer;
use crate::catalog::PanelSpec;
use crate::math::{Cardinal, Point3, Vector3, LENGTH_TOLERANCE};
use crate::operations::emit::PlacementCommand;
use crate::operations::frame::CornerFrame;

/// Most panels set along one face of an outside corner.
pub const MAX_FACE_PANELS: usize = 3;

/// Corner post and corner panel dimensions, in catalog units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CornerHardware {
    /// Width an inside corner post occupies along each face.
    pub post_width: f64,
    /// Outward shift of an outside corner post off both faces.
    pub corner_width: f64,
    /// Panel set on each face next to an inside corner post.
    pub inside_panel_width: Option<u32>,
    /// Panels set along each face of an outside corner, nearest first.
    pub outside_panel_widths: Vec<u32>,
    /// Piece closing a run between an outside corner and its neighbour that
    /// the course panels cannot tile exactly.
    pub compensator: Option<PanelSpec>,
    /// Run length at which no compensator is ever set.
    pub compensator_exempt_run: f64,
}

impl Default for CornerHardware {
    fn default() -> Self {
        Self {
            post_width: 100.0,
            corner_width: 100.0,
            inside_panel_width: Some(300),
            outside_panel_widths: vec![300],
            compensator: None,
            compensator_exempt_run: 150.0,
        }
    }
}

/// The two wall faces meeting at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Along the outgoing run, towards the next corner.
    Run,
    /// Along the incoming run, back towards the previous corner.
    Back,
}

/// Lays out the post and corner panels of one corner for one course.
///
/// Inside corners get their post on the corner point and one panel per face
/// right after it. Outside corners get their post shifted off both faces by
/// [`CornerHardware::corner_width`], then up to [`MAX_FACE_PANELS`] panels per
/// face laid end to end from the corner point.
///
/// Each face holds only the panels that end within its limit, which defaults
/// to the full face run. A face sharing its run with another corner is
/// limited to half of it so the two corners never overlap.
///
/// Panels on the run face are inserted at their near end and point down the
/// run. Panels on the back face are inserted at their far end and point back
/// towards the corner, the same way the incoming wall run is tiled.
#[derive(Debug)]
pub struct CornerLayout<'a> {
    frame: &'a CornerFrame,
    layer: CourseLayer<'a>,
    hardware: &'a CornerHardware,
    run_limit: f64,
    back_limit: f64,
    scale: f64,
}

impl<'a> CornerLayout<'a> {
    /// Creates the layout of `frame` within `layer`.
    #[must_use]
    pub fn new(
        frame: &'a CornerFrame,
        layer: CourseLayer<'a>,
        hardware: &'a CornerHardware,
    ) -> Self {
        Self {
            frame,
            layer,
            hardware,
            run_limit: frame.run_length,
            back_limit: frame.back_length,
            scale: 1.0,
        }
    }

    /// Caps the wall length the run and back faces may take up.
    #[must_use]
    pub fn with_face_limits(mut self, run_limit: f64, back_limit: f64) -> Self {
        self.run_limit = run_limit;
        self.back_limit = back_limit;
        self
    }

    /// Sets the scale stamped onto every command.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Length of wall along `face` taken up by the corner hardware.
    ///
    /// Zero for a face that is not axis-aligned.
    #[must_use]
    pub fn face_extent(&self, face: Face) -> f64 {
        if self.direction(face).is_none() {
            return 0.0;
        }
        self.face_start() + self.fitted_panels(face).iter().copied().map(f64::from).sum::<f64>()
    }

    /// Executes the layout: the post first, then the run face, then the back
    /// face.
    #[must_use]
    pub fn execute(&self) -> Vec<PlacementCommand> {
        let corner = self.frame.position + Vector3::new(0.0, 0.0, self.layer.height_above_base);
        let is_inside = self.frame.is_inside;

        let post_position = if is_inside {
            corner
        } else {
            let along = self.frame.run_direction.unit()
                + self.frame.back_direction.map_or_else(Vector3::zeros, Cardinal::unit);
            corner - along * self.hardware.corner_width
        };
        let mut commands = vec![PlacementCommand::square(
            self.layer.course.post_id(is_inside),
            post_position,
            self.frame.rotation,
            self.scale,
        )];

        for face in [Face::Run, Face::Back] {
            let Some(dir) = self.direction(face) else {
                continue;
            };
            let widths = self.fitted_panels(face);
            if widths.len() < self.face_panels().len() {
                tracing::debug!(
                    corner = self.frame.corner_index,
                    ?face,
                    fitted = widths.len(),
                    "Face too short for every corner panel"
                );
            }
            let mut offset = self.face_start();
            for &width in widths {
                match self.layer.course.panels.by_length(width) {
                    Some(spec) => commands.push(self.face_command(
                        &spec.catalog_id,
                        corner,
                        face,
                        dir,
                        offset,
                        spec.len_f64(),
                    )),
                    None => tracing::warn!(
                        width,
                        course = self.layer.course.height,
                        "No corner panel of this width in course"
                    ),
                }
                offset += f64::from(width);
            }
        }
        commands
    }

    fn direction(&self, face: Face) -> Option<Cardinal> {
        match face {
            Face::Run => Some(self.frame.run_direction),
            Face::Back => self.frame.back_direction,
        }
    }

    fn limit(&self, face: Face) -> f64 {
        match face {
            Face::Run => self.run_limit,
            Face::Back => self.back_limit,
        }
    }

    fn face_start(&self) -> f64 {
        if self.frame.is_inside {
            self.hardware.post_width
        } else {
            0.0
        }
    }

    fn face_panels(&self) -> &[u32] {
        if self.frame.is_inside {
            self.hardware.inside_panel_width.as_slice()
        } else {
            let widths = &self.hardware.outside_panel_widths;
            &widths[..widths.len().min(MAX_FACE_PANELS)]
        }
    }

    /// Leading panels of the face that end within its limit.
    fn fitted_panels(&self, face: Face) -> &[u32] {
        let panels = self.face_panels();
        let limit = self.limit(face) + LENGTH_TOLERANCE;
        let mut end = self.face_start();
        let fitted = panels
            .iter()
            .take_while(|&&w| {
                end += f64::from(w);
                end <= limit
            })
            .count();
        &panels[..fitted]
    }

    fn face_command(
        &self,
        catalog_id: &str,
        corner: Point3,
        face: Face,
        dir: Cardinal,
        offset: f64,
        width: f64,
    ) -> PlacementCommand {
        match face {
            Face::Run => {
                PlacementCommand::square(catalog_id, corner + dir.unit() * offset, dir, self.scale)
            }
            Face::Back => PlacementCommand::square(
                catalog_id,
                corner + dir.unit() * (offset + width),
                dir.opposite(),
                self.scale,
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::CourseTable;
    use crate::operations::classify::ClassifyLoops;
    use crate::operations::frame::{BuildCornerFrames, CornerFrames};
    use crate::operations::tile::StackCourses;
    use crate::test_support::{pts, two_course_table};
    use approx::assert_abs_diff_eq;

    fn frames(corners: &[(f64, f64)]) -> CornerFrames {
        let set = ClassifyLoops::from_loops(vec![pts(corners)]).execute().unwrap();
        BuildCornerFrames::new(&set).execute()
    }

    fn bottom(table: &CourseTable) -> CourseLayer<'_> {
        CourseLayer {
            course: &table.courses()[0],
            height_above_base: 0.0,
        }
    }

    fn assert_at(cmd: &PlacementCommand, id: &str, x: f64, y: f64, rotation: Cardinal) {
        assert_eq!(cmd.catalog_id, id);
        assert_abs_diff_eq!(cmd.position, Point3::new(x, y, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(cmd.rotation, rotation.radians(), epsilon = 1e-12);
    }

    const RECT: [(f64, f64); 4] = [(0.0, 0.0), (1000.0, 0.0), (1000.0, 800.0), (0.0, 800.0)];

    #[test]
    fn outside_corner_post_is_shifted_off_both_faces() {
        let table = two_course_table();
        let hw = CornerHardware::default();
        let frames = frames(&RECT);
        let cmds = CornerLayout::new(frames.get(0, 0).unwrap(), bottom(&table), &hw).execute();
        assert_eq!(cmds.len(), 3);
        assert_at(&cmds[0], "OC1350", -100.0, -100.0, Cardinal::East);
        assert_at(&cmds[1], "WP1350x300", 0.0, 0.0, Cardinal::East);
        assert_at(&cmds[2], "WP1350x300", 0.0, 300.0, Cardinal::South);
    }

    #[test]
    fn inside_corner_panels_follow_the_post() {
        let table = two_course_table();
        let hw = CornerHardware::default();
        let frames = frames(&[
            (0.0, 0.0),
            (2000.0, 0.0),
            (2000.0, 1000.0),
            (1000.0, 1000.0),
            (1000.0, 2000.0),
            (0.0, 2000.0),
        ]);
        let layout = CornerLayout::new(frames.get(0, 3).unwrap(), bottom(&table), &hw);
        let cmds = layout.execute();
        assert_eq!(cmds.len(), 3);
        assert_at(&cmds[0], "IC1350", 1000.0, 1000.0, Cardinal::West);
        assert_at(&cmds[1], "WP1350x300", 1000.0, 1100.0, Cardinal::North);
        assert_at(&cmds[2], "WP1350x300", 1400.0, 1000.0, Cardinal::West);
        assert_abs_diff_eq!(layout.face_extent(Face::Run), 400.0);
        assert_abs_diff_eq!(layout.face_extent(Face::Back), 400.0);
    }

    #[test]
    fn face_limits_drop_panels_that_overrun() {
        let table = two_course_table();
        let hw = CornerHardware {
            outside_panel_widths: vec![300, 150],
            ..CornerHardware::default()
        };
        let frames = frames(&RECT);
        let layout = CornerLayout::new(frames.get(0, 0).unwrap(), bottom(&table), &hw)
            .with_face_limits(75.0, 400.0);
        let cmds = layout.execute();
        // Post, then only the 300 on the back face.
        assert_eq!(cmds.len(), 2);
        assert_at(&cmds[1], "WP1350x300", 0.0, 300.0, Cardinal::South);
        assert_abs_diff_eq!(layout.face_extent(Face::Run), 0.0);
        assert_abs_diff_eq!(layout.face_extent(Face::Back), 300.0);
    }

    #[test]
    fn inside_post_keeps_its_width_on_a_short_face() {
        let table = two_course_table();
        let hw = CornerHardware::default();
        let frames = frames(&[
            (0.0, 0.0),
            (2000.0, 0.0),
            (2000.0, 1000.0),
            (1000.0, 1000.0),
            (1000.0, 2000.0),
            (0.0, 2000.0),
        ]);
        let layout = CornerLayout::new(frames.get(0, 3).unwrap(), bottom(&table), &hw)
            .with_face_limits(350.0, 500.0);
        assert_eq!(layout.execute().len(), 2);
        assert_abs_diff_eq!(layout.face_extent(Face::Run), 100.0);
        assert_abs_diff_eq!(layout.face_extent(Face::Back), 400.0);
    }

    #[test]
    fn upper_course_switches_hardware_and_height() {
        let table = two_course_table();
        let hw = CornerHardware::default();
        let layers = StackCourses::new(1950.0, &table).execute();
        let frames = frames(&RECT);
        let cmds = CornerLayout::new(frames.get(0, 1).unwrap(), layers[1], &hw)
            .with_scale(2.0)
            .execute();
        assert_eq!(cmds[0].catalog_id, "OC600");
        assert_eq!(cmds[1].catalog_id, "WP600x300");
        assert!(cmds.iter().all(|c| (c.position.z - 1350.0).abs() < 1e-9));
        assert!(cmds.iter().all(|c| (c.scale - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn skewed_back_face_gets_no_panels() {
        let table = two_course_table();
        let hw = CornerHardware::default();
        let frames = frames(&[
            (0.0, 0.0),
            (1000.0, 0.0),
            (1000.0, 700.0),
            (900.0, 800.0),
            (0.0, 800.0),
        ]);
        let layout = CornerLayout::new(frames.get(0, 3).unwrap(), bottom(&table), &hw);
        let cmds = layout.execute();
        assert_eq!(cmds.len(), 2);
        assert_at(&cmds[0], "OC1350", 1000.0, 800.0, Cardinal::West);
        assert_abs_diff_eq!(layout.face_extent(Face::Back), 0.0);
    }

    #[test]
    fn outside_faces_take_at_most_three_panels() {
        let table = two_course_table();
        let hw = CornerHardware {
            outside_panel_widths: vec![300, 150, 100, 50],
            ..CornerHardware::default()
        };
        let frames = frames(&RECT);
        let layout = CornerLayout::new(frames.get(0, 0).unwrap(), bottom(&table), &hw);
        let cmds = layout.execute();
        assert_eq!(cmds.len(), 7);
        assert_at(&cmds[2], "WP1350x150", 300.0, 0.0, Cardinal::East);
        assert_at(&cmds[3], "WP1350x100", 450.0, 0.0, Cardinal::East);
        assert_abs_diff_eq!(layout.face_extent(Face::Run), 550.0);
    }

    #[test]
    fn unknown_panel_width_leaves_a_gap() {
        crate::test_support::init_tracing();
        let table = two_course_table();
        let hw = CornerHardware {
            outside_panel_widths: vec![320],
            ..CornerHardware::default()
        };
        let frames = frames(&RECT);
        let layout = CornerLayout::new(frames.get(0, 0).unwrap(), bottom(&table), &hw);
        assert_eq!(layout.execute().len(), 1);
        assert_abs_diff_eq!(layout.face_extent(Face::Run), 320.0);
    }

    #[test]
    fn hardware_deserializes_with_defaults() {
        let hw: CornerHardware =
            serde_json::from_str(r#"{"outside_panel_widths": [450, 300]}"#).unwrap();
        assert_eq!(hw.outside_panel_widths, vec![450, 300]);
        assert_eq!(hw.inside_panel_width, Some(300));
        assert_abs_diff_eq!(hw.compensator_exempt_run, 150.0);
    }
}
