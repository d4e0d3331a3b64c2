use crate::catalog::{Course, CourseTable};
use crate::math::LENGTH_TOLERANCE;

/// One stacked course and the height its bottom sits at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseLayer<'a> {
    pub course: &'a Course,
    pub height_above_base: f64,
}

impl CourseLayer<'_> {
    /// Height of the layer's top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.height_above_base + self.course.height_f64()
    }
}

/// Stacks courses to reach a wall height, tallest course first.
///
/// Each course height `h` is repeated `floor((H - consumed) / h)` times
/// before switching to the next smaller one. The remainder below the
/// shortest course is left open unless `top_up` is set, which adds one more
/// shortest course overhanging the wall top.
#[derive(Debug)]
pub struct StackCourses<'a> {
    wall_height: f64,
    table: &'a CourseTable,
    top_up: bool,
}

impl<'a> StackCourses<'a> {
    /// Creates a stacking for the given wall height.
    #[must_use]
    pub fn new(wall_height: f64, table: &'a CourseTable) -> Self {
        Self {
            wall_height,
            table,
            top_up: false,
        }
    }

    /// Closes any remainder with one extra shortest course.
    #[must_use]
    pub fn with_top_up(mut self, top_up: bool) -> Self {
        self.top_up = top_up;
        self
    }

    /// Executes the stacking, bottom layer first.
    #[must_use]
    pub fn execute(&self) -> Vec<CourseLayer<'a>> {
        let mut layers = Vec::new();
        let mut consumed = 0.0;
        for course in self.table.courses() {
            let h = course.height_f64();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let reps = ((self.wall_height - consumed + LENGTH_TOLERANCE) / h)
                .floor()
                .max(0.0) as usize;
            for _ in 0..reps {
                layers.push(CourseLayer {
                    course,
                    height_above_base: consumed,
                });
                consumed += h;
            }
        }

        let remainder = self.wall_height - consumed;
        if remainder > LENGTH_TOLERANCE {
            if self.top_up {
                layers.push(CourseLayer {
                    course: self.table.shortest(),
                    height_above_base: consumed,
                });
            } else {
                tracing::debug!(remainder, "Wall height remainder left open");
            }
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_course_table;

    fn heights(layers: &[CourseLayer<'_>]) -> Vec<u32> {
        layers.iter().map(|l| l.course.height).collect()
    }

    #[test]
    fn course_counts_follow_floor_rule() {
        let table = two_course_table();
        for h in [600.0, 1350.0, 1950.0, 2700.0, 3000.0, 3300.0, 4650.0] {
            let layers = StackCourses::new(h, &table).execute();
            let tall = layers.iter().filter(|l| l.course.height == 1350).count();
            let short = layers.iter().filter(|l| l.course.height == 600).count();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let expected_tall = (h / 1350.0).floor() as usize;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let expected_short = ((h % 1350.0) / 600.0).floor() as usize;
            assert_eq!(tall, expected_tall, "H={h}");
            assert_eq!(short, expected_short, "H={h}");
        }
    }

    #[test]
    fn three_metre_wall() {
        let table = two_course_table();
        let layers = StackCourses::new(3000.0, &table).execute();
        assert_eq!(heights(&layers), vec![1350, 1350]);
        assert!((layers[1].height_above_base - 1350.0).abs() < f64::EPSILON);
        assert!((layers[1].top() - 2700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_up_closes_remainder() {
        let table = two_course_table();
        let layers = StackCourses::new(3000.0, &table).with_top_up(true).execute();
        assert_eq!(heights(&layers), vec![1350, 1350, 600]);
        assert!((layers[2].height_above_base - 2700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_up_not_needed_on_exact_height() {
        let table = two_course_table();
        let layers = StackCourses::new(3300.0, &table).with_top_up(true).execute();
        assert_eq!(heights(&layers), vec![1350, 1350, 600]);
    }

    #[test]
    fn hardware_switches_with_course() {
        let table = two_course_table();
        let layers = StackCourses::new(1950.0, &table).execute();
        assert_eq!(layers[0].course.outside_post_id, "OC1350");
        assert_eq!(layers[1].course.outside_post_id, "OC600");
    }

    #[test]
    fn low_wall_gets_nothing() {
        let table = two_course_table();
        assert!(StackCourses::new(500.0, &table).execute().is_empty());
        assert!(StackCourses::new(0.0, &table).execute().is_empty());
    }
}
