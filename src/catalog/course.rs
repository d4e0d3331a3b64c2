use serde::Deserialize;

use super::Catalog;
use crate::error::CatalogError;

/// One vertical layer of panels of uniform height.
///
/// Each course height comes with its own hardware: panels of that height and
/// the matching corner posts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
    /// Course height in catalog units (mm).
    pub height: u32,
    /// Wall panels of this height, by width.
    pub panels: Catalog,
    pub inside_post_id: String,
    pub outside_post_id: String,
}

impl Course {
    /// Course height as a float.
    #[must_use]
    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }

    /// Corner post id for an inside or outside corner.
    #[must_use]
    pub fn post_id(&self, is_inside: bool) -> &str {
        if is_inside {
            &self.inside_post_id
        } else {
            &self.outside_post_id
        }
    }
}

/// Available course heights, ordered descending.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Course>")]
pub struct CourseTable {
    courses: Vec<Course>,
}

impl CourseTable {
    /// Creates a course table, sorting courses tallest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if no course has a positive height.
    pub fn new(mut courses: Vec<Course>) -> Result<Self, CatalogError> {
        courses.retain(|c| c.height > 0);
        if courses.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        courses.sort_by(|a, b| b.height.cmp(&a.height));
        Ok(Self { courses })
    }

    /// Courses, tallest first.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// The shortest course.
    #[must_use]
    pub fn shortest(&self) -> &Course {
        &self.courses[self.courses.len() - 1]
    }
}

impl TryFrom<Vec<Course>> for CourseTable {
    type Error = CatalogError;

    fn try_from(courses: Vec<Course>) -> Result<Self, Self::Error> {
        Self::new(courses)
    }
}
