use serde::Deserialize;

use crate::error::CatalogError;

/// One row of the externally maintained props data file.
///
/// Field names follow the file's keys. Distances are in drawing units,
/// angles in degrees. Placement reads the height and the three distances;
/// the prop geometry (`x`, `y`, `c`, `w` and the two result angles) is
/// carried through for hosts that draw or schedule the props.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropRow {
    pub height: u32,
    pub x: f64,
    pub y: f64,
    pub c: f64,
    pub w: f64,
    #[serde(rename = "resultAngle")]
    pub result_angle: f64,
    #[serde(rename = "resultAngle2")]
    pub result_angle2: f64,
    /// Prop foot distance from the wall face.
    #[serde(rename = "Distance")]
    pub distance: f64,
    /// Kicker foot distance from the wall face.
    #[serde(rename = "Distance1")]
    pub distance1: f64,
    /// Spacing between props along the wall.
    #[serde(rename = "Distance2")]
    pub distance2: f64,
}

/// Props rows indexed by wall height, ascending.
#[derive(Debug, Clone, Default)]
pub struct PropTable {
    rows: Vec<PropRow>,
}

impl PropTable {
    /// Creates a table from rows, sorting by height.
    #[must_use]
    pub fn new(mut rows: Vec<PropRow>) -> Self {
        rows.sort_by_key(|r| r.height);
        Self { rows }
    }

    /// Parses the JSON props data file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the document does not match the row
    /// shape.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<PropRow> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Ok(Self::new(rows))
    }

    /// Returns the row for a wall height: the lowest row at least as tall.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoPropRow` if every row is shorter than the wall.
    pub fn row_for(&self, wall_height: f64) -> Result<&PropRow, CatalogError> {
        self.rows
            .iter()
            .find(|r| f64::from(r.height) + crate::math::LENGTH_TOLERANCE >= wall_height)
            .ok_or(CatalogError::NoPropRow {
                height: wall_height,
            })
    }
}

/// Prop and kicker asset ids used up to a given wall height.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropTier {
    pub up_to_height: u32,
    pub prop_id: String,
    pub kicker_id: String,
}

/// Height-indexed prop hardware, ascending by `up_to_height`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<PropTier>")]
pub struct PropHardware {
    tiers: Vec<PropTier>,
}

impl PropHardware {
    /// Creates the lookup, sorting tiers by height.
    #[must_use]
    pub fn new(mut tiers: Vec<PropTier>) -> Self {
        tiers.sort_by_key(|t| t.up_to_height);
        Self { tiers }
    }

    /// Returns the tier covering a wall height.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoPropRow` if no tier reaches the wall height.
    pub fn for_height(&self, wall_height: f64) -> Result<&PropTier, CatalogError> {
        self.tiers
            .iter()
            .find(|t| f64::from(t.up_to_height) + crate::math::LENGTH_TOLERANCE >= wall_height)
            .ok_or(CatalogError::NoPropRow {
                height: wall_height,
            })
    }
}

impl From<Vec<PropTier>> for PropHardware {
    fn from(tiers: Vec<PropTier>) -> Self {
        Self::new(tiers)
    }
}
