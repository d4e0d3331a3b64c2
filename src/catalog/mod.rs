//! Stock hardware catalogs: panel widths, course heights and the props table.

pub mod course;
pub mod prop_table;

pub use course::{Course, CourseTable};
pub use prop_table::{PropHardware, PropRow, PropTable, PropTier};

use serde::Deserialize;

use crate::error::CatalogError;

/// Kind of stock piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelCategory {
    /// Standard formwork panel.
    Panel,
    /// Undersized piece closing a gap no standard panel matches.
    Compensator,
    /// Custom-cut timber filler.
    Timber,
}

/// One catalog entry: a stock length (or height) and its asset id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct PanelSpec {
    /// Length along the run, in catalog units (mm).
    pub length: u32,
    pub catalog_id: String,
    #[serde(default = "default_category")]
    pub category: PanelCategory,
}

fn default_category() -> PanelCategory {
    PanelCategory::Panel
}

impl PanelSpec {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(length: u32, catalog_id: impl Into<String>, category: PanelCategory) -> Self {
        Self {
            length,
            catalog_id: catalog_id.into(),
            category,
        }
    }

    /// Creates a standard panel entry.
    #[must_use]
    pub fn panel(length: u32, catalog_id: impl Into<String>) -> Self {
        Self::new(length, catalog_id, PanelCategory::Panel)
    }

    /// Creates a compensator entry.
    #[must_use]
    pub fn compensator(length: u32, catalog_id: impl Into<String>) -> Self {
        Self::new(length, catalog_id, PanelCategory::Compensator)
    }

    /// Creates a custom-cut timber piece.
    #[must_use]
    pub fn timber(length: u32, catalog_id: impl Into<String>) -> Self {
        Self::new(length, catalog_id, PanelCategory::Timber)
    }

    /// Length as a float, for coordinate arithmetic.
    #[must_use]
    pub fn len_f64(&self) -> f64 {
        f64::from(self.length)
    }
}

/// A read-only catalog of stock sizes, ordered descending by length.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<PanelSpec>")]
pub struct Catalog {
    specs: Vec<PanelSpec>,
}

impl Catalog {
    /// Creates a catalog, sorting entries largest first.
    ///
    /// Entries of equal length keep their given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if no entry has a positive length.
    pub fn new(mut specs: Vec<PanelSpec>) -> Result<Self, CatalogError> {
        specs.retain(|s| s.length > 0);
        if specs.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        specs.sort_by(|a, b| b.length.cmp(&a.length));
        Ok(Self { specs })
    }

    /// Builds a panel catalog from `(length, id)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` if `entries` is empty.
    pub fn from_panels(entries: &[(u32, &str)]) -> Result<Self, CatalogError> {
        Self::new(
            entries
                .iter()
                .map(|&(len, id)| PanelSpec::panel(len, id))
                .collect(),
        )
    }

    /// Entries, largest first.
    #[must_use]
    pub fn specs(&self) -> &[PanelSpec] {
        &self.specs
    }

    /// The smallest entry.
    #[must_use]
    pub fn smallest(&self) -> &PanelSpec {
        // Non-empty by construction.
        &self.specs[self.specs.len() - 1]
    }

    /// Looks up an entry by its stock length.
    #[must_use]
    pub fn by_length(&self, length: u32) -> Option<&PanelSpec> {
        self.specs.iter().find(|s| s.length == length)
    }

    /// Returns `true` if `length` is covered exactly by a greedy largest-first
    /// decomposition over this catalog.
    #[must_use]
    pub fn tiles_exactly(&self, length: f64) -> bool {
        let mut remaining = length;
        for spec in &self.specs {
            let len = spec.len_f64();
            let count = ((remaining + crate::math::LENGTH_TOLERANCE) / len).floor();
            remaining -= count * len;
        }
        remaining.abs() < crate::math::LENGTH_TOLERANCE
    }
}

impl TryFrom<Vec<PanelSpec>> for Catalog {
    type Error = CatalogError;

    fn try_from(specs: Vec<PanelSpec>) -> Result<Self, Self::Error> {
        Self::new(specs)
    }
}
