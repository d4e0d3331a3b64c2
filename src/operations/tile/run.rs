use serde::Deserialize;

use super::Tile;
use crate::catalog::{Catalog, PanelSpec};
use crate::math::LENGTH_TOLERANCE;

/// Custom-cut timber piece used for a remainder no catalog size fits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimberFallback {
    pub catalog_id: String,
    /// Remainders shorter than this are dropped instead of cut.
    pub min_length: u32,
}

/// Greedy largest-first decomposition of a run length into catalog sizes.
///
/// Each size is used `floor(remaining / size)` times before moving to the
/// next smaller one. A remainder below the smallest size is dropped unless a
/// [`TimberFallback`] is configured and the remainder reaches its minimum.
#[derive(Debug)]
pub struct TileRun<'a> {
    length: f64,
    catalog: &'a Catalog,
    timber: Option<&'a TimberFallback>,
    height_above_base: f64,
}

impl<'a> TileRun<'a> {
    /// Creates a tiling of `length` over `catalog`.
    #[must_use]
    pub fn new(length: f64, catalog: &'a Catalog) -> Self {
        Self {
            length,
            catalog,
            timber: None,
            height_above_base: 0.0,
        }
    }

    /// Enables the timber fallback for the remainder.
    #[must_use]
    pub fn with_timber(mut self, timber: Option<&'a TimberFallback>) -> Self {
        self.timber = timber;
        self
    }

    /// Sets the height stamped onto every tile.
    #[must_use]
    pub fn with_height(mut self, height_above_base: f64) -> Self {
        self.height_above_base = height_above_base;
        self
    }

    /// Executes the tiling. Tiles are ordered by position along the run.
    #[must_use]
    pub fn execute(&self) -> Vec<Tile> {
        let mut tiles = Vec::new();
        if self.length <= LENGTH_TOLERANCE {
            return tiles;
        }

        let mut remaining = self.length;
        let mut cursor = 0.0;
        for spec in self.catalog.specs() {
            let len = spec.len_f64();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = ((remaining + LENGTH_TOLERANCE) / len).floor() as usize;
            for _ in 0..count {
                tiles.push(Tile {
                    spec: spec.clone(),
                    position_along_run: cursor,
                    height_above_base: self.height_above_base,
                });
                cursor += len;
                remaining -= len;
            }
        }

        if remaining > LENGTH_TOLERANCE {
            match self.timber {
                Some(timber) => {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let cut = (remaining + LENGTH_TOLERANCE).floor() as u32;
                    if cut >= timber.min_length && cut > 0 {
                        tiles.push(Tile {
                            spec: PanelSpec::timber(cut, timber.catalog_id.clone()),
                            position_along_run: cursor,
                            height_above_base: self.height_above_base,
                        });
                    } else {
                        tracing::debug!(remaining, "Remainder below timber minimum, dropped");
                    }
                }
                None => tracing::debug!(
                    remaining,
                    finest = self.catalog.smallest().length,
                    "Run remainder dropped"
                ),
            }
        }
        tiles
    }
}
