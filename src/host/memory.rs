//! In-memory host implementations, for dry runs and tests.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    AssetHandle, CatalogLookup, DrawingReader, EntityRef, PlacedInstance, PlacementSink, Prompter,
};
use crate::error::{HostError, Result};
use crate::geometry::pline::Pline;
use crate::math::Point3;

/// A drawing held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDrawing {
    polylines: Vec<(EntityRef, Pline)>,
    instances: Vec<PlacedInstance>,
    /// Simulates a host with no open document.
    pub closed: bool,
}

impl MemoryDrawing {
    /// Creates a drawing from polylines, numbering entities from 1.
    #[must_use]
    pub fn with_polylines(plines: Vec<Pline>) -> Self {
        Self {
            polylines: plines
                .into_iter()
                .zip(1..)
                .map(|(p, id)| (EntityRef(id), p))
                .collect(),
            ..Self::default()
        }
    }

    /// Adds already placed hardware.
    #[must_use]
    pub fn with_instances(mut self, instances: Vec<PlacedInstance>) -> Self {
        self.instances.extend(instances);
        self
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(HostError::NoActiveDrawing.into());
        }
        Ok(())
    }
}

impl DrawingReader for MemoryDrawing {
    fn enumerate_polylines(&self) -> Result<Vec<Pline>> {
        self.ensure_open()?;
        Ok(self.polylines.iter().map(|(_, p)| p.clone()).collect())
    }

    fn enumerate_placed_instances(
        &self,
        predicate: &dyn Fn(&PlacedInstance) -> bool,
    ) -> Result<Vec<PlacedInstance>> {
        self.ensure_open()?;
        Ok(self
            .instances
            .iter()
            .filter(|i| predicate(i))
            .cloned()
            .collect())
    }

    fn polyline(&self, entity: EntityRef) -> Result<Pline> {
        self.ensure_open()?;
        self.polylines
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| HostError::EntityNotFound(format!("entity {}", entity.0)).into())
    }
}

/// Catalog of loaded assets, handles numbered in insertion order from 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    assets: FxHashMap<String, AssetHandle>,
}

impl MemoryCatalog {
    /// Creates a catalog with the given ids loaded.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for id in ids {
            catalog.insert(id);
        }
        catalog
    }

    /// Loads an id, returning its handle.
    pub fn insert(&mut self, id: impl Into<String>) -> AssetHandle {
        let next = AssetHandle(self.assets.len() as u64 + 1);
        *self.assets.entry(id.into()).or_insert(next)
    }

    /// Reverse lookup of a handle.
    #[must_use]
    pub fn id_of(&self, handle: AssetHandle) -> Option<&str> {
        self.assets
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(id, _)| id.as_str())
    }
}

impl CatalogLookup for MemoryCatalog {
    fn resolve(&self, catalog_id: &str) -> Option<AssetHandle> {
        self.assets.get(catalog_id).copied()
    }
}

/// One accepted append.
#[derive(Debug, Clone, PartialEq)]
pub struct Appended {
    pub asset: AssetHandle,
    pub position: Point3,
    pub rotation: f64,
    pub scale: f64,
}

/// Sink that records appends and can be told to reject some assets.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub appended: Vec<Appended>,
    rejected: FxHashSet<AssetHandle>,
}

impl RecordingSink {
    /// Makes every append of `asset` fail.
    pub fn reject(&mut self, asset: AssetHandle) {
        self.rejected.insert(asset);
    }

    /// Converts the recorded appends into placed instances, for feeding a
    /// [`MemoryDrawing`]. Appends of unknown handles are left out.
    #[must_use]
    pub fn placed_instances(&self, catalog: &MemoryCatalog) -> Vec<PlacedInstance> {
        self.appended
            .iter()
            .filter_map(|a| {
                catalog.id_of(a.asset).map(|id| PlacedInstance {
                    position: a.position,
                    catalog_id: id.to_owned(),
                    rotation: a.rotation,
                })
            })
            .collect()
    }
}

impl PlacementSink for RecordingSink {
    fn append(
        &mut self,
        asset: AssetHandle,
        position: Point3,
        rotation: f64,
        scale: f64,
    ) -> Result<()> {
        if self.rejected.contains(&asset) {
            return Err(HostError::AppendFailed(format!("asset {} rejected", asset.0)).into());
        }
        self.appended.push(Appended {
            asset,
            position,
            rotation,
            scale,
        });
        Ok(())
    }
}

/// Prompter that replays scripted answers. An exhausted script cancels.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    pub entities: VecDeque<EntityRef>,
    pub points: VecDeque<Point3>,
}

impl Prompter for ScriptedPrompter {
    fn select_entity(&mut self, prompt: &str) -> Option<EntityRef> {
        tracing::debug!(prompt, "Entity prompt");
        self.entities.pop_front()
    }

    fn pick_point(&mut self, prompt: &str) -> Option<Point3> {
        tracing::debug!(prompt, "Point prompt");
        self.points.pop_front()
    }
}
