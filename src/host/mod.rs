//! Boundary to the CAD host: drawing access, asset resolution, the placement
//! sink and interactive prompts.
//!
//! The engine only ever talks to the host through these traits. A host
//! integration implements them over its own document database.

pub mod memory;

use crate::error::Result;
use crate::geometry::pline::Pline;
use crate::math::Point3;

/// Opaque host handle of a resolved catalog asset (e.g. a block definition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// Opaque host reference to a drawing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef(pub u64);

/// Hardware already placed in the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInstance {
    pub position: Point3,
    pub catalog_id: String,
    pub rotation: f64,
}

/// Read access to the active drawing.
pub trait DrawingReader {
    /// Returns every polyline in the drawing, in database order.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NoActiveDrawing` or `HostError::Acquisition` when
    /// the drawing cannot be read. Callers abort the command.
    fn enumerate_polylines(&self) -> Result<Vec<Pline>>;

    /// Returns the placed instances accepted by `predicate`.
    ///
    /// # Errors
    ///
    /// Same as [`DrawingReader::enumerate_polylines`].
    fn enumerate_placed_instances(
        &self,
        predicate: &dyn Fn(&PlacedInstance) -> bool,
    ) -> Result<Vec<PlacedInstance>>;

    /// Returns the polyline behind a selected entity.
    ///
    /// # Errors
    ///
    /// Returns `HostError::EntityNotFound` if the entity is not a polyline.
    fn polyline(&self, entity: EntityRef) -> Result<Pline>;
}

/// Resolves catalog ids to host assets.
pub trait CatalogLookup {
    /// Returns the asset for `catalog_id`, or `None` if it is not loaded.
    fn resolve(&self, catalog_id: &str) -> Option<AssetHandle>;
}

/// Receives placements, one atomic append per hardware instance.
pub trait PlacementSink {
    /// Appends one instance of `asset` to the drawing.
    ///
    /// # Errors
    ///
    /// Returns `HostError::AppendFailed` if the host rejects the instance.
    fn append(&mut self, asset: AssetHandle, position: Point3, rotation: f64, scale: f64)
        -> Result<()>;
}

/// Interactive prompts. `None` means the user cancelled.
pub trait Prompter {
    fn select_entity(&mut self, prompt: &str) -> Option<EntityRef>;

    fn pick_point(&mut self, prompt: &str) -> Option<Point3>;
}
