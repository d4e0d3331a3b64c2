use rustc_hash::FxHashMap;

use crate::host::{AssetHandle, CatalogLookup, PlacementSink};
use crate::math::{Cardinal, Point3};

/// One physical hardware instance to place in the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCommand {
    pub catalog_id: String,
    pub position: Point3,
    pub rotation: f64,
    pub scale: f64,
}

impl PlacementCommand {
    /// Creates a command with an arbitrary rotation in radians.
    #[must_use]
    pub fn new(catalog_id: impl Into<String>, position: Point3, rotation: f64, scale: f64) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            position,
            rotation,
            scale,
        }
    }

    /// Creates a command square to the walls.
    #[must_use]
    pub fn square(
        catalog_id: impl Into<String>,
        position: Point3,
        rotation: Cardinal,
        scale: f64,
    ) -> Self {
        Self::new(catalog_id, position, rotation.radians(), scale)
    }
}

/// Outcome of forwarding commands to the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub placed: usize,
    /// Catalog ids that did not resolve, one entry per skipped command.
    pub missing_assets: Vec<String>,
    pub failed_appends: usize,
}

impl EmitReport {
    /// Folds another report into this one.
    pub fn merge(&mut self, other: EmitReport) {
        self.placed += other.placed;
        self.missing_assets.extend(other.missing_assets);
        self.failed_appends += other.failed_appends;
    }
}

/// Forwards placement commands, in order, to the host sink.
///
/// Unresolved assets and rejected appends are logged and skipped; the rest
/// of the sequence is still placed.
pub struct PlacementEmitter<'a> {
    lookup: &'a dyn CatalogLookup,
    sink: &'a mut dyn PlacementSink,
    resolved: FxHashMap<String, Option<AssetHandle>>,
}

impl<'a> PlacementEmitter<'a> {
    /// Creates an emitter over a catalog lookup and a sink.
    pub fn new(lookup: &'a dyn CatalogLookup, sink: &'a mut dyn PlacementSink) -> Self {
        Self {
            lookup,
            sink,
            resolved: FxHashMap::default(),
        }
    }

    /// Emits all commands and reports what happened.
    pub fn emit(&mut self, commands: &[PlacementCommand]) -> EmitReport {
        let mut report = EmitReport::default();
        for cmd in commands {
            let Some(handle) = self.resolve(&cmd.catalog_id) else {
                tracing::warn!(catalog_id = %cmd.catalog_id, "Asset not found, skipping placement");
                report.missing_assets.push(cmd.catalog_id.clone());
                continue;
            };
            match self
                .sink
                .append(handle, cmd.position, cmd.rotation, cmd.scale)
            {
                Ok(()) => report.placed += 1,
                Err(err) => {
                    tracing::warn!(catalog_id = %cmd.catalog_id, %err, "Append failed");
                    report.failed_appends += 1;
                }
            }
        }
        tracing::info!(
            placed = report.placed,
            missing = report.missing_assets.len(),
            failed = report.failed_appends,
            "Placement emitted"
        );
        report
    }

    fn resolve(&mut self, catalog_id: &str) -> Option<AssetHandle> {
        if let Some(cached) = self.resolved.get(catalog_id) {
            return *cached;
        }
        let handle = self.lookup.resolve(catalog_id);
        self.resolved.insert(catalog_id.to_owned(), handle);
        handle
    }
}
