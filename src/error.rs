use thiserror::Error;

/// Top-level error type for the formwork layout engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while classifying loops and corners.
///
/// All of these are local to one corner or run: callers skip the offending
/// item and carry on with the rest.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate loop: {0}")]
    DegenerateLoop(String),

    #[error("zero-length segment at ({x}, {y})")]
    ZeroLengthSegment { x: f64, y: f64 },

    #[error("corner {corner}: rotation {angle} rad does not snap to a cardinal direction")]
    UnrecognizedRotation { corner: usize, angle: f64 },

    #[error("loop {loop_index} has zero signed area, winding is undefined")]
    UnresolvedWinding { loop_index: usize },

    #[error("expected at least one loop, got {0}")]
    LoopCount(usize),
}

/// Errors related to catalog data: stock sizes, assets and the props table.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    EmptyCatalog,

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("no props row covers wall height {height}")]
    NoPropRow { height: f64 },

    #[error("course table has no course that fits wall height {height}")]
    NoCourse { height: f64 },

    #[error("invalid catalog data: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Errors reported by the host drawing integration.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no active drawing")]
    NoActiveDrawing,

    #[error("failed to acquire drawing record: {0}")]
    Acquisition(String),

    #[error("append rejected by sink: {0}")]
    AppendFailed(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to layout configuration and placement policies.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid configuration file: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Coarse classification of a [`LayoutError`], used to pick between
/// "skip and continue" and "abort and report".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No active drawing or a failed record acquisition. Fatal to the command.
    Environment,
    /// A catalog id could not be resolved. Only the affected step is skipped.
    AssetResolution,
    /// Unrecognized rotation, degenerate loop or unresolved winding.
    Geometry,
    /// Cancelled prompts and empty selections.
    Input,
    /// Malformed configuration or catalog data. Fatal to the command.
    Configuration,
}

impl LayoutError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry(_) => ErrorKind::Geometry,
            Self::Catalog(CatalogError::AssetNotFound(_)) => ErrorKind::AssetResolution,
            Self::Catalog(_) | Self::Config(_) => ErrorKind::Configuration,
            Self::Host(HostError::EntityNotFound(_)) => ErrorKind::Input,
            // An append failure is reported per command by the emitter and
            // never aborts a run; everything else on the host side is fatal.
            Self::Host(HostError::AppendFailed(_)) => ErrorKind::AssetResolution,
            Self::Host(_) => ErrorKind::Environment,
        }
    }

    /// Returns `true` if the caller should skip the failing step and continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AssetResolution | ErrorKind::Geometry | ErrorKind::Input
        )
    }
}

/// Convenience type alias for results using [`LayoutError`].
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_are_recoverable() {
        let err: LayoutError = GeometryError::UnrecognizedRotation {
            corner: 3,
            angle: 0.7,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Geometry);
        assert!(err.is_recoverable());
    }

    #[test]
    fn missing_drawing_is_fatal() {
        let err: LayoutError = HostError::NoActiveDrawing.into();
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn missing_asset_is_local() {
        let err: LayoutError = CatalogError::AssetNotFound("PNL-600".into()).into();
        assert_eq!(err.kind(), ErrorKind::AssetResolution);
        assert!(err.is_recoverable());
    }

    #[test]
    fn bad_catalog_data_is_configuration() {
        let err: LayoutError = CatalogError::EmptyCatalog.into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn messages_carry_context() {
        let err: LayoutError = GeometryError::UnresolvedWinding { loop_index: 1 }.into();
        assert_eq!(
            err.to_string(),
            "loop 1 has zero signed area, winding is undefined"
        );
    }
}
