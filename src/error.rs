//! Error types for surfaces and runs.

use thiserror::Error;

/// Failure reported by a render surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface cannot play keyframe animations at all
    #[error("animations are not supported by this surface")]
    AnimationUnsupported,
    /// The surface refused a specific animation request
    #[error("animation rejected for unit {unit}: {reason}")]
    AnimationRejected { unit: usize, reason: String },
    /// A unit index that the surface never built
    #[error("unit {index} out of range (surface holds {len} units)")]
    UnitOutOfRange { index: usize, len: usize },
    /// Backend-specific failure (DOM access, element creation, ...)
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Failure that interrupts a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The surface could not be reset or rebuilt for the new text
    #[error("failed to build units: {0}")]
    Build(#[source] SurfaceError),
    /// A unit update failed while the run was in flight
    #[error("unit {unit} update failed: {source}")]
    Unit {
        unit: usize,
        #[source]
        source: SurfaceError,
    },
}
