//! Geometry of the playing surface and the mapping from touch coordinates to
//! pitch and amplitude.
//!
//! Everything here is pure: a [`PitchMapper`] holds only its validated
//! [`SurfaceGeometry`] and mode flags, so the same point always produces the
//! same [`Mapping`].

/// Validated grid layout and derived spacing.
pub mod geometry;
/// Column snapping, row selection and row blending.
pub mod mapper;

pub use geometry::{GeometryError, SurfaceGeometry};
pub use mapper::{
    Mapping, PitchMapper, PressureSensing, RowBlend, Tone, DEFAULT_REFERENCE_PRESSURE,
    HALF_STEPS_PER_ROW,
};
