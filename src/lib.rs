//! A continuous-pitch touch instrument.
//!
//! A rectangular surface is divided into rows and columns. Each column is a
//! half-step, each row sits seven half-steps below the one above it, and a
//! finger anywhere on the surface plays a pitch that glides between columns
//! and snaps onto them near the grid lines. Touches are mapped to pitch,
//! converted to Hz, and bound to voices from a fixed pool.

pub mod config;
pub mod dsp;
pub mod pitch; // Note names and frequency conversion
pub mod surface; // Grid geometry and position-to-pitch mapping
pub mod synth; // Voice pool and audio backend
pub mod touch; // Touch sessions and the controller

pub use config::{ConfigError, InstrumentConfig, VoiceKind};
pub use pitch::{FrequencyConverter, Note};
pub use surface::{GeometryError, Mapping, PitchMapper, SurfaceGeometry};
pub use synth::{Voice, VoiceFactory, VoiceHandle, VoicePool};
pub use touch::{Point, TouchEvent, TouchId, TouchOutcome, TouchPhase, TouchSurfaceController};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
