//! Load-time instrument configuration.
//!
//! A configuration is fixed for the lifetime of a controller. Geometry is
//! validated when the mapper is built, so a bad layout is reported before any
//! touch is processed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    pitch::{FrequencyConverter, Note},
    surface::{GeometryError, PitchMapper, PressureSensing, SurfaceGeometry, DEFAULT_REFERENCE_PRESSURE},
};

/// Reasons a configuration cannot be loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("reference pressure must be a finite positive number, got {0}")]
    ReferencePressure(f64),
}

/// Which sound backend fills the voice pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceKind {
    /// Bare oscillator gated on and off.
    Oscillator,
    /// Oscillator shaped by a short attack/release envelope.
    #[default]
    Enveloped,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    pub rows: usize,
    pub columns: usize,
    pub width: f64,
    pub height: f64,
    /// Distance from the top and bottom edges to the first and last row.
    pub row_edge_offset: f64,
    /// Half-width of the zone around each line that snaps to it.
    pub snap_distance: f64,
    pub base_note: Note,
    pub base_octave: i32,
    pub voice_capacity: usize,
    /// Blend each touch across the two nearest rows (two voices per touch).
    pub blend_rows: bool,
    pub pressure_available: bool,
    /// Force reading that maps to full amplitude.
    pub reference_pressure_max: f64,
    pub voice_kind: VoiceKind,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 8,
            width: 640.0,
            height: 400.0,
            row_edge_offset: 40.0,
            snap_distance: 20.0,
            base_note: Note::G,
            base_octave: 2,
            voice_capacity: 10,
            blend_rows: false,
            pressure_available: false,
            reference_pressure_max: DEFAULT_REFERENCE_PRESSURE,
            voice_kind: VoiceKind::Enveloped,
        }
    }
}

impl InstrumentConfig {
    pub fn with_grid(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_row_edge_offset(mut self, offset: f64) -> Self {
        self.row_edge_offset = offset;
        self
    }

    pub fn with_snap_distance(mut self, distance: f64) -> Self {
        self.snap_distance = distance;
        self
    }

    pub fn with_base(mut self, note: Note, octave: i32) -> Self {
        self.base_note = note;
        self.base_octave = octave;
        self
    }

    pub fn with_voice_capacity(mut self, capacity: usize) -> Self {
        self.voice_capacity = capacity;
        self
    }

    pub fn with_blend_rows(mut self, blend: bool) -> Self {
        self.blend_rows = blend;
        self
    }

    pub fn with_pressure_sensing(mut self, available: bool) -> Self {
        self.pressure_available = available;
        self
    }

    pub fn with_reference_pressure(mut self, reference_max: f64) -> Self {
        self.reference_pressure_max = reference_max;
        self
    }

    pub fn with_voice_kind(mut self, kind: VoiceKind) -> Self {
        self.voice_kind = kind;
        self
    }

    pub fn geometry(&self) -> Result<SurfaceGeometry, GeometryError> {
        SurfaceGeometry::new(
            self.rows,
            self.columns,
            self.width,
            self.height,
            self.row_edge_offset,
            self.snap_distance,
        )
    }

    /// Checked even when sensing is off, so a bad file fails before a
    /// pressure-capable device ever reads it.
    pub fn pressure(&self) -> Result<PressureSensing, ConfigError> {
        let reference_max = self.reference_pressure_max;
        if !reference_max.is_finite() || reference_max <= 0.0 {
            return Err(ConfigError::ReferencePressure(reference_max));
        }

        Ok(PressureSensing {
            available: self.pressure_available,
            reference_max,
        })
    }

    pub fn mapper(&self) -> Result<PitchMapper, ConfigError> {
        Ok(PitchMapper::new(self.geometry()?, self.blend_rows, self.pressure()?))
    }

    pub fn converter(&self) -> FrequencyConverter {
        FrequencyConverter::new(self.base_note, self.base_octave)
    }
}
