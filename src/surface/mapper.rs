use super::geometry::SurfaceGeometry;
use crate::touch::Point;

/*
Touch to Pitch Mapping
======================

The surface is a grid of note columns (left to right) and rows (top to
bottom). A touch is turned into a step offset, in half-steps above the base
note, plus an amplitude.

Columns: Magnetic Frets
-----------------------

Each column line owns a snap zone of +/- snap_distance. Inside the zone the
pitch is exactly the column's step. Between two zones the pitch glides
linearly, so leaving one zone starts at that column's step and entering the
next zone arrives at the next step with no jump.

      line 2            line 3            line 4
        |                 |                 |
    [ snap ]~~~~~~~~~~[ snap ]~~~~~~~~~~[ snap ]
     2.0   2.0 ...glide... 3.0   3.0 ...glide... 4.0

  step = lower + (x - lower_offset - snap) / (spacing - 2 * snap)

Rows: Fifths Apart
------------------

Rows are 7 half-steps apart, with the top row the highest. Row r therefore
adds (rows - r - 1) * 7 to the column step.

In single-row mode the nearest row wins outright. In blend mode the touch is
split between the two rows it sits between:

    row k      ====[ snap ]====   weight 0: all row k
                     \
                      \  linear ramp
                       \
    row k+1    ====[ snap ]====   weight 1: all row k+1

Each row gets amplitude total * (1 - weight) and total * weight, so the two
always sum to the touch amplitude.

Voice slots
-----------

A blending touch holds two voices. Slot 0 always carries the even row of the
pair and slot 1 the odd row, so sliding down across several rows hands the
sound back and forth between the same two voices without swapping pitches
mid-note. Row parity means nothing else.
*/

/// Half-steps between vertically adjacent rows.
pub const HALF_STEPS_PER_ROW: f64 = 7.0;

/// Force reading treated as full amplitude when pressure sensing is on.
pub const DEFAULT_REFERENCE_PRESSURE: f64 = 6.67;

/// How touch force turns into amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSensing {
    pub available: bool,
    pub reference_max: f64,
}

impl PressureSensing {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            reference_max: DEFAULT_REFERENCE_PRESSURE,
        }
    }

    pub fn with_reference(reference_max: f64) -> Self {
        Self {
            available: true,
            reference_max,
        }
    }

    /// Amplitude for an optional force reading. Without sensing (or without a
    /// reading) every touch plays at full amplitude.
    pub fn amplitude(&self, pressure: Option<f64>) -> f64 {
        match pressure {
            Some(force) if self.available && self.reference_max > 0.0 => {
                (force / self.reference_max).max(0.0)
            }
            _ => 1.0,
        }
    }
}

impl Default for PressureSensing {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// Split of a touch between two vertically adjacent rows.
///
/// `weight` 0 means entirely `lower_row`, 1 entirely `upper_row`. "Lower" is
/// the numerically lower index, which is the higher-pitched row on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBlend {
    pub lower_row: usize,
    pub upper_row: usize,
    pub weight: f64,
}

/// One sounding component of a touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub row: usize,
    /// Half-steps above the base note.
    pub step: f64,
    /// Share of the touch carried by this tone, 0..=1.
    pub weight: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mapping {
    Single(Tone),
    Blend {
        blend: RowBlend,
        lower: Tone,
        upper: Tone,
    },
}

impl Mapping {
    /// Tones in voice-slot order: the single tone, or the even row's tone
    /// followed by the odd row's tone.
    pub fn voice_tones(&self) -> impl Iterator<Item = Tone> {
        let (first, second) = match *self {
            Mapping::Single(tone) => (tone, None),
            Mapping::Blend { lower, upper, .. } if lower.row % 2 == 0 => (lower, Some(upper)),
            Mapping::Blend { lower, upper, .. } => (upper, Some(lower)),
        };
        [Some(first), second].into_iter().flatten()
    }

    pub fn total_amplitude(&self) -> f64 {
        match self {
            Mapping::Single(tone) => tone.amplitude,
            Mapping::Blend { lower, upper, .. } => lower.amplitude + upper.amplitude,
        }
    }
}

/// Stateless mapping from surface coordinates to tones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchMapper {
    geometry: SurfaceGeometry,
    blend_rows: bool,
    pressure: PressureSensing,
}

impl PitchMapper {
    pub fn new(geometry: SurfaceGeometry, blend_rows: bool, pressure: PressureSensing) -> Self {
        Self {
            geometry,
            blend_rows,
            pressure,
        }
    }

    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    pub fn blends_rows(&self) -> bool {
        self.blend_rows
    }

    /// Voices a touch needs: two when blending rows, otherwise one.
    pub fn voices_per_touch(&self) -> usize {
        if self.blend_rows {
            2
        } else {
            1
        }
    }

    /// Half-steps above the row's base for a horizontal position, snapped
    /// inside column snap zones and interpolated between them.
    pub fn column_step(&self, x: f64) -> f64 {
        let spacing = self.geometry.space_between_columns();
        let snap = self.geometry.snap_distance();

        let lower_line = ((x - self.geometry.column_edge_offset()) / spacing).floor();
        let lower_offset = self.geometry.column_offset(lower_line);

        let nearest_line = if x - lower_offset < spacing / 2.0 {
            lower_line
        } else {
            lower_line + 1.0
        };
        let distance_to_nearest = (x - self.geometry.column_offset(nearest_line)).abs();

        if distance_to_nearest <= snap {
            return nearest_line;
        }

        lower_line + (x - lower_offset - snap) / (spacing - 2.0 * snap)
    }

    /// Nearest row line to a vertical position, clamped to the grid.
    pub fn nearest_row(&self, y: f64) -> usize {
        let spacing = self.geometry.space_between_rows();
        let lower_row = ((y - self.geometry.row_edge_offset()) / spacing).floor();
        let lower_offset = self.geometry.row_offset(lower_row);

        let nearest = if y - lower_offset < spacing / 2.0 {
            lower_row
        } else {
            lower_row + 1.0
        };
        self.clamp_row(nearest)
    }

    /// Blend between the two rows surrounding a vertical position.
    ///
    /// Touches above the first row or below the last stay fully on that row.
    pub fn row_blend(&self, y: f64) -> RowBlend {
        let spacing = self.geometry.space_between_rows();
        let snap = self.geometry.snap_distance();
        let last_row = self.geometry.rows() - 1;

        let lower_bound = ((y - self.geometry.row_edge_offset() + snap) / spacing).floor();
        if lower_bound < 0.0 {
            return RowBlend {
                lower_row: 0,
                upper_row: 1,
                weight: 0.0,
            };
        }
        if lower_bound >= last_row as f64 {
            return RowBlend {
                lower_row: last_row - 1,
                upper_row: last_row,
                weight: 1.0,
            };
        }

        let ramp_start = self.geometry.row_offset(lower_bound) + snap;
        let weight = ((y - ramp_start) / (spacing - 2.0 * snap)).clamp(0.0, 1.0);
        let lower_row = lower_bound as usize;

        RowBlend {
            lower_row,
            upper_row: lower_row + 1,
            weight,
        }
    }

    /// Absolute step offset of a horizontal position on a given row.
    pub fn row_step(&self, row: usize, x: f64) -> f64 {
        let rows_below = (self.geometry.rows() - row - 1) as f64;
        rows_below * HALF_STEPS_PER_ROW + self.column_step(x)
    }

    pub fn amplitude(&self, pressure: Option<f64>) -> f64 {
        self.pressure.amplitude(pressure)
    }

    pub fn map(&self, point: Point, pressure: Option<f64>) -> Mapping {
        let total = self.amplitude(pressure);

        if !self.blend_rows {
            let row = self.nearest_row(point.y);
            return Mapping::Single(Tone {
                row,
                step: self.row_step(row, point.x),
                weight: 1.0,
                amplitude: total,
            });
        }

        let blend = self.row_blend(point.y);
        let column_step = self.column_step(point.x);
        let tone = |row: usize, weight: f64| Tone {
            row,
            step: (self.geometry.rows() - row - 1) as f64 * HALF_STEPS_PER_ROW + column_step,
            weight,
            amplitude: total * weight,
        };

        Mapping::Blend {
            blend,
            lower: tone(blend.lower_row, 1.0 - blend.weight),
            upper: tone(blend.upper_row, blend.weight),
        }
    }

    fn clamp_row(&self, row: f64) -> usize {
        row.clamp(0.0, (self.geometry.rows() - 1) as f64) as usize
    }
}
