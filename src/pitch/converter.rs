use super::notes::{Note, HALF_STEPS_PER_OCTAVE};

/// Frequency of A0, the lowest A on a standard keyboard.
pub const FREQUENCY_A0: f64 = 27.50;

/// Converts chromatic step offsets into equal-tempered frequencies.
///
/// Steps are counted from a configurable base note and octave. Fractional
/// offsets are valid and map continuously, which is what makes glides between
/// snapped columns usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyConverter {
    base_steps_above_a0: i32,
}

impl FrequencyConverter {
    pub fn new(base_note: Note, base_octave: i32) -> Self {
        Self {
            base_steps_above_a0: HALF_STEPS_PER_OCTAVE * base_octave + base_note.index(),
        }
    }

    pub fn base_steps_above_a0(&self) -> i32 {
        self.base_steps_above_a0
    }

    /// freq = 27.5 * 2^((base + offset) / 12)
    #[inline]
    pub fn frequency(&self, step_offset: f64) -> f64 {
        let absolute_steps = self.base_steps_above_a0 as f64 + step_offset;
        FREQUENCY_A0 * 2.0_f64.powf(absolute_steps / HALF_STEPS_PER_OCTAVE as f64)
    }
}

impl Default for FrequencyConverter {
    fn default() -> Self {
        Self::new(Note::G, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn a_octave_two_plus_an_octave_is_220() {
        let converter = FrequencyConverter::new(Note::A, 2);
        assert_eq!(converter.base_steps_above_a0(), 24);
        let freq = converter.frequency(12.0);
        assert!(approx_eq!(f64, freq, 220.0, epsilon = 1e-9), "got {freq}");
    }

    #[test]
    fn zero_offset_at_a0_is_reference() {
        let converter = FrequencyConverter::new(Note::A, 0);
        assert!(approx_eq!(f64, converter.frequency(0.0), FREQUENCY_A0, ulps = 2));
    }

    #[test]
    fn octave_doubles_frequency() {
        let converter = FrequencyConverter::default();
        for step in [-14.5, -3.0, 0.0, 0.25, 7.0, 11.9, 30.0] {
            let low = converter.frequency(step);
            let high = converter.frequency(step + 12.0);
            assert!(
                approx_eq!(f64, high, 2.0 * low, epsilon = 1e-9),
                "step {step}: {high} != 2 * {low}"
            );
        }
    }

    #[test]
    fn frequency_is_monotonic_including_fractional_steps() {
        let converter = FrequencyConverter::default();
        let mut previous = converter.frequency(-24.0);
        let mut step = -24.0;
        while step < 48.0 {
            step += 0.05;
            let freq = converter.frequency(step);
            assert!(freq > previous, "{freq} should exceed {previous} at step {step}");
            previous = freq;
        }
    }

    #[test]
    fn default_base_is_g2() {
        // G is index 10 above A
        assert_eq!(FrequencyConverter::default().base_steps_above_a0(), 34);
    }
}
