// Purpose: note naming and step-offset to frequency conversion

pub mod converter;
pub mod notes;

pub use converter::{FrequencyConverter, FREQUENCY_A0};
pub use notes::{Note, HALF_STEPS_PER_OCTAVE};
