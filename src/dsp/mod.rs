//! Low-level DSP primitives used by the channel voices.
//!
//! These components are allocation-free and realtime-safe, so they can live
//! inside a voice renderer on the audio thread.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeStage};
pub use oscillator::Oscillator;
