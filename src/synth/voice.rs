/// Pool-side status of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,  // Available for allocation
    InUse, // Bound to exactly one touch session
}

/// A reusable synthesis voice as seen from the touch thread.
///
/// Implementations must not block or allocate: these calls run inside touch
/// event handling and typically just publish parameters for the audio thread.
/// The engine behind a voice applies its own attack/release shaping, so a
/// voice may be stopped and restarted in quick succession.
pub trait Voice {
    /// Begin sounding at a frequency (Hz) and amplitude.
    fn start(&mut self, frequency: f64, amplitude: f64);

    /// Change pitch and loudness of a sounding voice.
    fn update(&mut self, frequency: f64, amplitude: f64);

    /// Stop sounding. The voice may be started again later.
    fn stop(&mut self);
}

impl<V: Voice + ?Sized> Voice for Box<V> {
    fn start(&mut self, frequency: f64, amplitude: f64) {
        (**self).start(frequency, amplitude)
    }

    fn update(&mut self, frequency: f64, amplitude: f64) {
        (**self).update(frequency, amplitude)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}
