use crate::synth::voice::Voice;

/// Creates the voices a [`VoicePool`](crate::synth::pool::VoicePool) is filled with.
///
/// This is the "sound source" layer: pick a backend once at load time, then
/// the pool asks it for as many identical voices as it has room for.
pub trait VoiceFactory {
    type Voice: Voice;

    fn create_voice(&mut self) -> Self::Voice;
}

impl<F, V> VoiceFactory for F
where
    F: FnMut() -> V,
    V: Voice,
{
    type Voice = V;

    fn create_voice(&mut self) -> Self::Voice {
        self()
    }
}
