use crate::{synth::channel::VoiceRenderer, MAX_BLOCK_SIZE};

/// Sums every voice renderer into one mono buffer on the audio thread.
///
/// The output gain is `1 / sqrt(voice_count)`: a full chord of uncorrelated
/// sines stays near unity without making a single touch too quiet.
pub struct Mixer {
    voices: Vec<VoiceRenderer>,
    scratch: Vec<f32>,
    gain: f32,
}

impl Mixer {
    pub fn new(voices: Vec<VoiceRenderer>) -> Self {
        let gain = if voices.is_empty() {
            1.0
        } else {
            1.0 / (voices.len() as f32).sqrt()
        };

        Self {
            voices,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            gain,
        }
    }

    /// Overwrite `out` with the mix of all voices. Any length is accepted;
    /// work is done in chunks of at most `MAX_BLOCK_SIZE`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let scratch = &mut self.scratch[..chunk.len()];
            for voice in &mut self.voices {
                voice.render_block(scratch);
                for (o, v) in chunk.iter_mut().zip(scratch.iter()) {
                    *o += v * self.gain;
                }
            }
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use crate::{
        config::VoiceKind,
        synth::{channel::voice_bank, voice::Voice},
    };

    #[test]
    fn silent_until_a_voice_starts() {
        let (mut pool, mut mixer) = voice_bank(VoiceKind::Enveloped, 4, 1_000.0);
        assert!(approx_eq!(f32, mixer.gain(), 0.5, ulps = 2));

        let mut out = vec![1.0f32; 100];
        mixer.render_block(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));

        let handle = pool.allocate().unwrap();
        pool.voice_mut(&handle).unwrap().start(100.0, 1.0);
        mixer.render_block(&mut out);
        assert_eq!(mixer.active_voices(), 1);
        assert!(out.iter().any(|s| s.abs() > 0.2));
        assert!(out.iter().all(|s| s.abs() <= 0.5));
    }

    #[test]
    fn renders_blocks_longer_than_max() {
        let (mut pool, mut mixer) = voice_bank(VoiceKind::Oscillator, 1, 48_000.0);
        let handle = pool.allocate().unwrap();
        pool.voice_mut(&handle).unwrap().start(440.0, 1.0);

        let mut out = vec![0.0f32; crate::MAX_BLOCK_SIZE * 2 + 17];
        mixer.render_block(&mut out);
        let tail = &out[crate::MAX_BLOCK_SIZE * 2..];
        assert!(tail.iter().any(|s| s.abs() > 0.1));
    }
}
