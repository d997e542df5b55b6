use std::f32::consts::TAU;

/*
Sine Oscillator
===============

A phase accumulator: each sample the phase advances by frequency/sample_rate
cycles and wraps at 1.0, and the output is sin(2 * pi * phase).

Frequency can change at any sample without a click because the phase carries
over; only the rate of advance changes. This is what lets a finger glide
between columns smoothly.
*/

pub struct Oscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32, // 0.0 .. 1.0
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frequency: 440.0,
            phase: 0.0,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        // Keep below Nyquist
        self.frequency = frequency.clamp(0.0, self.sample_rate * 0.5);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}
