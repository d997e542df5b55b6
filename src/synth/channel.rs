use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::VoiceKind,
    dsp::{
        envelope::{Envelope, EnvelopeStage},
        oscillator::Oscillator,
    },
    synth::{
        factory::VoiceFactory,
        message::{MessageReceiver, VoiceMessage},
        mixer::Mixer,
        pool::VoicePool,
        voice::Voice,
    },
};

/*
Voice Channels
==============

Every pooled voice is split in two halves joined by a lock-free ring buffer:

  touch thread                         audio thread
  ┌──────────────┐   VoiceMessage    ┌───────────────┐
  │ VoiceControl │ ───── rtrb ─────→ │ VoiceRenderer │ → Mixer → output
  └──────────────┘                   └───────────────┘
          │          VoiceTarget             ↑
          └──────── (atomics) ───────────────┘
   lives in the VoicePool             lives in the Mixer

The control half only pushes messages, so starting, gliding or stopping a
voice never blocks on the audio callback. The renderer drains its queue at
the top of each block and applies the messages in order.

The queue is finite. Updates are only queued while LIFECYCLE_HEADROOM slots
stay free, so Start and Stop normally always fit. Every call also records
the latest gate, frequency and amplitude in the voice's VoiceTarget. After
draining, the renderer reconciles against it:

  gate on,  envelope idle or releasing   → note_on at the target pitch
  gate off, envelope attack..sustain     → note_off
  always                                 → frequency and amplitude from target

So whatever the queue dropped, a voice returned to the pool goes quiet and
a started voice sounds by the end of the next block.
*/

const VOICE_QUEUE_SIZE: usize = 64;
const LIFECYCLE_HEADROOM: usize = 2;

/// Latest state written by the touch thread, read once per block.
struct VoiceTarget {
    gate: AtomicBool,
    frequency: AtomicU32,
    amplitude: AtomicU32,
}

impl VoiceTarget {
    fn new() -> Self {
        Self {
            gate: AtomicBool::new(false),
            frequency: AtomicU32::new(0.0f32.to_bits()),
            amplitude: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    fn record(&self, message: VoiceMessage) {
        match message {
            VoiceMessage::Start {
                frequency,
                amplitude,
            } => {
                self.set_params(frequency, amplitude);
                self.gate.store(true, Ordering::Release);
            }
            VoiceMessage::Update {
                frequency,
                amplitude,
            } => self.set_params(frequency, amplitude),
            VoiceMessage::Stop => self.gate.store(false, Ordering::Release),
        }
    }

    fn set_params(&self, frequency: f32, amplitude: f32) {
        self.frequency.store(frequency.to_bits(), Ordering::Relaxed);
        self.amplitude.store(amplitude.to_bits(), Ordering::Relaxed);
    }
}

/// Touch-side half of a channel voice.
pub struct VoiceControl {
    index: usize,
    tx: Producer<VoiceMessage>,
    target: Arc<VoiceTarget>,
}

impl VoiceControl {
    fn send(&mut self, message: VoiceMessage) {
        self.target.record(message);

        if matches!(message, VoiceMessage::Update { .. }) && self.tx.slots() <= LIFECYCLE_HEADROOM {
            return;
        }
        if self.tx.push(message).is_err() {
            log::warn!("voice {} queue full, {message:?} left to reconcile", self.index);
        }
    }
}

impl Voice for VoiceControl {
    fn start(&mut self, frequency: f64, amplitude: f64) {
        self.send(VoiceMessage::Start {
            frequency: frequency as f32,
            amplitude: amplitude as f32,
        });
    }

    fn update(&mut self, frequency: f64, amplitude: f64) {
        self.send(VoiceMessage::Update {
            frequency: frequency as f32,
            amplitude: amplitude as f32,
        });
    }

    fn stop(&mut self) {
        self.send(VoiceMessage::Stop);
    }
}

/// Audio-side half of a channel voice: a sine oscillator through an envelope.
pub struct VoiceRenderer {
    oscillator: Oscillator,
    envelope: Envelope,
    amplitude: f32,
    rx: Consumer<VoiceMessage>,
    target: Arc<VoiceTarget>,
}

impl VoiceRenderer {
    fn apply(&mut self, message: VoiceMessage) {
        match message {
            VoiceMessage::Start {
                frequency,
                amplitude,
            } => self.note_on(frequency, amplitude),
            VoiceMessage::Update {
                frequency,
                amplitude,
            } => {
                self.oscillator.set_frequency(frequency);
                self.amplitude = amplitude;
            }
            VoiceMessage::Stop => self.envelope.note_off(),
        }
    }

    fn note_on(&mut self, frequency: f32, amplitude: f32) {
        // A voice still releasing keeps its phase
        if !self.envelope.is_active() {
            self.oscillator.reset();
        }
        self.oscillator.set_frequency(frequency);
        self.amplitude = amplitude;
        self.envelope.note_on();
    }

    fn reconcile(&mut self) {
        let gate = self.target.gate.load(Ordering::Acquire);
        let frequency = f32::from_bits(self.target.frequency.load(Ordering::Relaxed));
        let amplitude = f32::from_bits(self.target.amplitude.load(Ordering::Relaxed));

        match (gate, self.envelope.stage()) {
            (true, EnvelopeStage::Idle | EnvelopeStage::Release) => {
                self.note_on(frequency, amplitude);
            }
            (false, EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Sustain) => {
                self.envelope.note_off();
            }
            _ => {}
        }
        self.oscillator.set_frequency(frequency);
        self.amplitude = amplitude;
    }

    /// Apply pending messages, then overwrite `out` with this voice's signal.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(message) = MessageReceiver::pop(&mut self.rx) {
            self.apply(message);
        }
        self.reconcile();

        if !self.envelope.is_active() {
            out.fill(0.0);
            return;
        }

        for sample in out.iter_mut() {
            *sample = self.oscillator.next_sample() * self.envelope.next_sample() * self.amplitude;
        }
    }

    /// Still sounding (including the release tail).
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }
}

/// Create one connected control/renderer pair.
pub fn voice_channel(kind: VoiceKind, sample_rate: f32, index: usize) -> (VoiceControl, VoiceRenderer) {
    let (tx, rx) = RingBuffer::<VoiceMessage>::new(VOICE_QUEUE_SIZE);
    let envelope = match kind {
        VoiceKind::Oscillator => Envelope::gate(sample_rate),
        VoiceKind::Enveloped => Envelope::touch(sample_rate),
    };

    let target = Arc::new(VoiceTarget::new());

    let control = VoiceControl {
        index,
        tx,
        target: Arc::clone(&target),
    };
    let renderer = VoiceRenderer {
        oscillator: Oscillator::new(sample_rate),
        envelope,
        amplitude: 0.0,
        rx,
        target,
    };
    (control, renderer)
}

/// Builds channel voices and keeps their renderers for the mixer.
pub struct ChannelVoiceFactory {
    kind: VoiceKind,
    sample_rate: f32,
    renderers: Vec<VoiceRenderer>,
}

impl ChannelVoiceFactory {
    pub fn new(kind: VoiceKind, sample_rate: f32) -> Self {
        Self {
            kind,
            sample_rate,
            renderers: Vec::new(),
        }
    }

    /// Hand every renderer created so far to a mixer.
    pub fn into_mixer(self) -> Mixer {
        Mixer::new(self.renderers)
    }
}

impl VoiceFactory for ChannelVoiceFactory {
    type Voice = VoiceControl;

    fn create_voice(&mut self) -> VoiceControl {
        let (control, renderer) = voice_channel(self.kind, self.sample_rate, self.renderers.len());
        self.renderers.push(renderer);
        control
    }
}

/// A pool of channel voices and the mixer that renders them.
pub fn voice_bank(kind: VoiceKind, capacity: usize, sample_rate: f32) -> (VoicePool<VoiceControl>, Mixer) {
    let mut factory = ChannelVoiceFactory::new(kind, sample_rate);
    let pool = VoicePool::new(capacity, &mut factory);
    log::debug!("built {capacity} {kind:?} voices at {sample_rate} Hz");
    (pool, factory.into_mixer())
}
