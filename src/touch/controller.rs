use crate::{
    config::{ConfigError, InstrumentConfig},
    pitch::FrequencyConverter,
    surface::{Mapping, PitchMapper},
    synth::{
        pool::{VoiceHandle, VoicePool},
        voice::Voice,
    },
    touch::{
        session::{SessionVoice, SessionVoices, TouchSessionTable},
        Point, TouchEvent, TouchId, TouchPhase,
    },
};

/// What a touch event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// A touch began and is sounding on this many voices.
    Voiced(usize),
    /// A touch began but the pool could not supply its voices.
    Silent,
    /// An active touch was re-mapped.
    Updated,
    /// An active touch ended and its voices went back to the pool.
    Released,
    /// The event referred to a touch with no session.
    Ignored,
}

/// Drives pooled voices from touch phases.
///
/// Each touch identity is either absent or active. `begin` makes it active if
/// every voice it needs can be allocated; `moved` re-maps an active touch;
/// `end` and `cancel` stop its voices and return them to the pool. Events for
/// absent touches do nothing, which is also how touches that began while the
/// pool was empty stay silent until they lift.
pub struct TouchSurfaceController<V: Voice> {
    mapper: PitchMapper,
    converter: FrequencyConverter,
    pool: VoicePool<V>,
    sessions: TouchSessionTable,
}

impl<V: Voice> TouchSurfaceController<V> {
    pub fn new(config: &InstrumentConfig, pool: VoicePool<V>) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(config.mapper()?, config.converter(), pool))
    }

    pub fn from_parts(mapper: PitchMapper, converter: FrequencyConverter, pool: VoicePool<V>) -> Self {
        let sessions = TouchSessionTable::with_capacity(pool.capacity());
        Self {
            mapper,
            converter,
            pool,
            sessions,
        }
    }

    pub fn handle(&mut self, event: TouchEvent) -> TouchOutcome {
        match event.phase {
            TouchPhase::Began => self.begin(event.id, event.position, event.pressure),
            TouchPhase::Moved => self.moved(event.id, event.position, event.pressure),
            TouchPhase::Ended => self.end(event.id),
            TouchPhase::Cancelled => self.cancel(event.id),
        }
    }

    pub fn begin(&mut self, id: TouchId, position: Point, pressure: Option<f64>) -> TouchOutcome {
        if self.sessions.contains(id) {
            log::warn!("touch {id:?} began while already active");
            debug_assert!(false, "touch {id:?} began while already active");
            return TouchOutcome::Ignored;
        }

        let Some(mut voices) = self.allocate_voices() else {
            log::debug!(
                "no free voice for touch {id:?} ({} of {} in use)",
                self.pool.in_use_count(),
                self.pool.capacity()
            );
            return TouchOutcome::Silent;
        };

        let mapping = self.mapper.map(position, pressure);
        for (slot, tone) in voices.as_mut_slice().iter_mut().zip(mapping.voice_tones()) {
            slot.weight = tone.weight;
            slot.frequency = self.converter.frequency(tone.step);
            slot.amplitude = tone.amplitude;
            if let Some(voice) = self.pool.voice_mut(&slot.handle) {
                voice.start(slot.frequency, slot.amplitude);
            }
        }

        let count = voices.count();
        log::debug!("touch {id:?} began on {count} voice(s)");
        self.sessions.begin(id, voices);
        TouchOutcome::Voiced(count)
    }

    pub fn moved(&mut self, id: TouchId, position: Point, pressure: Option<f64>) -> TouchOutcome {
        let Some(session) = self.sessions.get_mut(id) else {
            return TouchOutcome::Ignored;
        };

        let mapping = self.mapper.map(position, pressure);
        for (slot, tone) in session.voices.as_mut_slice().iter_mut().zip(mapping.voice_tones()) {
            slot.weight = tone.weight;
            slot.frequency = self.converter.frequency(tone.step);
            slot.amplitude = tone.amplitude;
            if let Some(voice) = self.pool.voice_mut(&slot.handle) {
                voice.update(slot.frequency, slot.amplitude);
            }
        }
        TouchOutcome::Updated
    }

    pub fn end(&mut self, id: TouchId) -> TouchOutcome {
        match self.sessions.end(id) {
            Some(session) => {
                self.stop_and_release(session.voices);
                log::debug!("touch {id:?} ended");
                TouchOutcome::Released
            }
            None => TouchOutcome::Ignored,
        }
    }

    /// Cancelled touches are treated exactly like ended ones.
    pub fn cancel(&mut self, id: TouchId) -> TouchOutcome {
        self.end(id)
    }

    /// Stop every sounding touch and return all voices to the pool.
    pub fn release_all(&mut self) {
        while let Some(session) = self.sessions.pop() {
            self.stop_and_release(session.voices);
        }
    }

    /// Mapping a point would produce, without touching any voice.
    pub fn preview(&self, position: Point, pressure: Option<f64>) -> Mapping {
        self.mapper.map(position, pressure)
    }

    pub fn mapper(&self) -> &PitchMapper {
        &self.mapper
    }

    pub fn converter(&self) -> &FrequencyConverter {
        &self.converter
    }

    pub fn pool(&self) -> &VoicePool<V> {
        &self.pool
    }

    pub fn sessions(&self) -> &TouchSessionTable {
        &self.sessions
    }

    pub fn is_active(&self, id: TouchId) -> bool {
        self.sessions.contains(id)
    }

    /// All-or-nothing: either every voice the mode needs, or none.
    fn allocate_voices(&mut self) -> Option<SessionVoices> {
        let first = self.pool.allocate()?;
        if !self.mapper.blends_rows() {
            return Some(SessionVoices::Single(SessionVoice::new(first)));
        }

        match self.pool.allocate() {
            Some(second) => Some(SessionVoices::Pair([
                SessionVoice::new(first),
                SessionVoice::new(second),
            ])),
            None => {
                self.pool.release(first);
                None
            }
        }
    }

    fn stop_and_release(&mut self, voices: SessionVoices) {
        for handle in voices.into_handles() {
            self.stop_voice(&handle);
            self.pool.release(handle);
        }
    }

    fn stop_voice(&mut self, handle: &VoiceHandle) {
        if let Some(voice) = self.pool.voice_mut(handle) {
            voice.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use float_cmp::approx_eq;

    use super::*;
    use crate::{
        pitch::Note,
        surface::GeometryError,
        synth::{
            voice::recording::{recording_factory, CallLog, RecordingVoice, VoiceCall},
            voice::VoiceState,
        },
    };

    fn config(blend_rows: bool, capacity: usize) -> InstrumentConfig {
        InstrumentConfig::default()
            .with_blend_rows(blend_rows)
            .with_voice_capacity(capacity)
    }

    fn controller(
        config: &InstrumentConfig,
    ) -> (TouchSurfaceController<RecordingVoice>, CallLog) {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let pool = VoicePool::new(config.voice_capacity, &mut recording_factory(&log));
        let controller = TouchSurfaceController::new(config, pool).unwrap();
        (controller, log)
    }

    fn assert_pool_conserved(controller: &TouchSurfaceController<RecordingVoice>) {
        let pool = controller.pool();
        assert_eq!(pool.free_count() + pool.in_use_count(), pool.capacity());
        let held: usize = controller.sessions().iter().map(|s| s.voices.count()).sum();
        assert_eq!(held, pool.in_use_count());
    }

    #[test]
    fn begin_starts_one_voice_in_single_row_mode() {
        let (mut controller, log) = controller(&config(false, 10));
        let outcome = controller.handle(TouchEvent::began(1, 40.0, 360.0));

        assert_eq!(outcome, TouchOutcome::Voiced(1));
        assert!(controller.is_active(TouchId(1)));
        assert_eq!(controller.pool().in_use_count(), 1);

        // bottom row, first column: the base note itself
        let expected = controller.converter().frequency(0.0);
        assert_eq!(
            log.borrow().as_slice(),
            &[VoiceCall::Start {
                voice: 0,
                frequency: expected,
                amplitude: 1.0
            }]
        );
    }

    #[test]
    fn move_updates_held_voices_only() {
        let (mut controller, log) = controller(&config(false, 10));
        controller.handle(TouchEvent::began(1, 40.0, 360.0));
        controller.handle(TouchEvent::began(2, 600.0, 40.0));
        log.borrow_mut().clear();

        assert_eq!(
            controller.handle(TouchEvent::moved(1, 120.0, 360.0)),
            TouchOutcome::Updated
        );
        let calls = log.borrow();
        assert_eq!(calls.len(), 1);
        let VoiceCall::Update { voice, frequency, .. } = calls[0] else {
            panic!("expected an update, got {:?}", calls[0]);
        };
        assert_eq!(voice, 0);
        let one_step_up = controller.converter().frequency(1.0);
        assert!(approx_eq!(f64, frequency, one_step_up, ulps = 4));
        assert_eq!(controller.pool().in_use_count(), 2);
    }

    #[test]
    fn end_stops_then_releases() {
        let (mut controller, log) = controller(&config(false, 10));
        controller.handle(TouchEvent::began(1, 40.0, 360.0));

        assert_eq!(
            controller.handle(TouchEvent::ended(1, 40.0, 360.0)),
            TouchOutcome::Released
        );
        assert_eq!(log.borrow().last(), Some(&VoiceCall::Stop { voice: 0 }));
        assert!(!controller.is_active(TouchId(1)));
        assert_eq!(controller.pool().free_count(), 10);
        assert_eq!(controller.pool().state(0), Some(VoiceState::Free));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "already active"))]
    fn second_begin_for_an_active_touch_is_ignored() {
        let (mut controller, log) = controller(&config(false, 10));
        controller.handle(TouchEvent::began(1, 40.0, 360.0));

        let outcome = controller.handle(TouchEvent::began(1, 200.0, 40.0));
        assert_eq!(outcome, TouchOutcome::Ignored);
        assert_eq!(controller.pool().in_use_count(), 1);
        assert_eq!(controller.sessions().len(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn cancel_behaves_like_end() {
        let (mut controller, log) = controller(&config(true, 10));
        controller.handle(TouchEvent::began(9, 100.0, 160.0));
        assert_eq!(controller.pool().in_use_count(), 2);

        assert_eq!(
            controller.handle(TouchEvent::cancelled(9)),
            TouchOutcome::Released
        );
        let stops = log
            .borrow()
            .iter()
            .filter(|call| matches!(call, VoiceCall::Stop { .. }))
            .count();
        assert_eq!(stops, 2);
        assert_eq!(controller.pool().free_count(), 10);
    }

    #[test]
    fn events_for_absent_touches_are_ignored() {
        let (mut controller, log) = controller(&config(false, 4));
        assert_eq!(
            controller.handle(TouchEvent::moved(5, 10.0, 10.0)),
            TouchOutcome::Ignored
        );
        assert_eq!(
            controller.handle(TouchEvent::ended(5, 10.0, 10.0)),
            TouchOutcome::Ignored
        );
        assert_eq!(controller.handle(TouchEvent::cancelled(5)), TouchOutcome::Ignored);
        assert!(log.borrow().is_empty());
        assert_eq!(controller.pool().free_count(), 4);
    }

    #[test]
    fn exhausted_pool_leaves_touch_silent_until_a_voice_frees() {
        let (mut controller, log) = controller(&config(false, 2));

        assert_eq!(controller.handle(TouchEvent::began(1, 40.0, 40.0)), TouchOutcome::Voiced(1));
        assert_eq!(controller.handle(TouchEvent::began(2, 120.0, 40.0)), TouchOutcome::Voiced(1));
        assert_eq!(controller.handle(TouchEvent::began(3, 200.0, 40.0)), TouchOutcome::Silent);
        assert!(!controller.is_active(TouchId(3)));
        assert_eq!(controller.sessions().len(), 2);

        // the silent touch moves and lifts without effect
        let calls_before = log.borrow().len();
        controller.handle(TouchEvent::moved(3, 210.0, 40.0));
        controller.handle(TouchEvent::ended(3, 210.0, 40.0));
        assert_eq!(log.borrow().len(), calls_before);

        controller.handle(TouchEvent::ended(1, 40.0, 40.0));
        assert_eq!(controller.handle(TouchEvent::began(4, 280.0, 40.0)), TouchOutcome::Voiced(1));
        assert_pool_conserved(&controller);
    }

    #[test]
    fn blend_allocation_is_all_or_nothing() {
        let (mut controller, log) = controller(&config(true, 3));
        assert_eq!(controller.handle(TouchEvent::began(1, 40.0, 160.0)), TouchOutcome::Voiced(2));
        assert_eq!(controller.pool().free_count(), 1);
        let calls_before = log.borrow().len();

        assert_eq!(controller.handle(TouchEvent::began(2, 40.0, 160.0)), TouchOutcome::Silent);
        assert_eq!(controller.pool().free_count(), 1);
        assert_eq!(log.borrow().len(), calls_before);
        assert!(!controller.is_active(TouchId(2)));
        assert_pool_conserved(&controller);
    }

    #[test]
    fn blend_splits_amplitude_across_two_voices() {
        let config = config(true, 4)
            .with_pressure_sensing(true)
            .with_base(Note::A, 2);
        let (mut controller, log) = controller(&config);
        controller.handle(TouchEvent::began(1, 320.0, 160.0).with_pressure(config.reference_pressure_max));

        let starts: Vec<(usize, f64, f64)> = log
            .borrow()
            .iter()
            .filter_map(|call| match *call {
                VoiceCall::Start { voice, frequency, amplitude } => Some((voice, frequency, amplitude)),
                _ => None,
            })
            .collect();
        assert_eq!(starts.len(), 2);
        let total: f64 = starts.iter().map(|(_, _, amp)| amp).sum();
        assert!(approx_eq!(f64, total, 1.0, epsilon = 1e-12));

        // slot 0 carries even row 2, slot 1 carries odd row 1 (a fifth higher)
        let session = controller.sessions().get(TouchId(1)).unwrap();
        let slots = session.voices.as_slice();
        assert!(approx_eq!(f64, slots[1].frequency / slots[0].frequency, 2f64.powf(7.0 / 12.0), epsilon = 1e-9));
        assert!(approx_eq!(f64, slots[0].weight, 0.5, ulps = 4));
    }

    #[test]
    fn sliding_across_rows_keeps_voice_slots() {
        let (mut controller, log) = controller(&config(true, 2));
        controller.handle(TouchEvent::began(1, 40.0, 120.0)); // on row 1
        log.borrow_mut().clear();

        // down onto row 2, then row 3
        controller.handle(TouchEvent::moved(1, 40.0, 200.0));
        controller.handle(TouchEvent::moved(1, 40.0, 280.0));

        let session = controller.sessions().get(TouchId(1)).unwrap();
        let slots = session.voices.as_slice();
        // on row 3 exactly: odd slot fully on, even slot silent
        assert_eq!(slots[0].weight, 0.0);
        assert_eq!(slots[1].weight, 1.0);
        assert_eq!(controller.pool().in_use_count(), 2);
        assert!(log
            .borrow()
            .iter()
            .all(|call| matches!(call, VoiceCall::Update { .. })));
    }

    #[test]
    fn release_all_returns_every_voice() {
        let (mut controller, _log) = controller(&config(true, 10));
        for id in 0..5u64 {
            controller.handle(TouchEvent::began(id, 40.0 + 80.0 * id as f64, 200.0));
        }
        assert!(controller.pool().is_exhausted());

        controller.release_all();
        assert!(controller.sessions().is_empty());
        assert_eq!(controller.pool().free_count(), 10);
    }

    #[test]
    fn random_walk_conserves_pool() {
        let (mut controller, _log) = controller(&config(true, 5));
        let mut active = Vec::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next_id = 0u64;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let x = (seed % 640) as f64;
            let y = ((seed >> 16) % 400) as f64;

            match seed % 4 {
                0 | 1 => {
                    next_id += 1;
                    if controller.handle(TouchEvent::began(next_id, x, y)) != TouchOutcome::Silent {
                        active.push(next_id);
                    }
                }
                2 if !active.is_empty() => {
                    let id = active[(seed as usize >> 8) % active.len()];
                    assert_eq!(controller.handle(TouchEvent::moved(id, x, y)), TouchOutcome::Updated);
                }
                _ if !active.is_empty() => {
                    let id = active.swap_remove((seed as usize >> 8) % active.len());
                    assert_eq!(controller.handle(TouchEvent::ended(id, x, y)), TouchOutcome::Released);
                }
                _ => {}
            }

            assert_pool_conserved(&controller);
            assert_eq!(controller.sessions().len(), active.len());
        }
    }

    #[test]
    fn invalid_geometry_is_rejected_up_front() {
        let config = InstrumentConfig::default().with_snap_distance(45.0);
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let pool = VoicePool::new(2, &mut recording_factory(&log));
        assert!(matches!(
            TouchSurfaceController::new(&config, pool),
            Err(ConfigError::Geometry(GeometryError::ColumnsTooNarrow { .. }))
        ));
    }

    #[test]
    fn invalid_reference_pressure_is_rejected_up_front() {
        let config = InstrumentConfig::default().with_reference_pressure(0.0);
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let pool = VoicePool::new(2, &mut recording_factory(&log));
        assert!(matches!(
            TouchSurfaceController::new(&config, pool),
            Err(ConfigError::ReferencePressure(_))
        ));
    }
}
