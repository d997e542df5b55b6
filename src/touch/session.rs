use crate::{synth::pool::VoiceHandle, touch::TouchId};

/// A voice held by a touch along with what it was last told to play.
#[derive(Debug)]
pub struct SessionVoice {
    pub handle: VoiceHandle,
    /// Share of the touch this voice carries (1.0 outside blend mode).
    pub weight: f64,
    pub frequency: f64,
    pub amplitude: f64,
}

impl SessionVoice {
    pub fn new(handle: VoiceHandle) -> Self {
        Self {
            handle,
            weight: 0.0,
            frequency: 0.0,
            amplitude: 0.0,
        }
    }
}

/// The one or two voices bound to a touch, in voice-slot order.
#[derive(Debug)]
pub enum SessionVoices {
    Single(SessionVoice),
    Pair([SessionVoice; 2]),
}

impl SessionVoices {
    pub fn as_slice(&self) -> &[SessionVoice] {
        match self {
            SessionVoices::Single(voice) => std::slice::from_ref(voice),
            SessionVoices::Pair(pair) => pair,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [SessionVoice] {
        match self {
            SessionVoices::Single(voice) => std::slice::from_mut(voice),
            SessionVoices::Pair(pair) => pair,
        }
    }

    /// One outside blend mode, two inside it.
    pub fn count(&self) -> usize {
        self.as_slice().len()
    }

    /// Give up the handles so they can go back to the pool.
    pub fn into_handles(self) -> impl Iterator<Item = VoiceHandle> {
        let (first, second) = match self {
            SessionVoices::Single(voice) => (voice.handle, None),
            SessionVoices::Pair([a, b]) => (a.handle, Some(b.handle)),
        };
        [Some(first), second].into_iter().flatten()
    }
}

#[derive(Debug)]
pub struct TouchSession {
    pub id: TouchId,
    pub voices: SessionVoices,
}

/// Active touches and the voices they own.
///
/// Sessions live in a flat vector sized for the pool, so there is at most one
/// entry per pooled voice and inserting never reallocates. Lookups are linear,
/// which for a handful of fingers beats hashing.
#[derive(Debug, Default)]
pub struct TouchSessionTable {
    sessions: Vec<TouchSession>,
}

impl TouchSessionTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Vec::with_capacity(capacity),
        }
    }

    /// Record a new session. Callers check [`contains`](Self::contains)
    /// first: an identity is never active twice.
    pub fn begin(&mut self, id: TouchId, voices: SessionVoices) {
        debug_assert!(!self.contains(id), "touch {id:?} began twice");
        self.sessions.push(TouchSession { id, voices });
    }

    pub fn get(&self, id: TouchId) -> Option<&TouchSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: TouchId) -> Option<&mut TouchSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Remove and return a session.
    pub fn end(&mut self, id: TouchId) -> Option<TouchSession> {
        let position = self.sessions.iter().position(|s| s.id == id)?;
        Some(self.sessions.swap_remove(position))
    }

    /// Remove the most recently begun session.
    pub fn pop(&mut self) -> Option<TouchSession> {
        self.sessions.pop()
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::synth::{
        pool::VoicePool,
        voice::recording::{recording_factory, CallLog, RecordingVoice},
    };

    fn pool(capacity: usize) -> VoicePool<RecordingVoice> {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        VoicePool::new(capacity, &mut recording_factory(&log))
    }

    #[test]
    fn begin_get_end() {
        let mut pool = pool(4);
        let mut table = TouchSessionTable::with_capacity(4);
        let voice = SessionVoice::new(pool.allocate().unwrap());

        table.begin(TouchId(7), SessionVoices::Single(voice));
        assert!(table.contains(TouchId(7)));
        assert_eq!(table.get(TouchId(7)).unwrap().voices.count(), 1);
        assert!(table.get(TouchId(8)).is_none());

        let session = table.end(TouchId(7)).unwrap();
        assert!(table.is_empty());
        assert!(table.end(TouchId(7)).is_none());

        for handle in session.voices.into_handles() {
            pool.release(handle);
        }
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn pair_yields_both_handles_in_slot_order() {
        let mut pool = pool(2);
        let a = SessionVoice::new(pool.allocate().unwrap());
        let b = SessionVoice::new(pool.allocate().unwrap());
        let voices = SessionVoices::Pair([a, b]);
        assert_eq!(voices.count(), 2);

        let indices: Vec<usize> = voices.into_handles().map(|h| h.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn sessions_are_independent() {
        let mut pool = pool(3);
        let mut table = TouchSessionTable::with_capacity(3);
        for id in 1..=3 {
            let voice = SessionVoice::new(pool.allocate().unwrap());
            table.begin(TouchId(id), SessionVoices::Single(voice));
        }

        table.get_mut(TouchId(2)).unwrap().voices.as_mut_slice()[0].frequency = 440.0;
        let removed = table.end(TouchId(1)).unwrap();
        assert_eq!(removed.id, TouchId(1));
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(TouchId(2)).unwrap().voices.as_slice()[0].frequency,
            440.0
        );
        assert_eq!(table.get(TouchId(3)).unwrap().voices.as_slice()[0].frequency, 0.0);
    }
}
