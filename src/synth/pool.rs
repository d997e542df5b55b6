use crate::synth::{
    factory::VoiceFactory,
    voice::{Voice, VoiceState},
};

/// Exclusive claim on one pooled voice.
///
/// Handles are minted only by [`VoicePool::allocate`] and are neither `Clone`
/// nor `Copy`: whoever holds the handle owns the voice until it is passed back
/// to [`VoicePool::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct VoiceHandle {
    index: usize,
}

impl VoiceHandle {
    fn new(index: usize) -> Self {
        Self { index }
    }

    /// Slot of the voice inside its pool.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Fixed-capacity arena of reusable voices.
///
/// All voices are created up front; afterwards `allocate` and `release` only
/// move indices on and off a pre-sized free stack, so the touch path never
/// allocates.
pub struct VoicePool<V: Voice> {
    voices: Vec<V>,
    states: Vec<VoiceState>,
    free: Vec<usize>,
}

impl<V: Voice> VoicePool<V> {
    /// Fill a pool with `capacity` voices from a factory.
    pub fn new<F>(capacity: usize, factory: &mut F) -> Self
    where
        F: VoiceFactory<Voice = V>,
    {
        let voices = (0..capacity).map(|_| factory.create_voice()).collect();
        Self::from_voices(voices)
    }

    pub fn from_voices(voices: Vec<V>) -> Self {
        let capacity = voices.len();
        // Reversed so the first allocation pops slot 0
        let free = (0..capacity).rev().collect();

        Self {
            voices,
            states: vec![VoiceState::Free; capacity],
            free,
        }
    }

    /// Claim a free voice, or `None` when every voice is in use.
    pub fn allocate(&mut self) -> Option<VoiceHandle> {
        let index = self.free.pop()?;
        debug_assert_eq!(self.states[index], VoiceState::Free);
        self.states[index] = VoiceState::InUse;
        Some(VoiceHandle::new(index))
    }

    /// Return a voice to the free stack.
    ///
    /// Stopping the voice is the caller's job. Releasing a voice that is
    /// already free is a programming error: it asserts in debug builds and is
    /// ignored in release builds so the free stack never holds duplicates.
    pub fn release(&mut self, handle: VoiceHandle) {
        let index = handle.index;
        match self.states.get(index) {
            Some(VoiceState::InUse) => {
                self.states[index] = VoiceState::Free;
                self.free.push(index);
            }
            Some(VoiceState::Free) => {
                log::warn!("voice {index} released twice");
                debug_assert!(false, "voice {index} released twice");
            }
            None => {
                log::warn!("voice {index} does not belong to this pool");
                debug_assert!(false, "voice {index} does not belong to this pool");
            }
        }
    }

    pub fn voice_mut(&mut self, handle: &VoiceHandle) -> Option<&mut V> {
        self.voices.get_mut(handle.index)
    }

    pub fn state(&self, index: usize) -> Option<VoiceState> {
        self.states.get(index).copied()
    }

    pub fn is_in_use(&self, index: usize) -> bool {
        self.state(index) == Some(VoiceState::InUse)
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn in_use_count(&self) -> usize {
        self.capacity() - self.free_count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }
}
