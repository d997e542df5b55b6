// Purpose: voices, the fixed pool that hands them out, and the
// lock-free channel backend that renders them

pub mod factory;
pub mod message;
pub mod pool;
pub mod voice;

#[cfg(feature = "rtrb")]
pub mod channel;
#[cfg(feature = "rtrb")]
pub mod mixer;

pub use factory::VoiceFactory;
pub use pool::{VoiceHandle, VoicePool};
pub use voice::{Voice, VoiceState};

#[cfg(feature = "rtrb")]
pub use channel::{voice_bank, voice_channel, ChannelVoiceFactory, VoiceControl, VoiceRenderer};
#[cfg(feature = "rtrb")]
pub use mixer::Mixer;
