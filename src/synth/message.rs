#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Control messages sent from the touch thread to one voice renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    Start { frequency: f32, amplitude: f32 },
    Update { frequency: f32, amplitude: f32 },
    Stop,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}
