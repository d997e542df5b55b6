//! touchpad - play the magnetic-fret surface with the mouse
//!
//! Run with: cargo run --bin touchpad [-- --blend] [-- --oscillator]
//!
//! Each mouse button is a separate finger: hold the left button and drag to
//! glide, add the right button for a second touch.

mod app;
mod ui;

use saavy_touchpad::{InstrumentConfig, VoiceKind};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut config = InstrumentConfig::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--blend" => config = config.with_blend_rows(true),
            "--oscillator" => config = config.with_voice_kind(VoiceKind::Oscillator),
            other => eprintln!("ignoring unknown argument {other}"),
        }
    }

    app::run(config)
}
