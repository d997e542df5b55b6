//! Voice usage and the frequencies each touch is playing

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_touchpad::{
    synth::VoiceControl, touch::SessionVoice, TouchOutcome, TouchSurfaceController,
};

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    controller: &TouchSurfaceController<VoiceControl>,
    sample_rate: f32,
    last_outcome: Option<TouchOutcome>,
) {
    let pool = controller.pool();
    let mode = if controller.mapper().blends_rows() {
        "blend"
    } else {
        "single row"
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Voices: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{}/{}", pool.in_use_count(), pool.capacity())),
        Span::styled("  Mode: ", Style::default().fg(Color::Gray)),
        Span::raw(mode),
        Span::styled("  Rate: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{sample_rate} Hz")),
        Span::styled("  Last: ", Style::default().fg(Color::Gray)),
        Span::raw(match last_outcome {
            Some(outcome) => format!("{outcome:?}"),
            None => "-".to_string(),
        }),
    ])];

    for session in controller.sessions().iter() {
        let voices: Vec<String> = session
            .voices
            .as_slice()
            .iter()
            .map(voice_label)
            .collect();
        lines.push(Line::from(vec![
            Span::styled(
                format!("touch {}: ", session.id.0),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(voices.join("  ")),
        ]));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(paragraph, area);
}

/// Frequency and the amplitude the voice was last given (already weighted).
fn voice_label(voice: &SessionVoice) -> String {
    format!("{:.2} Hz x{:.2}", voice.frequency, voice.amplitude)
}
