//! The playing surface: string rows, fret columns, snap zones and touches

use ratatui::{
    layout::Rect,
    style::Color,
    widgets::canvas::{Canvas, Line, Points, Rectangle},
    Frame,
};

use saavy_touchpad::{
    pitch::Note, synth::VoiceControl, InstrumentConfig, Point, TouchId, TouchSurfaceController,
};

/// Render the grid into `area`.
///
/// Surface y grows downwards while canvas y grows upwards, so every y is
/// flipped against the surface height.
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    controller: &TouchSurfaceController<VoiceControl>,
    config: &InstrumentConfig,
    pointers: &[(TouchId, Point)],
) {
    let geometry = controller.mapper().geometry();
    let width = geometry.width();
    let height = geometry.height();
    let snap = geometry.snap_distance();
    let flip = |y: f64| height - y;

    let canvas = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            // Snap zones around every intersection
            for row in 0..geometry.rows() {
                let y = geometry.row_offset(row as f64);
                for column in 0..geometry.columns() {
                    let x = geometry.column_offset(column as f64);
                    ctx.draw(&Rectangle {
                        x: x - snap,
                        y: flip(y + snap),
                        width: 2.0 * snap,
                        height: 2.0 * snap,
                        color: Color::DarkGray,
                    });
                }
            }

            for column in 0..geometry.columns() {
                let x = geometry.column_offset(column as f64);
                ctx.draw(&Line {
                    x1: x,
                    y1: 0.0,
                    x2: x,
                    y2: height,
                    color: Color::Gray,
                });
            }

            for row in 0..geometry.rows() {
                let y = flip(geometry.row_offset(row as f64));
                ctx.draw(&Line {
                    x1: 0.0,
                    y1: y,
                    x2: width,
                    y2: y,
                    color: Color::Yellow,
                });

                // Open-string note name at the left edge
                let steps = (geometry.rows() - row - 1) as i32 * 7;
                let note = Note::from_index(config.base_note.index() + steps);
                ctx.print(0.0, y, note.name());
            }

            ctx.layer();
            let coords: Vec<(f64, f64)> = pointers
                .iter()
                .map(|(_, point)| (point.x, flip(point.y)))
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Cyan,
            });
        });

    frame.render_widget(canvas, area);
}
