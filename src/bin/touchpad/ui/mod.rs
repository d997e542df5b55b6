//! TUI module for touchpad
//!
//! Draws the playing surface and turns mouse buttons into touches.

mod grid;
mod status;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
    DefaultTerminal, Frame,
};

use saavy_touchpad::{
    synth::VoiceControl, InstrumentConfig, Point, TouchEvent, TouchId, TouchOutcome,
    TouchSurfaceController,
};

use grid::render_grid;
use status::render_status;

/// UI application state
pub struct TouchpadApp {
    controller: TouchSurfaceController<VoiceControl>,
    config: InstrumentConfig,
    sample_rate: f32,
    /// Inner area of the grid block from the last draw, for hit testing
    surface_area: Rect,
    /// Surface position of every pressed button
    pointers: Vec<(TouchId, Point)>,
    last_outcome: Option<TouchOutcome>,
    should_quit: bool,
}

impl TouchpadApp {
    pub fn new(
        controller: TouchSurfaceController<VoiceControl>,
        config: InstrumentConfig,
        sample_rate: f32,
    ) -> Self {
        Self {
            controller,
            config,
            sample_rate,
            surface_area: Rect::default(),
            pointers: Vec::new(),
            last_outcome: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.controller.release_all();
        self.pointers.clear();
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            // Panic button
            KeyCode::Char(' ') => {
                self.controller.release_all();
                self.pointers.clear();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (button, phase) = match mouse.kind {
            MouseEventKind::Down(button) => (button, Phase::Down),
            MouseEventKind::Drag(button) => (button, Phase::Drag),
            MouseEventKind::Up(button) => (button, Phase::Up),
            _ => return,
        };
        let id = button_id(button);
        let position = self.surface_point(mouse.column, mouse.row);

        let outcome = match (phase, position) {
            (Phase::Down, Some(point)) => {
                // Terminals drop Up events outside the window
                if self.controller.is_active(TouchId(id)) {
                    self.controller.handle(TouchEvent::cancelled(id));
                }
                self.set_pointer(TouchId(id), point);
                self.controller.handle(TouchEvent::began(id, point.x, point.y))
            }
            (Phase::Drag, Some(point)) => {
                self.set_pointer(TouchId(id), point);
                self.controller.handle(TouchEvent::moved(id, point.x, point.y))
            }
            (Phase::Up, _) => {
                let point = position.unwrap_or_default();
                self.pointers.retain(|(pointer, _)| *pointer != TouchId(id));
                self.controller.handle(TouchEvent::ended(id, point.x, point.y))
            }
            (_, None) => return,
        };
        self.last_outcome = Some(outcome);
    }

    fn set_pointer(&mut self, id: TouchId, point: Point) {
        match self.pointers.iter_mut().find(|(pointer, _)| *pointer == id) {
            Some(entry) => entry.1 = point,
            None => self.pointers.push((id, point)),
        }
    }

    /// Map a terminal cell to surface coordinates, cell centres scaled to the
    /// configured width and height.
    fn surface_point(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.surface_area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * self.config.width;
        let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * self.config.height;
        Some(Point::new(x, y))
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(7)])
            .split(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" touchpad (q to quit, space releases all) ");
        self.surface_area = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        render_grid(frame, self.surface_area, &self.controller, &self.config, &self.pointers);
        render_status(
            frame,
            chunks[1],
            &self.controller,
            self.sample_rate,
            self.last_outcome,
        );
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Down,
    Drag,
    Up,
}

fn button_id(button: MouseButton) -> u64 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
    }
}
