//! The terminal application: event loop, key handling and overlay.

use std::io::{self, Stdout};
use std::time::Instant;

use constella_background::{
    Animation, FieldParams, ListenerKind, ParticleField, StartOutcome, render_scene,
};
use constella_config::{Config, OverlayConfig};
use constella_core::Theme;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::Block,
};

use crate::host::{TerminalHost, cell_to_pixels, surface_pixels};

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Background animation, owning the terminal host.
    animation: Animation<TerminalHost<Stdout>>,
    /// Current color theme.
    theme: Theme,
    overlay: OverlayConfig,
    started_at: Instant,
}

impl App {
    /// Construct a new instance of [`App`] from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        let params = FieldParams {
            particle_count: config.field.particle_count,
            connection_distance: config.field.connection_distance,
            attraction_radius: config.field.attraction_radius,
            meteors: config.field.meteors,
            ..FieldParams::default()
        };
        let host = TerminalHost::new(io::stdout(), config.reduced_motion(), config.fps);
        let field = ParticleField::new(params, config.theme);

        Self {
            running: false,
            animation: Animation::new(host, field, config.speed),
            theme: config.theme,
            overlay: config.overlay.clone(),
            started_at: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.animation.host_mut().set_size(size.width, size.height);

        match self.animation.start() {
            StartOutcome::Started => tracing::info!(
                cols = size.width,
                rows = size.height,
                "background running"
            ),
            outcome => tracing::info!(?outcome, "background not started"),
        }

        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.fire_due_frame();
        }

        self.animation.stop();
        let host = self.animation.host();
        tracing::debug!(
            listeners = host.listener_count(),
            pending_frame = host.has_pending_frame(),
            mouse_captured = host.mouse_captured(),
            "background released"
        );
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let palette = self.theme.palette();
        let area = frame.area();

        frame.render_widget(
            Block::new().style(Style::new().bg(palette.background.to_color())),
            area,
        );
        render_scene(frame, area, self.animation.scene());

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Tagline
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let accent = palette.accent(0).to_color();
        let muted = palette.muted.to_color();

        let title = Line::from(self.overlay.title.as_str())
            .style(Style::new().fg(palette.text.to_color()).bold())
            .centered();
        frame.render_widget(title, chunks[1]);

        let tagline = Line::from(self.overlay.tagline.as_str())
            .style(Style::new().fg(muted))
            .centered();
        frame.render_widget(tagline, chunks[3]);

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".fg(muted),
            "t".bold().fg(accent),
            format!(" theme ({})  ", self.theme.name()).fg(muted),
            "s".bold().fg(accent),
            format!(" speed ({})", self.animation.speed().name()).fg(muted),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }

    /// Waits for input until the next frame is due. With no frame pending
    /// this blocks until an event arrives.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        match self.animation.host().time_until_frame(Instant::now()) {
            Some(timeout) => {
                if event::poll(timeout)? {
                    self.on_event(event::read()?);
                }
            }
            None => self.on_event(event::read()?),
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::FocusLost => {
                if self.animation.host().is_listening(ListenerKind::PointerLeave) {
                    self.animation.on_pointer_leave();
                }
            }
            Event::Resize(cols, rows) => {
                self.animation.host_mut().set_size(cols, rows);
                if self.animation.host().is_listening(ListenerKind::Resize) {
                    let (width, height) = surface_pixels(cols, rows);
                    self.animation.on_resize(width, height);
                }
            }
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !self.animation.host().is_listening(ListenerKind::PointerMove) {
            return;
        }
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                let (x, y) = cell_to_pixels(mouse.column, mouse.row);
                self.animation.on_pointer_move(x, y);
            }
            _ => {}
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            _ => {}
        }
    }

    fn fire_due_frame(&mut self) {
        let now = Instant::now();
        if let Some(handle) = self.animation.host_mut().take_due_frame(now) {
            let elapsed_ms = now.duration_since(self.started_at).as_millis() as u64;
            self.animation.on_frame(handle, elapsed_ms);
        }
    }

    /// Toggle between the light and dark palettes.
    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.animation.set_theme(self.theme);
        tracing::debug!(theme = self.theme.name(), "theme changed");
    }

    /// Cycle through animation speeds.
    fn cycle_speed(&mut self) {
        let speed = self.animation.speed().next();
        self.animation.set_speed(speed);
        tracing::debug!(speed = speed.name(), "speed changed");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
