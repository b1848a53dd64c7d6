//! Paint a [`Scene`] onto a ratatui braille canvas.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Line as CanvasLine},
};

use crate::chars::METEOR_HEAD;
use crate::color::{faded, glow};
use crate::scene::{DrawCommand, Scene};

/// Render the scene into `area`. An empty scene draws nothing.
pub fn render_scene(frame: &mut Frame, area: Rect, scene: &Scene) {
    if scene.is_empty() || scene.viewport.is_empty() || area.is_empty() {
        return;
    }

    let background = scene.background;
    // Canvas y grows upward; scene y grows downward.
    let height = scene.viewport.height as f64;
    let flip = |y: f32| height - y as f64;

    let canvas = Canvas::default()
        .background_color(background.to_color())
        .marker(Marker::Braille)
        .x_bounds([0.0, scene.viewport.width as f64])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for command in &scene.commands {
                if let DrawCommand::Link {
                    from,
                    to,
                    color,
                    opacity,
                } = command
                {
                    ctx.draw(&CanvasLine::new(
                        from.0 as f64,
                        flip(from.1),
                        to.0 as f64,
                        flip(to.1),
                        faded(*color, background, *opacity),
                    ));
                }
            }

            // Meteor tails sit above the links.
            ctx.layer();
            for command in &scene.commands {
                if let DrawCommand::Trail {
                    from,
                    to,
                    color,
                    opacity,
                } = command
                {
                    ctx.draw(&CanvasLine::new(
                        from.0 as f64,
                        flip(from.1),
                        to.0 as f64,
                        flip(to.1),
                        faded(*color, background, *opacity),
                    ));
                }
            }

            for command in &scene.commands {
                match command {
                    DrawCommand::Particle {
                        x,
                        y,
                        radius,
                        shape,
                        color,
                        opacity,
                    } => {
                        let style = Style::new().fg(faded(*color, background, *opacity));
                        ctx.print(
                            *x as f64,
                            flip(*y),
                            Span::styled(shape.glyph(*radius).to_string(), style),
                        );
                    }
                    DrawCommand::MeteorHead { x, y, size, color } => {
                        let style = Style::new().fg(glow(*color, (*size / 3.0).min(1.0)));
                        ctx.print(
                            *x as f64,
                            flip(*y),
                            Span::styled(METEOR_HEAD.to_string(), style),
                        );
                    }
                    DrawCommand::Link { .. } | DrawCommand::Trail { .. } => {}
                }
            }
        });

    frame.render_widget(canvas, area);
}
