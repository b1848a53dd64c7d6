//! Color helpers for painting faded scene elements.

use constella_core::Rgb;
use ratatui::style::Color;

/// Blend `color` toward `background` to emulate opacity on a terminal.
pub fn faded(color: Rgb, background: Rgb, opacity: f32) -> Color {
    color.blend(background, opacity).to_color()
}

/// Brighten a color toward white.
pub fn glow(color: Rgb, amount: f32) -> Color {
    Rgb(255, 255, 255).blend(color, amount).to_color()
}
