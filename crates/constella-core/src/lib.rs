//! Core types shared by the constella crates.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linearly blend `self` over `background` with the given opacity (0.0-1.0).
    pub fn blend(self, background: Rgb, opacity: f32) -> Rgb {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
        Rgb(
            mix(self.0, background.0),
            mix(self.1, background.1),
            mix(self.2, background.2),
        )
    }

    /// Convert to a Ratatui color.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Light or dark rendering theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Toggle between light and dark.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// The palette used to draw the background in this theme.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                accents: [Rgb(100, 255, 218), Rgb(167, 139, 250), Rgb(244, 114, 182)],
                background: Rgb(10, 12, 24),
                meteor: Rgb(240, 245, 255),
                text: Rgb(226, 232, 240),
                muted: Rgb(100, 116, 139),
            },
            Theme::Light => Palette {
                accents: [Rgb(37, 99, 235), Rgb(124, 58, 237), Rgb(219, 39, 119)],
                background: Rgb(248, 250, 252),
                meteor: Rgb(30, 41, 59),
                text: Rgb(15, 23, 42),
                muted: Rgb(100, 116, 139),
            },
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// The three particle colors, indexed by a particle's color index.
    pub accents: [Rgb; 3],
    /// Canvas background; faded elements blend toward it.
    pub background: Rgb,
    /// Meteor head and trail color.
    pub meteor: Rgb,
    /// Overlay text color.
    pub text: Rgb,
    /// Overlay secondary text color.
    pub muted: Rgb,
}

impl Palette {
    /// Accent color for a color index, wrapping out-of-range indices.
    pub fn accent(&self, index: usize) -> Rgb {
        self.accents[index % self.accents.len()]
    }
}

/// Global animation speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Multiplier applied to simulated time.
    pub fn multiplier(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.75,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

/// Reduced-motion preference as configured by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPreference {
    /// Decide from the environment.
    #[default]
    Auto,
    Full,
    Reduced,
}

/// Viewport size in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether anything can be drawn into this viewport.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Last known pointer position in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    /// Whether the pointer is currently over the surface.
    pub active: bool,
}

impl Pointer {
    /// An active pointer at the given position.
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, active: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
    }

    #[test]
    fn test_palettes_differ_between_themes() {
        let dark = Theme::Dark.palette();
        let light = Theme::Light.palette();
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.accents, light.accents);
        assert_eq!(dark.accent(4), dark.accents[1]);
    }

    #[test]
    fn test_blend() {
        let fg = Rgb(200, 100, 0);
        let bg = Rgb(0, 0, 0);
        assert_eq!(fg.blend(bg, 1.0), fg);
        assert_eq!(fg.blend(bg, 0.0), bg);
        assert_eq!(fg.blend(bg, 0.5), Rgb(100, 50, 0));
        assert_eq!(fg.blend(bg, 3.0), fg);
    }

    #[test]
    fn test_speed_cycle() {
        let speed = AnimationSpeed::default();
        assert_eq!(speed, AnimationSpeed::Medium);
        assert_eq!(speed.next().next().next(), speed);
        assert!(AnimationSpeed::Slow.multiplier() < AnimationSpeed::Fast.multiplier());
    }

    #[test]
    fn test_viewport_empty() {
        assert!(Viewport::default().is_empty());
        assert!(Viewport::new(10.0, 0.0).is_empty());
        assert!(!Viewport::new(1920.0, 1080.0).is_empty());
    }
}
