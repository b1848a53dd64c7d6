//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use constella_config::Config;
use constella_core::{AnimationSpeed, MotionPreference, Theme};

#[derive(Debug, Parser)]
#[command(name = "constella")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A drifting particle constellation for your terminal", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color theme
    #[arg(short, long)]
    pub theme: Option<ThemeArg>,

    /// Animation speed
    #[arg(short, long)]
    pub speed: Option<SpeedArg>,

    /// Number of particles
    #[arg(short, long)]
    pub particles: Option<usize>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Keep the background still
    #[arg(long)]
    pub reduced_motion: bool,

    /// Disable meteors
    #[arg(long)]
    pub no_meteors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SpeedArg {
    Slow,
    Medium,
    Fast,
}

impl From<SpeedArg> for AnimationSpeed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => AnimationSpeed::Slow,
            SpeedArg::Medium => AnimationSpeed::Medium,
            SpeedArg::Fast => AnimationSpeed::Fast,
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of file settings.
    pub fn apply(&self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
        if let Some(speed) = self.speed {
            config.speed = speed.into();
        }
        if let Some(count) = self.particles {
            config.field.particle_count = count;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.reduced_motion {
            config.motion = MotionPreference::Reduced;
        }
        if self.no_meteors {
            config.field.meteors = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "constella",
            "--theme",
            "light",
            "--particles",
            "30",
            "--reduced-motion",
            "--no-meteors",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.field.particle_count, 30);
        assert_eq!(config.motion, MotionPreference::Reduced);
        assert!(!config.field.meteors);
        assert_eq!(config.speed, AnimationSpeed::Medium);
    }

    #[test]
    fn test_oversized_particle_count_fails_validation() {
        let cli = Cli::parse_from(["constella", "--particles", "100000000"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["constella"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
