//! Configuration file handling for constella.
//!
//! Settings are read from `config.toml` in the platform configuration
//! directory (for example `~/.config/constella/config.toml` on Linux). A
//! missing file is not an error: every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use constella_core::{AnimationSpeed, MotionPreference, Theme};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when `motion = "auto"`.
pub const REDUCED_MOTION_ENV: &str = "CONSTELLA_REDUCED_MOTION";

/// Largest accepted `field.particle_count`. Links are found by checking every
/// pair of particles each frame.
pub const MAX_PARTICLES: usize = 1000;

/// Name of the configuration file inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub theme: Theme,
    pub speed: AnimationSpeed,
    pub motion: MotionPreference,
    /// Target frames per second.
    pub fps: u32,
    pub field: FieldConfig,
    pub overlay: OverlayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            speed: AnimationSpeed::default(),
            motion: MotionPreference::default(),
            fps: 30,
            field: FieldConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// Particle field settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub connection_distance: f32,
    pub attraction_radius: f32,
    /// Whether meteors are spawned at all.
    pub meteors: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 70,
            connection_distance: 120.0,
            attraction_radius: 150.0,
            meteors: true,
        }
    }
}

/// Foreground text drawn over the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub title: String,
    pub tagline: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: "constella".to_string(),
            tagline: "a drifting constellation".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "constella").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > 240 {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and 240, got {}",
                self.fps
            )));
        }
        if self.field.particle_count > MAX_PARTICLES {
            return Err(ConfigError::Invalid(format!(
                "field.particle_count must be at most {MAX_PARTICLES}, got {}",
                self.field.particle_count
            )));
        }
        let distance = self.field.connection_distance;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "field.connection_distance must be a positive number, got {distance}"
            )));
        }
        let radius = self.field.attraction_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "field.attraction_radius must be a non-negative number, got {radius}"
            )));
        }
        Ok(())
    }

    /// Whether the background should stay still, consulting the environment
    /// when the preference is `auto`.
    pub fn reduced_motion(&self) -> bool {
        let env = std::env::var(REDUCED_MOTION_ENV).ok();
        resolve_reduced_motion(self.motion, env.as_deref())
    }
}

/// Resolve a motion preference against the value of [`REDUCED_MOTION_ENV`].
pub fn resolve_reduced_motion(preference: MotionPreference, env: Option<&str>) -> bool {
    match preference {
        MotionPreference::Full => false,
        MotionPreference::Reduced => true,
        MotionPreference::Auto => env
            .map(|value| {
                let value = value.trim().to_ascii_lowercase();
                !matches!(value.as_str(), "" | "0" | "false" | "no")
            })
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.field.particle_count, 70);
        assert!(config.field.meteors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            theme = "light"

            [field]
            particle_count = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.speed, AnimationSpeed::Medium);
        assert_eq!(config.field.particle_count, 40);
        assert_eq!(config.field.connection_distance, 120.0);
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(matches!(
            Config::from_toml(r#"theme = "sepia""#),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::from_toml("colour = 1"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_fps() {
        assert!(matches!(
            Config::from_toml("fps = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        for doc in [
            "[field]\nattraction_radius = nan",
            "[field]\nattraction_radius = inf",
            "[field]\nconnection_distance = nan",
            "[field]\nconnection_distance = inf",
            "[field]\nconnection_distance = -inf",
        ] {
            assert!(
                matches!(Config::from_toml(doc), Err(ConfigError::Invalid(_))),
                "accepted {doc:?}"
            );
        }
        assert!(Config::from_toml("[field]\nattraction_radius = 0.0").is_ok());
    }

    #[test]
    fn test_particle_count_limit() {
        let at_limit = format!("[field]\nparticle_count = {MAX_PARTICLES}");
        assert!(Config::from_toml(&at_limit).is_ok());

        let over = format!("[field]\nparticle_count = {}", MAX_PARTICLES + 1);
        assert!(matches!(
            Config::from_toml(&over),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[field]\nparticle_count = 100000000"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.speed = AnimationSpeed::Fast;
        config.motion = MotionPreference::Reduced;
        config.overlay.title = "hello".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "fps = \"fast\"").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_reduced_motion() {
        assert!(!resolve_reduced_motion(MotionPreference::Full, Some("1")));
        assert!(resolve_reduced_motion(MotionPreference::Reduced, None));
        assert!(!resolve_reduced_motion(MotionPreference::Auto, None));
        assert!(!resolve_reduced_motion(MotionPreference::Auto, Some("0")));
        assert!(!resolve_reduced_motion(MotionPreference::Auto, Some("False")));
        assert!(resolve_reduced_motion(MotionPreference::Auto, Some("1")));
        assert!(resolve_reduced_motion(MotionPreference::Auto, Some("reduce")));
    }
}
