//! Client configuration file.
//!
//! ```toml
//! version = 1
//!
//! [board]
//! show_terrain = true
//!
//! [timing]
//! texture_debounce_ms = 100
//! double_click_ms = 400
//!
//! [session]
//! token = "local"
//! chat_history = 500
//! ```
//!
//! Every field is optional; missing fields take the defaults shown above.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use warboard_rendering::{textures::DEFAULT_DEBOUNCE, SceneOptions};
use warboard_session::{SessionConfig, DEFAULT_CHAT_HISTORY};
use warboard_system_interaction::DEFAULT_DOUBLE_CLICK_WINDOW;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Failure to load the client configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config at {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// The file declares a version this client does not understand.
    #[error("unsupported config version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this client reads.
        expected: u32,
    },
}

/// Board presentation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardSection {
    /// Whether terrain sprites are drawn.
    pub(crate) show_terrain: bool,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self { show_terrain: true }
    }
}

/// Input and texture timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TimingSection {
    /// Quiet period after a sheet load before sprites are redrawn.
    pub(crate) texture_debounce_ms: u64,
    /// Maximum gap between two presses on one tile to count as a double click.
    pub(crate) double_click_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            texture_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            double_click_ms: DEFAULT_DOUBLE_CLICK_WINDOW.as_millis() as u64,
        }
    }
}

/// Game session settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionSection {
    /// Token identifying the game.
    pub(crate) token: String,
    /// Number of chat lines retained.
    pub(crate) chat_history: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            token: "local".to_string(),
            chat_history: DEFAULT_CHAT_HISTORY,
        }
    }
}

/// Complete client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ClientConfig {
    version: u32,
    /// Board presentation settings.
    pub(crate) board: BoardSection,
    /// Input and texture timing.
    pub(crate) timing: TimingSection,
    /// Game session settings.
    pub(crate) session: SessionSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            board: BoardSection::default(),
            timing: TimingSection::default(),
            session: SessionSection::default(),
        }
    }
}

impl ClientConfig {
    /// Parses configuration `contents`.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                expected: SUPPORTED_CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    /// Loads the file at `path`, falling back to defaults when it does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Scene options derived from the board section.
    pub(crate) const fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            show_terrain: self.board.show_terrain,
        }
    }

    /// Sheet-load debounce window.
    pub(crate) const fn texture_debounce(&self) -> Duration {
        Duration::from_millis(self.timing.texture_debounce_ms)
    }

    /// Double-click window.
    pub(crate) const fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.timing.double_click_ms)
    }

    /// Session settings for a new session.
    pub(crate) fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(self.session.token.clone());
        config.scene_options = self.scene_options();
        config.chat_history = self.session.chat_history;
        config
    }
}
