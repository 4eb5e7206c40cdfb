use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `REVEAL__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    ///
    /// `cli_path` is the positional argument, if any.
    pub fn load(cli_path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path(cli_path))
    }

    /// Load settings using `config_path` as the (optional) file source.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("REVEAL")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let mut settings: Settings = cfg.try_deserialize()?;

        if settings.album.media_dir.is_none() {
            settings.album.media_dir = config_path
                .as_deref()
                .and_then(|p| p.parent())
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf());
        }
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.countdown_tick_ms == 0 {
            return Err("ui.countdown_tick_ms must be >= 1".to_string());
        }
        if self.controls.scrub_seconds == 0 {
            return Err("controls.scrub_seconds must be >= 1".to_string());
        }
        Ok(())
    }

    /// Directory that track file identifiers resolve against.
    pub fn media_dir(&self) -> PathBuf {
        self.album
            .media_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve the config path from `REVEAL_CONFIG_PATH`, then `cli_path`, then
/// XDG defaults.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = env::var_os("REVEAL_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    cli_path.or_else(default_config_path)
}

/// Compute the default config path under `$XDG_CONFIG_HOME/reveal/config.toml`
/// or `~/.config/reveal/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("reveal").join("config.toml"))
}

/// Directory for runtime state (gate flag, log file):
/// `$XDG_STATE_HOME/reveal` or `~/.local/state/reveal`.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("reveal"))
}
