//! Dispatcher settings with XDG Base Directory compliance.
//!
//! This module provides the serializable `DispatcherSettings` and a
//! `SettingsManager` that loads and saves them as JSON.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::PathBuf,
};

use {
    parking_lot::{RwLock, RwLockReadGuard},
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
}

/// Severity used when reporting errors through `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level (default).
    #[default]
    Warn,
    /// Error level.
    Error,
}

/// What a dismissed alert does to its chain.
///
/// An alert is dismissed when the surface calls `PresentedAlert::dismiss`,
/// or drops the alert without pressing a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissBehavior {
    /// Run the cancel button's callback, if any, then continue the chain.
    #[default]
    InvokeCancel,
    /// Continue the chain without running any button callback.
    Continue,
    /// Abandon the chain.
    Stall,
}

/// Which matching rules fire for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every matching rule fires, in registration order (default).
    #[default]
    CollectAll,
    /// Only the first matching rule fires.
    FirstMatch,
}

/// Serializable dispatcher settings with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherSettings {
    /// Which matching rules fire.
    pub match_mode: MatchMode,
    /// Whether errors that resolve to no action are reported.
    pub report_unhandled: bool,
    /// Level at which unhandled errors are reported.
    pub unhandled_level: ReportLevel,
    /// Behavior of alerts dismissed without a button press.
    pub dismiss_behavior: DismissBehavior,
    /// Whether a warning is logged when a completion is dropped unfired.
    pub warn_on_dropped_completion: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::CollectAll,
            report_unhandled: true,
            unhandled_level: ReportLevel::Warn,
            dismiss_behavior: DismissBehavior::InvokeCancel,
            warn_on_dropped_completion: true,
        }
    }
}

/// Handles loading and saving of dispatcher settings.
#[derive(Debug)]
pub struct SettingsManager {
    /// Thread-safe settings storage.
    settings: RwLock<DispatcherSettings>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl SettingsManager {
    /// Creates a new settings manager with the default config path.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk.
    pub fn new() -> Result<Self, SettingsError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a new settings manager with a custom config path.
    ///
    /// A missing file yields default settings; the file is only written
    /// by [`SettingsManager::update_settings`].
    ///
    /// # Arguments
    ///
    /// * `config_path` - Custom path for the settings file
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file exists but cannot be read or parsed.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, SettingsError> {
        let settings = if config_path.exists() {
            debug!("Loading dispatcher settings from {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            from_str(&contents)?
        } else {
            debug!("No settings file at {:?}, using defaults", config_path);
            DispatcherSettings::default()
        };

        Ok(SettingsManager {
            settings: RwLock::new(settings),
            config_path,
        })
    }

    /// Gets the current settings.
    pub fn get_settings(&self) -> RwLockReadGuard<'_, DispatcherSettings> {
        self.settings.read()
    }

    /// Gets the configuration file path.
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Updates the settings and saves them to disk.
    ///
    /// # Arguments
    ///
    /// * `new_settings` - New settings to apply.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn update_settings(&self, new_settings: DispatcherSettings) -> Result<(), SettingsError> {
        let mut settings_write = self.settings.write();
        *settings_write = new_settings;
        drop(settings_write);
        self.save_settings()
    }

    fn save_settings(&self) -> Result<(), SettingsError> {
        debug!("Saving dispatcher settings to {:?}", self.config_path);
        if let Some(parent) = self.config_path.parent() {
            create_dir_all(parent)?;
        }
        let contents = to_string_pretty(&*self.settings.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Ensures proper XDG directory usage for the settings file.
///
/// # Returns
///
/// The path to the configuration file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("errdispatch");
    config_dir.push("dispatcher.json");
    config_dir
}

/// Gets the XDG config home directory.
///
/// Uses `XDG_CONFIG_HOME` if set, otherwise defaults to $HOME/.config
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    PathBuf::from(".")
}
