//! Settings Persistence System
//!
//! Provides persistent annotation settings with:
//! - Atomic file writes (temp file + rename)
//! - Tolerant loading with defaults
//! - Migration hook for schema changes
//!
//! Storage location: any JSON file, `vfxnotes.json` by convention.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{annotate::MarkerColor, fs::atomic_write_json_pretty, CoreResult};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Conventional settings file name
pub const SETTINGS_FILE: &str = "vfxnotes.json";

/// Annotation run settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Timeline marker settings
    #[serde(default)]
    pub markers: MarkerSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            markers: MarkerSettings::default(),
        }
    }
}

impl AnnotationSettings {
    /// Normalizes settings so they are always usable.
    ///
    /// Corrects bad values instead of failing.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        let user_tag = self.markers.user_tag.trim();
        self.markers.user_tag = if user_tag.is_empty() {
            default_user_tag()
        } else {
            user_tag.to_string()
        };

        self.markers.color = normalize_enum(
            self.markers.color.trim(),
            MarkerColor::names(),
            default_marker_color(),
        );

        // Anything but "middle" places markers on the clip's leading edge.
        self.markers.position = normalize_enum(
            self.markers.position.trim(),
            &["middle", "start"],
            "start".to_string(),
        );
    }

    /// Returns a normalized copy
    pub fn normalized(&self) -> Self {
        let mut settings = self.clone();
        settings.normalize();
        settings
    }
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

/// Timeline marker settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSettings {
    /// Write one marker per annotated clip
    #[serde(default)]
    pub enabled: bool,

    /// User tag stored on each marker
    #[serde(default = "default_user_tag")]
    pub user_tag: String,

    /// Marker color: "green", "red", "blue", "cyan", "magenta", "yellow", "black", "white"
    #[serde(default = "default_marker_color")]
    pub color: String,

    /// Marker placement: "middle" or "start"
    #[serde(default = "default_marker_position")]
    pub position: String,
}

fn default_user_tag() -> String {
    "vfx".to_string()
}

fn default_marker_color() -> String {
    "green".to_string()
}

fn default_marker_position() -> String {
    "middle".to_string()
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            user_tag: default_user_tag(),
            color: default_marker_color(),
            position: default_marker_position(),
        }
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// Loads and saves settings at a fixed path
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Creates a store for the conventional file name inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, returning defaults if the file is missing or unreadable
    pub fn load(&self) -> AnnotationSettings {
        if !self.settings_path.exists() {
            info!(
                "Settings file {} not found, using defaults",
                self.settings_path.display()
            );
            return AnnotationSettings::default();
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                AnnotationSettings::default()
            }
        }
    }

    /// Load settings from disk, failing if the file is missing or unparsable
    pub fn try_load(&self) -> CoreResult<AnnotationSettings> {
        let content = fs::read_to_string(&self.settings_path)?;
        let mut settings = serde_json::from_str::<AnnotationSettings>(&content)?;

        if settings.version < SETTINGS_VERSION {
            info!(
                "Migrating settings from version {} to {}",
                settings.version, SETTINGS_VERSION
            );
        }

        settings.normalize();
        Ok(settings)
    }

    /// Save settings to disk using atomic write
    pub fn save(&self, settings: &AnnotationSettings) -> CoreResult<AnnotationSettings> {
        let normalized = settings.normalized();
        atomic_write_json_pretty(&self.settings_path, &normalized)?;
        info!("Settings saved to {}", self.settings_path.display());
        Ok(normalized)
    }
}
