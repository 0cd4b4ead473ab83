//! User settings loaded from TOML
//!
//! Every field has a default, so a missing or empty file yields a working
//! configuration. The settings are read once at startup and handed to the
//! controller by reference on every event.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::registry::ExclusionRules;
use crate::domain::snap::SnapSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

fn yes() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub snap: SnapSection,
    #[serde(default)]
    pub min_window: MinWindowSection,
    /// Absent means no monitor is split
    #[serde(default)]
    pub split: Option<SplitSection>,
    #[serde(default)]
    pub feedback: FeedbackSection,
    #[serde(default)]
    pub exclusions: ExclusionSection,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SnapSection {
    #[serde(default = "yes")]
    pub enabled: bool,
    /// Maximum gap in pixels that still snaps
    #[serde(default = "default_threshold")]
    pub threshold: i32,
}

impl Default for SnapSection {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
        }
    }
}

impl SnapSection {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.threshold < 0 {
            issues.push(format!("snap.threshold must be non-negative, got {}", self.threshold));
        }
        issues
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MinWindowSection {
    #[serde(default = "default_min_width")]
    pub width: i32,
    #[serde(default = "default_min_height")]
    pub height: i32,
}

impl Default for MinWindowSection {
    fn default() -> Self {
        Self {
            width: default_min_width(),
            height: default_min_height(),
        }
    }
}

impl MinWindowSection {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.width <= 0 {
            issues.push(format!("min_window.width must be positive, got {}", self.width));
        }
        if self.height <= 0 {
            issues.push(format!("min_window.height must be positive, got {}", self.height));
        }
        issues
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SplitSection {
    #[serde(default = "yes")]
    pub enabled: bool,
    /// Index of the physical monitor in enumeration order
    pub monitor: u32,
    /// Fraction of the width given to the left piece, strictly inside (0, 1)
    pub ratio: f64,
}

impl SplitSection {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            issues.push(format!("split.ratio must lie strictly between 0 and 1, got {}", self.ratio));
        }
        issues
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeedbackSection {
    /// Shown when an edge snaps; empty disables the message
    #[serde(default = "default_snapped_message")]
    pub snapped_message: String,
    #[serde(default = "default_message_duration_ms")]
    pub message_duration_ms: u64,
    /// TTF/OTF file used for message text; no text is drawn without one
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl Default for FeedbackSection {
    fn default() -> Self {
        Self {
            snapped_message: default_snapped_message(),
            message_duration_ms: default_message_duration_ms(),
            font: None,
        }
    }
}

impl FeedbackSection {
    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    /// The snapped message, `None` when disabled
    pub fn snapped_message(&self) -> Option<&str> {
        let text = self.snapped_message.trim();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExclusionSection {
    #[serde(default = "default_excluded_classes")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub processes: Vec<String>,
    #[serde(default = "default_exclusion_min_size")]
    pub min_width: i32,
    #[serde(default = "default_exclusion_min_size")]
    pub min_height: i32,
}

impl Default for ExclusionSection {
    fn default() -> Self {
        Self {
            classes: default_excluded_classes(),
            processes: Vec::new(),
            min_width: default_exclusion_min_size(),
            min_height: default_exclusion_min_size(),
        }
    }
}

fn default_threshold() -> i32 { SnapSettings::DEFAULT_THRESHOLD }

fn default_min_width() -> i32 { SnapSettings::DEFAULT_MIN_WIDTH }

fn default_min_height() -> i32 { SnapSettings::DEFAULT_MIN_HEIGHT }

fn default_snapped_message() -> String { "Snapped".to_string() }

fn default_message_duration_ms() -> u64 { 700 }

fn default_exclusion_min_size() -> i32 { ExclusionRules::DEFAULT_MIN_SIZE }

fn default_excluded_classes() -> Vec<String> {
    ExclusionRules::DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect()
}

impl Settings {
    /// `<config dir>/tactile-snap/config.toml`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tactile-snap").join("config.toml"))
    }

    pub fn from_toml_str(buf: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(buf)?;
        let issues = settings.validate();
        if !issues.is_empty() {
            return Err(ConfigError::Invalid(issues));
        }
        Ok(settings)
    }

    /// Reads settings from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(buf) => {
                let settings = Self::from_toml_str(&buf)?;
                info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Lists every problem found; empty means valid
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.snap.validate());
        issues.extend(self.min_window.validate());
        if let Some(split) = &self.split {
            issues.extend(split.validate());
        }
        issues
    }

    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            enabled: self.snap.enabled,
            threshold: self.snap.threshold,
            min_width: self.min_window.width,
            min_height: self.min_window.height,
        }
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules {
            excluded_classes: self.exclusions.classes.clone(),
            excluded_processes: self.exclusions.processes.clone(),
            min_width: self.exclusions.min_width,
            min_height: self.exclusions.min_height,
        }
    }
}
