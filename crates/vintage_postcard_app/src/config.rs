// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application configuration stored as RON.

use crate::delivery::DeliveryConfig;
use crate::error::{AppError, Result};
use crate::link::LinkConfig;
use crate::narration::VoiceSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vintage_postcard_sequencer::{RevealSchedule, ScheduleError, DEFAULT_DURATIONS_MS};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "postcard.ron";

/// Reveal timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay before each of the four transitions, in milliseconds
    pub durations_ms: Vec<u64>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            durations_ms: DEFAULT_DURATIONS_MS.to_vec(),
        }
    }
}

impl RevealConfig {
    /// Build the reveal schedule
    pub fn schedule(&self) -> std::result::Result<RevealSchedule, ScheduleError> {
        RevealSchedule::try_from_millis(&self.durations_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Format version
    pub version: Option<String>,
    /// Share link target
    pub link: LinkConfig,
    /// Reveal timing
    pub reveal: RevealConfig,
    /// Narration voice
    pub narration: VoiceSettings,
    /// Email delivery; sending is disabled without it
    pub delivery: Option<DeliveryConfig>,
}

impl AppConfig {
    /// Load configuration from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig =
            ron::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        ron::ser::to_string_pretty(self, config).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_ron()?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.reveal.durations_ms, vec![2000, 1000, 1000, 1000]);
        assert_eq!(config.reveal.schedule().unwrap(), RevealSchedule::default());
        assert_eq!(config.link.base_url(), "http://localhost:5173/");
        assert!(config.delivery.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = AppConfig {
            version: Some("1".to_string()),
            reveal: RevealConfig {
                durations_ms: vec![500, 250, 250, 250],
            },
            delivery: Some(DeliveryConfig {
                service_id: "service_abc".to_string(),
                ..DeliveryConfig::default()
            }),
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.reveal.schedule().unwrap().total(),
            Duration::from_millis(1250)
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig =
            ron::from_str("(link: (origin: \"https://postcards.example\"))").unwrap();
        assert_eq!(config.link.origin, "https://postcards.example");
        assert_eq!(config.link.path, "/");
        assert_eq!(config.narration, VoiceSettings::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(link: 42)").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(AppError::Config(_))));

        let reveal = RevealConfig {
            durations_ms: vec![1000, 1000],
        };
        assert!(reveal.schedule().is_err());
    }
}
