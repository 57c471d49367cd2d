use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{engine::StartBoundary, playback::DEFAULT_VOLUME, render::Viewport, theme::Theme, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub player: PlayerConfig,
    pub theme: Theme,
    pub viewport: Viewport,
}

impl AppConfig {
    /// Loads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Configuration specific to the timing engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Effect to use for every transition; random when unset or unknown.
    pub effect_id: Option<String>,
    /// Style to use for every transition; random when unset or unknown.
    pub style_id: Option<String>,
    pub start_boundary: StartBoundary,
}

/// Configuration for the simulated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub volume: f64,
    /// Interval between position updates, in seconds.
    pub tick_seconds: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            tick_seconds: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.theme, Theme::BlackAndWhite);
        assert_eq!(config.player.tick_seconds, 0.25);
    }

    #[test]
    fn reads_partial_overrides() {
        let raw = r#"{
            "engine": { "effect_id": "train", "start_boundary": "uniform" },
            "theme": "color",
            "viewport": { "width": 1920, "height": 1080 }
        }"#;
        let config = AppConfig::from_json_str(raw).unwrap();

        assert_eq!(config.engine.effect_id.as_deref(), Some("train"));
        assert_eq!(config.engine.style_id, None);
        assert_eq!(config.engine.start_boundary, StartBoundary::Uniform);
        assert_eq!(config.theme, Theme::Color);
        assert_eq!(config.viewport.width, 1920.0);
        assert_eq!(config.player.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::LyricError::Json(_)));
    }
}
