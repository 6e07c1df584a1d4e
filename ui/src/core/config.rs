//! Dashboard configuration.
//!
//! Resolved once by the launcher and handed to the views through context. Every field has a
//! default, so an empty JSON object (or no file at all) yields the stock dashboard.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub thresholds: ConfidenceThresholds,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub resources: ResourcePatterns,
    /// Local case database. When unset the embedded demo database is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&raw, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Score cut-offs (on the 0–100 scale) used to derive a group's confidence tier.
///
/// A score strictly above `high` is High, strictly above `medium` is Medium. Below that the
/// tier is Low, unless `very_low` is set and the score is at or under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    #[serde(default = "ConfidenceThresholds::default_high")]
    pub high: f64,
    #[serde(default = "ConfidenceThresholds::default_medium")]
    pub medium: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub very_low: Option<f64>,
}

impl ConfidenceThresholds {
    fn default_high() -> f64 {
        90.0
    }
    fn default_medium() -> f64 {
        75.0
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: Self::default_high(),
            medium: Self::default_medium(),
            very_low: None,
        }
    }
}

/// Geometry constants for the lead views. A vertical scale of 50 units per mV matches the
/// 10 mm grid of the canvas background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_lead_height")]
    pub lead_height: f64,
    #[serde(default = "RenderConfig::default_vertical_scale")]
    pub vertical_scale: f64,
    #[serde(default = "RenderConfig::default_amplitude")]
    pub synthetic_amplitude: f64,
    #[serde(default = "RenderConfig::default_step")]
    pub step: f64,
    #[serde(default = "RenderConfig::default_width")]
    pub default_width: f64,
    #[serde(default = "RenderConfig::default_strip_width")]
    pub strip_width: f64,
    #[serde(default = "RenderConfig::default_strip_amplitude")]
    pub strip_amplitude: f64,
}

impl RenderConfig {
    fn default_lead_height() -> f64 {
        80.0
    }
    fn default_vertical_scale() -> f64 {
        50.0
    }
    fn default_amplitude() -> f64 {
        40.0
    }
    fn default_step() -> f64 {
        2.0
    }
    fn default_width() -> f64 {
        500.0
    }
    fn default_strip_width() -> f64 {
        200.0
    }
    fn default_strip_amplitude() -> f64 {
        20.0
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lead_height: Self::default_lead_height(),
            vertical_scale: Self::default_vertical_scale(),
            synthetic_amplitude: Self::default_amplitude(),
            step: Self::default_step(),
            default_width: Self::default_width(),
            strip_width: Self::default_strip_width(),
            strip_amplitude: Self::default_strip_amplitude(),
        }
    }
}

/// Glob-like key patterns handed to the resolver for each resource family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePatterns {
    #[serde(default = "ResourcePatterns::default_manifest")]
    pub manifest: String,
    #[serde(default = "ResourcePatterns::default_retrieval")]
    pub retrieval: String,
    #[serde(default = "ResourcePatterns::default_details")]
    pub details: String,
}

impl ResourcePatterns {
    fn default_manifest() -> String {
        "manifest*.json".into()
    }
    fn default_retrieval() -> String {
        "retrieval/*.json".into()
    }
    fn default_details() -> String {
        "details/*.json".into()
    }
}

impl Default for ResourcePatterns {
    fn default() -> Self {
        Self {
            manifest: Self::default_manifest(),
            retrieval: Self::default_retrieval(),
            details: Self::default_details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = DashboardConfig::from_json_str("{}", Path::new("config.json")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.thresholds.high, 90.0);
        assert_eq!(cfg.render.step, 2.0);
        assert_eq!(cfg.resources.details, "details/*.json");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let raw = r#"{ "thresholds": { "veryLow": 1.0, "very_low": 6.0 }, "render": { "lead_height": 120 } }"#;
        let cfg = DashboardConfig::from_json_str(raw, Path::new("config.json")).unwrap();
        assert_eq!(cfg.thresholds.very_low, Some(6.0));
        assert_eq!(cfg.thresholds.medium, 75.0);
        assert_eq!(cfg.render.lead_height, 120.0);
        assert_eq!(cfg.render.vertical_scale, 50.0);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("ecgrag-config-does-not-exist.json");
        let cfg = DashboardConfig::load(&path).unwrap();
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = DashboardConfig::from_json_str("{ not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
