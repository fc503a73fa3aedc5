use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::binner::DEFAULT_RADIUS;
use crate::engine::bucket::ThresholdTable;
use crate::engine::filter::Facet;
use crate::error::EngineError;

/// Per-view engine configuration.
///
/// Stored as a plain JSON object on disk; every field is optional:
/// ```json
/// {
///   "thresholds": [
///     { "boundary": 8, "tier": "good" },
///     { "boundary": 6, "tier": "caution" },
///     { "boundary": 0, "tier": "risk" }
///   ],
///   "facets": ["severity", "transport_mode"],
///   "heatmap_radius": 40
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: ThresholdTable,
    /// Facets users of this view may filter on.
    pub facets: Vec<Facet>,
    pub heatmap_radius: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            facets: Facet::all().to_vec(),
            heatmap_radius: DEFAULT_RADIUS,
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        debug!(path, facets = config.facets.len(), "Engine config loaded");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if !config.heatmap_radius.is_finite() || config.heatmap_radius < 0.0 {
            return Err(EngineError::InvalidRadius(config.heatmap_radius).into());
        }
        Ok(config)
    }

    /// Loads from `path` when given, otherwise falls back to the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
