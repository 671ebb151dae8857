//! Dashboard configuration.
//!
//! Built explicitly at startup from an optional YAML file, then overlaid with
//! environment variables (a `.env` file is honoured), and handed to whatever needs it.

use std::{fs, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    notify::NotificationTemplate,
    radar::{FrameSettings, WmsSource},
    repair::{Band, BandTable, CoveredPolicy},
    zones::ZoneName,
};

/// Weather overlay API key.
pub const ENV_WINDY_API_KEY: &str = "WINDY_API_KEY";
/// Path of the zone GeoJSON dataset.
pub const ENV_ZONES_PATH: &str = "SNOW_ZONES_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub weather: WeatherConfig,
    pub map: MapConfig,
    pub refresh: RefreshConfig,
    pub radar: RadarConfig,
    pub business_areas: BusinessAreas,
    pub notifications: NotificationConfig,
    pub repair: RepairConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub default_overlay: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { api_key: None, default_overlay: "radar".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { center: [49.8951, -97.1384], zoom: 11 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub alerts_secs: u64,
    pub radar_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { alerts_secs: 60, radar_secs: 600 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub source: WmsSource,
    pub frames: usize,
    pub step_minutes: i64,
    pub tick_ms: u64,
    pub opacity: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            source: WmsSource::default(),
            frames: 13,
            step_minutes: 10,
            tick_ms: 500,
            opacity: 0.7,
        }
    }
}

impl RadarConfig {
    pub fn settings(&self) -> FrameSettings {
        FrameSettings {
            count: self.frames,
            step: TimeDelta::minutes(self.step_minutes.max(1)),
            tick: Duration::from_millis(self.tick_ms.max(1)),
            opacity: self.opacity.clamp(0.0, 1.0),
        }
    }
}

/// Allowlist of zones the dashboard monitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessAreas {
    pub enabled: bool,
    pub max_zones: usize,
    pub zones: Vec<String>,
}

impl Default for BusinessAreas {
    fn default() -> Self {
        Self {
            enabled: true,
            max_zones: 20,
            zones: [
                "Downtown",
                "Exchange District",
                "Osborne Village",
                "Corydon",
                "St. Boniface",
                "Polo Park",
                "Headingley North",
                "Headingley South",
            ].map(str::to_string).to_vec(),
        }
    }
}

impl BusinessAreas {
    /// Zones to monitor: empty when disabled, capped at `max_zones`.
    /// Blank entries are skipped.
    pub fn monitored(&self) -> Vec<ZoneName> {
        if !self.enabled {
            return Vec::new();
        }
        let names: Vec<ZoneName> = self.zones.iter()
            .filter_map(|name| ZoneName::new(name).ok())
            .collect();
        if names.len() > self.max_zones {
            warn!(
                "[config] {} business areas configured, monitoring only the first {}",
                names.len(),
                self.max_zones
            );
        }
        names.into_iter().take(self.max_zones).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// The app's own origin, used to find an open window on notification click.
    pub origin: String,
    pub template: NotificationTemplate,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { origin: "http://localhost:3000".to_string(), template: NotificationTemplate::default() }
    }
}

/// Inputs of the zone boundary repairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub zones_path: PathBuf,
    pub targets: Vec<String>,
    pub neighbors: Vec<String>,
    pub bands: Vec<Band>,
    pub on_covered: CoveredPolicy,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            zones_path: PathBuf::from("public/data/snow-zones.geojson"),
            targets: vec!["Headingley North".to_string(), "Headingley South".to_string()],
            neighbors: [
                "Westwood",
                "Crestview",
                "Sturgeon Creek",
                "Heritage Park",
                "Assiniboia Downs",
                "Charleswood",
            ].map(str::to_string).to_vec(),
            bands: BandTable::headingley().bands().to_vec(),
            on_covered: CoveredPolicy::Keep,
        }
    }
}

impl RepairConfig {
    pub fn targets(&self) -> Result<Vec<ZoneName>> {
        ZoneName::parse_all(&self.targets).context("[RepairConfig] invalid target name")
    }

    pub fn neighbors(&self) -> Result<Vec<ZoneName>> {
        ZoneName::parse_all(&self.neighbors).context("[RepairConfig] invalid neighbor name")
    }

    pub fn band_table(&self) -> Result<BandTable> {
        BandTable::new(self.bands.clone())
    }
}

impl DashboardConfig {
    /// Parse configuration from YAML text; missing sections take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse dashboard config")
    }

    /// Load from `path` (if given), then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!("[config] loaded {}", dotenv.display());
        }

        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override settings from environment variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) where F: Fn(&str) -> Option<String> {
        if let Some(key) = lookup(ENV_WINDY_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }
        if let Some(path) = lookup(ENV_ZONES_PATH).filter(|p| !p.trim().is_empty()) {
            self.repair.zones_path = PathBuf::from(path);
        }
    }

    /// YAML rendering of the effective configuration. The API key is never included.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize dashboard config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(DashboardConfig::from_yaml_str("").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = DashboardConfig::from_yaml_str(
            "map:\n  zoom: 13\nradar:\n  tick_ms: 250\n  source:\n    layer: RADAR_1KM_RSNO\n",
        ).unwrap();
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.map.center, MapConfig::default().center);
        assert_eq!(config.radar.settings().tick, Duration::from_millis(250));
        assert_eq!(config.radar.settings().count, 13);
        assert_eq!(config.radar.source.layer, "RADAR_1KM_RSNO");
        assert_eq!(config.radar.source.version, "1.3.0");
    }

    #[test]
    fn env_overrides() {
        let mut config = DashboardConfig::default();
        config.apply_env(|key| match key {
            ENV_WINDY_API_KEY => Some("secret".to_string()),
            ENV_ZONES_PATH => Some("/data/zones.geojson".to_string()),
            _ => None,
        });
        assert_eq!(config.weather.api_key.as_deref(), Some("secret"));
        assert_eq!(config.repair.zones_path, PathBuf::from("/data/zones.geojson"));
        assert!(!config.to_yaml().unwrap().contains("secret"));
    }

    #[test]
    fn monitored_zones_respect_flag_and_limit() {
        let mut areas = BusinessAreas { enabled: true, max_zones: 2, zones: vec![
            "A".to_string(), " ".to_string(), "B".to_string(), "C".to_string(),
        ] };
        let names: Vec<String> = areas.monitored().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["A", "B"]);

        areas.enabled = false;
        assert!(areas.monitored().is_empty());
    }

    #[test]
    fn repair_defaults_are_usable() {
        let repair = RepairConfig::default();
        assert_eq!(repair.targets().unwrap().len(), 2);
        assert_eq!(repair.band_table().unwrap(), BandTable::headingley());
        assert_eq!(repair.on_covered, CoveredPolicy::Keep);
    }

    #[test]
    fn band_table_from_yaml() {
        let config = DashboardConfig::from_yaml_str(
            "repair:\n  on_covered: remove\n  bands:\n    - { below: 49.9, max_lon: -97.3 }\n    - { max_lon: -97.2 }\n",
        ).unwrap();
        let table = config.repair.band_table().unwrap();
        assert_eq!(table.limit(49.0), Some(-97.3));
        assert_eq!(table.limit(60.0), Some(-97.2));
        assert_eq!(config.repair.on_covered, CoveredPolicy::Remove);
    }
}
