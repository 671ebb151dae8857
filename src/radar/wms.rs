use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timeline::wms_time;

/// A time-enabled WMS layer, queried with fixed GetMap parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmsSource {
    pub url: String,
    pub layer: String,
    pub format: String,
    pub transparent: bool,
    pub version: String,
    pub crs: String,
}

impl Default for WmsSource {
    fn default() -> Self {
        Self {
            url: "https://geo.weather.gc.ca/geomet".to_string(),
            layer: "RADAR_1KM_RRAI".to_string(),
            format: "image/png".to_string(),
            transparent: true,
            version: "1.3.0".to_string(),
            crs: "EPSG:3857".to_string(),
        }
    }
}

/// Everything a map needs to register one radar frame as a tiled WMS overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySpec {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub time: String,
    pub opacity: f64,
}

impl WmsSource {
    /// Overlay for the frame at `time`, registered invisible.
    pub fn overlay(&self, time: &DateTime<Utc>) -> OverlaySpec {
        let time = wms_time(time);
        OverlaySpec {
            url: self.url.clone(),
            params: self.params(&time),
            time,
            opacity: 0.0,
        }
    }

    /// GetMap URL for the frame at `time`, without the per-tile bbox/size.
    pub fn frame_url(&self, time: &DateTime<Utc>) -> String {
        let mut pairs = vec![
            ("service".to_string(), "WMS".to_string()),
            ("request".to_string(), "GetMap".to_string()),
        ];
        pairs.extend(self.params(&wms_time(time)));

        let query = pairs.iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }

    fn params(&self, time: &str) -> Vec<(String, String)> {
        vec![
            ("layers".to_string(), self.layer.clone()),
            ("format".to_string(), self.format.clone()),
            ("transparent".to_string(), self.transparent.to_string()),
            ("version".to_string(), self.version.clone()),
            ("time".to_string(), time.to_string()),
            ("crs".to_string(), self.crs.clone()),
        ]
    }
}
