use std::fmt;

use anyhow::{ensure, Context, Result};
use geo::LineString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    common::{edit_first_exterior, GeoJsonError},
    zones::{ZoneCollection, ZoneName},
};

fn unbounded() -> f64 { f64::INFINITY }

/// One latitude band: vertices with latitude below `below` (and not claimed by an
/// earlier band) may not extend east of `max_lon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default = "unbounded")]
    pub below: f64,
    pub max_lon: f64,
}

/// Step function from latitude to maximum longitude, evaluated top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    /// Build a table; band thresholds must be strictly increasing.
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        ensure!(!bands.is_empty(), "[BandTable.new] at least one band is required");
        ensure!(
            bands.windows(2).all(|w| w[0].below < w[1].below),
            "[BandTable.new] band thresholds must be strictly increasing"
        );
        ensure!(
            bands.iter().all(|b| b.max_lon.is_finite()),
            "[BandTable.new] longitude limits must be finite"
        );
        Ok(Self { bands })
    }

    /// Five bands along the Headingley / Westwood edge.
    pub fn headingley() -> Self {
        Self {
            bands: vec![
                Band { below: 49.806, max_lon: -97.360 },
                Band { below: 49.838, max_lon: -97.349 },
                Band { below: 49.870, max_lon: -97.335 },
                Band { below: 49.900, max_lon: -97.320 },
                Band { below: f64::INFINITY, max_lon: -97.310 },
            ],
        }
    }

    #[inline] pub fn bands(&self) -> &[Band] { &self.bands }

    /// Longitude ceiling for a latitude; `None` above the last band (or for NaN).
    #[inline]
    pub fn limit(&self, lat: f64) -> Option<f64> {
        self.bands.iter().find(|band| lat < band.below).map(|band| band.max_lon)
    }
}

impl Default for BandTable {
    fn default() -> Self { Self::headingley() }
}

/// Result of clipping one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipReport {
    pub zone: ZoneName,
    pub vertices: usize,
    pub modified: usize,
    pub lon_range: Option<(f64, f64)>,
}

impl fmt::Display for ClipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{} vertices clamped", self.zone, self.modified, self.vertices)?;
        if let Some((min, max)) = self.lon_range {
            write!(f, ", lon {min:.6} .. {max:.6}")?;
        }
        Ok(())
    }
}

/// Clamp every vertex east of its band's limit back onto the limit.
/// Latitude is untouched; the closing vertex is treated like any other, so a
/// closed ring stays closed. Returns the number of vertices moved.
pub fn clip_ring(ring: &mut LineString<f64>, table: &BandTable) -> usize {
    let mut modified = 0;
    for coord in ring.0.iter_mut() {
        if let Some(max_lon) = table.limit(coord.y) {
            if coord.x > max_lon {
                coord.x = max_lon;
                modified += 1;
            }
        }
    }
    modified
}

/// Clip the outer ring of a zone's first polygon part in place.
/// Holes, further parts and unmoved positions are left byte-for-byte alone.
/// Returns `None` when the zone is missing.
pub fn clip_zone(zones: &mut ZoneCollection, name: &ZoneName, table: &BandTable) -> Result<Option<ClipReport>> {
    let Some(zone) = zones.get_mut(name) else {
        warn!("[clip] zone '{name}' not found, skipping");
        return Ok(None);
    };

    let mut vertices = 0;
    let mut modified = 0;
    let mut lon_range = None;
    let geometry = zone.raw_geometry_mut()
        .ok_or_else(|| GeoJsonError::Unsupported("null".into()))
        .with_context(|| format!("[clip] zone '{name}'"))?;
    edit_first_exterior(geometry, |ring| {
        vertices = ring.0.len();
        modified = clip_ring(ring, table);
        lon_range = ring.0.iter().map(|c| c.x).fold(None, |acc: Option<(f64, f64)>, x| match acc {
            Some((min, max)) => Some((min.min(x), max.max(x))),
            None => Some((x, x)),
        });
    })
    .with_context(|| format!("[clip] zone '{name}'"))?;

    let report = ClipReport { zone: name.clone(), vertices, modified, lon_range };
    info!("[clip] {report}");
    Ok(Some(report))
}

/// Clip each named zone; missing zones are logged and skipped.
pub fn clip_zones(zones: &mut ZoneCollection, names: &[ZoneName], table: &BandTable) -> Result<Vec<ClipReport>> {
    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        if let Some(report) = clip_zone(zones, name, table)? {
            reports.push(report);
        }
    }
    Ok(reports)
}
