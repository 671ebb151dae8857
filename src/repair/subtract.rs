use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use geo::{Area, BooleanOps, GeodesicArea, Intersects, MultiPolygon};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    common::{validate_multipolygon, ZoneGeometry},
    zones::{ZoneCollection, ZoneName},
};

/// What to do with a target that the wall covers completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveredPolicy {
    /// Leave the original geometry in place and flag it in the report.
    #[default]
    Keep,
    /// Delete the feature from the collection.
    Remove,
    /// Abort the whole repair.
    Error,
}

/// Union of the neighbor zones that targets are cut back against.
#[derive(Debug, Clone)]
pub struct Wall {
    pub geometry: MultiPolygon<f64>,
    pub members: Vec<ZoneName>,
    pub missing: Vec<ZoneName>, // neighbor names with no matching zone
}

impl Wall {
    #[inline] pub fn is_empty(&self) -> bool { self.geometry.0.is_empty() }
}

/// Per-target result of a subtraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Geometry replaced by target minus wall. Areas are geodesic, in square metres.
    Trimmed { parts: usize, area_before: f64, area_after: f64 },
    /// Target lies entirely inside the wall and was kept as-is.
    Covered,
    /// Target lies entirely inside the wall and was deleted.
    Removed,
    /// Wall is empty or does not touch the target; geometry left as read.
    Unchanged,
    /// No zone with this name.
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubtractReport {
    pub wall_members: Vec<ZoneName>,
    pub wall_missing: Vec<ZoneName>,
    pub outcomes: Vec<(ZoneName, Outcome)>,
}

impl SubtractReport {
    /// Outcome for a target, if it was processed.
    pub fn outcome(&self, name: &ZoneName) -> Option<&Outcome> {
        self.outcomes.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    /// Targets left untouched because the wall covers them.
    pub fn covered(&self) -> impl Iterator<Item = &ZoneName> {
        self.outcomes.iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Covered))
            .map(|(name, _)| name)
    }
}

enum Change {
    Replace(ZoneName, ZoneGeometry),
    Remove(ZoneName),
}

/// Union the named neighbors into a single wall, folding pairwise.
/// Unknown names are left out of the wall and listed in `missing`.
pub fn build_wall(zones: &ZoneCollection, neighbors: &[ZoneName]) -> Result<Wall> {
    let mut members = Vec::new();
    let mut missing = Vec::new();
    let mut parts = Vec::new();

    for name in neighbors {
        let Some(zone) = zones.get(name) else {
            debug!("[subtract] neighbor '{name}' not found, excluded from wall");
            missing.push(name.clone());
            continue;
        };
        let mp = zone.geometry()
            .and_then(|geometry| geometry.to_multipolygon())
            .and_then(|mp| validate_multipolygon(&mp).map(|_| mp))
            .with_context(|| format!("[build_wall] neighbor '{name}'"))?;
        parts.push(mp);
        members.push(name.clone());
    }

    let geometry = parts.into_iter()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon(Vec::new()));

    Ok(Wall { geometry, members, missing })
}

/// Cut each target back to `target - union(neighbors)`, keeping its properties.
/// Every difference is computed before the collection is touched, so an error
/// leaves `zones` exactly as it was.
pub fn subtract_wall(
    zones: &mut ZoneCollection,
    targets: &[ZoneName],
    neighbors: &[ZoneName],
    policy: CoveredPolicy,
) -> Result<SubtractReport> {
    let wall = build_wall(zones, neighbors)?;
    info!(
        "[subtract] wall built from {} neighbors ({} not found)",
        wall.members.len(),
        wall.missing.len()
    );

    let mut outcomes = Vec::with_capacity(targets.len());
    let mut changes = Vec::new();
    let mut seen = HashSet::new();

    for name in targets {
        if !seen.insert(name) {
            continue;
        }
        let Some(zone) = zones.get(name) else {
            warn!("[subtract] zone '{name}' not found, skipping");
            outcomes.push((name.clone(), Outcome::Missing));
            continue;
        };
        if wall.is_empty() {
            outcomes.push((name.clone(), Outcome::Unchanged));
            continue;
        }

        let target = zone.geometry()
            .and_then(|geometry| geometry.to_multipolygon())
            .and_then(|mp| validate_multipolygon(&mp).map(|_| mp))
            .with_context(|| format!("[subtract_wall] target '{name}'"))?;
        if !target.intersects(&wall.geometry) {
            debug!("[subtract] zone '{name}' does not touch the wall");
            outcomes.push((name.clone(), Outcome::Unchanged));
            continue;
        }
        let diff = target.difference(&wall.geometry);

        let outcome = if diff.0.is_empty() || diff.unsigned_area() == 0.0 {
            match policy {
                CoveredPolicy::Keep => {
                    warn!("[subtract] zone '{name}' is fully covered by the wall, leaving it unchanged");
                    Outcome::Covered
                }
                CoveredPolicy::Remove => {
                    warn!("[subtract] zone '{name}' is fully covered by the wall, removing it");
                    changes.push(Change::Remove(name.clone()));
                    Outcome::Removed
                }
                CoveredPolicy::Error => bail!("[subtract_wall] zone '{name}' is fully covered by the wall"),
            }
        } else {
            let outcome = Outcome::Trimmed {
                parts: diff.0.len(),
                area_before: target.geodesic_area_unsigned(),
                area_after: diff.geodesic_area_unsigned(),
            };
            changes.push(Change::Replace(name.clone(), ZoneGeometry::from_multipolygon(diff)));
            outcome
        };
        info!("[subtract] {name}: {outcome:?}");
        outcomes.push((name.clone(), outcome));
    }

    for change in changes {
        match change {
            Change::Replace(name, geometry) => {
                if let Some(zone) = zones.get_mut(&name) {
                    zone.set_geometry(geometry);
                }
            }
            Change::Remove(name) => {
                zones.remove(&name);
            }
        }
    }

    Ok(SubtractReport { wall_members: wall.members, wall_missing: wall.missing, outcomes })
}
