use anyhow::Result;
use snowcommand::{subtract_wall, CoveredPolicy, DashboardConfig, ZoneCollection};
use tracing::{info, warn};

use crate::cli::{Cli, OnCovered, SubtractArgs};

pub fn run(_cli: &Cli, settings: &DashboardConfig, args: &SubtractArgs) -> Result<()> {
    let path = args.zones.clone().unwrap_or_else(|| settings.repair.zones_path.clone());
    let targets = super::names_or(&args.targets, settings.repair.targets())?;
    let neighbors = super::names_or(&args.neighbors, settings.repair.neighbors())?;
    let policy = match args.on_covered {
        Some(OnCovered::Keep) => CoveredPolicy::Keep,
        Some(OnCovered::Remove) => CoveredPolicy::Remove,
        Some(OnCovered::Error) => CoveredPolicy::Error,
        None => settings.repair.on_covered,
    };

    info!("[subtract] loading zones from {}", path.display());
    let mut zones = ZoneCollection::read(&path)?;

    // Any geometry failure returns here, before the file is touched.
    let report = subtract_wall(&mut zones, &targets, &neighbors, policy)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    for name in report.covered() {
        warn!("[subtract] '{name}' lies inside the wall and was left as-is");
    }

    if args.dry_run {
        info!("[subtract] dry run, {} left untouched", path.display());
        return Ok(());
    }

    info!("[subtract] writing {} zones to {}", zones.len(), path.display());
    zones.write(&path)?;

    Ok(())
}
