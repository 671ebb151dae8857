use anyhow::Result;
use snowcommand::{clip_zones, DashboardConfig, ZoneCollection};
use tracing::info;

use crate::cli::{Cli, ClipArgs};

pub fn run(_cli: &Cli, settings: &DashboardConfig, args: &ClipArgs) -> Result<()> {
    let path = args.zones.clone().unwrap_or_else(|| settings.repair.zones_path.clone());
    let targets = super::names_or(&args.targets, settings.repair.targets())?;
    let table = settings.repair.band_table()?;

    info!("[clip] loading zones from {}", path.display());
    let mut zones = ZoneCollection::read(&path)?;

    let reports = clip_zones(&mut zones, &targets, &table)?;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    let modified: usize = reports.iter().map(|r| r.modified).sum();
    if args.dry_run {
        info!("[clip] dry run: {modified} vertices would move, {} left untouched", path.display());
        return Ok(());
    }

    info!("[clip] writing {} zones to {}", zones.len(), path.display());
    zones.write(&path)?;

    Ok(())
}
