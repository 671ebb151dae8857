use anyhow::Result;
use snowcommand::DashboardConfig;
use tracing::info;

use crate::cli::Cli;

pub fn run(_cli: &Cli, settings: &DashboardConfig) -> Result<()> {
    let monitored = settings.business_areas.monitored();
    info!(
        "[config] weather api key {}, {} monitored zones",
        if settings.weather.api_key.is_some() { "set" } else { "missing" },
        monitored.len()
    );
    print!("{}", settings.to_yaml()?);
    Ok(())
}
