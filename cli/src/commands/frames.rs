use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use snowcommand::{DashboardConfig, FrameTimeline};

use crate::cli::{Cli, FramesArgs};

pub fn run(_cli: &Cli, settings: &DashboardConfig, args: &FramesArgs) -> Result<()> {
    let now = match &args.at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("[frames] invalid time '{at}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let frame = settings.radar.settings();
    let timeline = FrameTimeline::ending_at(now, frame.count, frame.step);
    for time in timeline.times() {
        println!("{}\t{}", time.to_rfc3339(), settings.radar.source.frame_url(time));
    }

    Ok(())
}
