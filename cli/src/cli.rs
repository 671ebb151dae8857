use std::path::PathBuf;

/// Snow Command maintenance CLI
#[derive(clap::Parser, Debug)]
#[command(name = "snowcommand", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Dashboard config file (YAML); defaults apply when omitted
    #[arg(short, long, global = true, env = "SNOW_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Clamp the target zones' outer ring to the latitude band table
    Clip(ClipArgs),

    /// Cut the target zones back by the union of their neighbors
    Subtract(SubtractArgs),

    /// Print the radar frame times and GetMap URLs
    Frames(FramesArgs),

    /// Print the effective configuration
    Config,
}

#[derive(clap::Args, Debug)]
pub struct ClipArgs {
    /// Zone GeoJSON file, rewritten in place (defaults to the configured dataset)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub zones: Option<PathBuf>,

    /// Zone to clip (repeatable); defaults to the configured targets
    #[arg(short, long = "target")]
    pub targets: Vec<String>,

    /// Report without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum OnCovered { Keep, Remove, Error }

#[derive(clap::Args, Debug)]
pub struct SubtractArgs {
    /// Zone GeoJSON file, rewritten in place (defaults to the configured dataset)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub zones: Option<PathBuf>,

    /// Zone to cut back (repeatable); defaults to the configured targets
    #[arg(short, long = "target")]
    pub targets: Vec<String>,

    /// Neighbor forming the wall (repeatable); defaults to the configured neighbors
    #[arg(short, long = "neighbor")]
    pub neighbors: Vec<String>,

    /// What to do with a target the wall covers completely
    #[arg(long, value_enum)]
    pub on_covered: Option<OnCovered>,

    /// Report without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct FramesArgs {
    /// Reference time (RFC 3339), defaults to now
    #[arg(long)]
    pub at: Option<String>,
}
