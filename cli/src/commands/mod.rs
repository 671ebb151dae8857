pub mod clip;
pub mod config;
pub mod frames;
pub mod subtract;

use snowcommand::ZoneName;

/// CLI names if given, otherwise the configured ones.
pub(crate) fn names_or(given: &[String], configured: anyhow::Result<Vec<ZoneName>>) -> anyhow::Result<Vec<ZoneName>> {
    if given.is_empty() {
        configured
    } else {
        Ok(ZoneName::parse_all(given)?)
    }
}
