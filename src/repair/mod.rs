mod clip;
mod subtract;

pub use clip::{Band, BandTable, ClipReport, clip_ring, clip_zone, clip_zones};
pub use subtract::{CoveredPolicy, Outcome, SubtractReport, Wall, build_wall, subtract_wall};
