mod scheduler;
mod surface;
mod timeline;
mod wms;

#[cfg(feature = "player")]
mod player;

pub use scheduler::{FrameSettings, PlayState, RadarScheduler};
pub use surface::{LayerId, MapSurface, MemorySurface};
pub use timeline::FrameTimeline;
pub use wms::{OverlaySpec, WmsSource};

#[cfg(feature = "player")]
pub use player::RadarPlayer;
