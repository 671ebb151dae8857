#![doc = "Snow Command public API"]
mod common;
mod config;
mod notify;
mod panels;
mod radar;
mod repair;
mod zones;

#[doc(inline)]
pub use common::{GeoJsonError, ZoneGeometry};

#[doc(inline)]
pub use config::{
    BusinessAreas, DashboardConfig, MapConfig, NotificationConfig, RadarConfig, RefreshConfig,
    RepairConfig, WeatherConfig,
};

#[doc(inline)]
pub use notify::{
    ClickEvent, Effect, Notification, NotificationTemplate, PushPayload, ServiceWorker,
    WindowClient, WorkerEvent, WorkerState,
};

#[doc(inline)]
pub use panels::{PanelKind, PanelView, Side, SlidePanel};

#[doc(inline)]
pub use radar::{
    FrameSettings, FrameTimeline, LayerId, MapSurface, MemorySurface, OverlaySpec, PlayState,
    RadarScheduler, WmsSource,
};

#[cfg(feature = "player")]
#[doc(inline)]
pub use radar::RadarPlayer;

#[doc(inline)]
pub use repair::{
    Band, BandTable, ClipReport, CoveredPolicy, Outcome, SubtractReport, Wall, build_wall,
    clip_ring, clip_zone, clip_zones, subtract_wall,
};

#[doc(inline)]
pub use zones::{Zone, ZoneCollection, ZoneName, ZoneNameError};
