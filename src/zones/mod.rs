mod collection;
mod name;
mod zone;

pub use collection::ZoneCollection;
pub use name::{ZoneName, ZoneNameError};
pub use zone::Zone;
