mod error;
mod fs;
mod io;

pub use error::GeoJsonError;
pub use io::ZoneGeometry;

pub(crate) use fs::*;
pub(crate) use io::*;
