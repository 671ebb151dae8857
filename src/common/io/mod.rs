mod geojson;

pub use geojson::ZoneGeometry;

pub(crate) use geojson::{edit_first_exterior, validate_multipolygon};
