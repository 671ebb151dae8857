use thiserror::Error;

/// Structural problems found while reading or operating on zone GeoJSON.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("expected a FeatureCollection, found {0}")]
    NotFeatureCollection(String),

    #[error("missing member '{0}'")]
    MissingMember(&'static str),

    #[error("malformed coordinates: {0}")]
    Malformed(String),

    #[error("ring {ring} has {len} positions, need at least 4")]
    ShortRing { ring: usize, len: usize },

    #[error("ring {ring} is not closed")]
    OpenRing { ring: usize },

    #[error("non-finite coordinate in ring {ring}")]
    NonFinite { ring: usize },

    #[error("unsupported geometry type '{0}', expected Polygon or MultiPolygon")]
    Unsupported(String),
}
