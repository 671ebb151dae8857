use serde_json::{Map, Value};

use crate::{common::{GeoJsonError, ZoneGeometry}, zones::ZoneName};

static NULL: Value = Value::Null;

/// One feature of the zone collection.
/// The feature object is kept whole, so `properties`, `id`, `geometry` and any other
/// members are written back exactly as they were read. Geometry is parsed on demand
/// and only rewritten by [`Zone::set_geometry`] or an in-place clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    name: Option<ZoneName>,
    feature: Map<String, Value>,
}

impl Zone {
    /// Wrap a GeoJSON Feature object. The geometry is not inspected here.
    pub fn from_geojson(value: Value) -> Result<Self, GeoJsonError> {
        let Value::Object(feature) = value else {
            return Err(GeoJsonError::Malformed("feature is not an object".into()));
        };

        let name = feature.get("properties")
            .and_then(|props| props.get("name"))
            .and_then(Value::as_str)
            .and_then(|name| ZoneName::new(name).ok());

        Ok(Self { name, feature })
    }

    /// Serialize back into a GeoJSON Feature, member order preserved.
    pub fn to_geojson(&self) -> Value {
        Value::Object(self.feature.clone())
    }

    #[inline] pub fn name(&self) -> Option<&ZoneName> { self.name.as_ref() }

    /// The `geometry` member as read (or last set); `null` when absent.
    #[inline]
    pub fn raw_geometry(&self) -> &Value {
        self.feature.get("geometry").unwrap_or(&NULL)
    }

    /// Parse the geometry.
    pub fn geometry(&self) -> Result<ZoneGeometry, GeoJsonError> {
        ZoneGeometry::from_geojson(self.raw_geometry())
    }

    #[inline] pub(crate) fn raw_geometry_mut(&mut self) -> Option<&mut Value> { self.feature.get_mut("geometry") }

    /// The feature's `properties` member, if present.
    #[inline]
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.feature.get("properties").and_then(Value::as_object)
    }

    /// Replace the geometry. A stale `bbox` member no longer describes it and is dropped.
    pub fn set_geometry(&mut self, geometry: ZoneGeometry) {
        self.feature.shift_remove("bbox");
        self.feature.insert("geometry".to_string(), geometry.to_geojson());
    }
}
