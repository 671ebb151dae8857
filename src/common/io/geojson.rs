use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

use crate::common::GeoJsonError;

/// Parsed view of a zone feature's geometry.
/// Polygonal geometry becomes `geo` types; anything else (including `null`)
/// is carried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    Other(Value),
}

impl ZoneGeometry {
    /// Parse a GeoJSON geometry object.
    pub fn from_geojson(value: &Value) -> Result<Self, GeoJsonError> {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Ok(Self::Other(value.clone()));
        };

        match kind {
            "Polygon" => {
                let coords = coordinates(value)?;
                Ok(Self::Polygon(parse_polygon(coords)?))
            }
            "MultiPolygon" => {
                let coords = coordinates(value)?;
                let polygons = coords.iter()
                    .map(|part| part.as_array()
                        .ok_or_else(|| GeoJsonError::Malformed("polygon part is not an array".into()))
                        .and_then(|rings| parse_polygon(rings)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::MultiPolygon(MultiPolygon(polygons)))
            }
            _ => Ok(Self::Other(value.clone())),
        }
    }

    /// Serialize back into a GeoJSON geometry object.
    pub fn to_geojson(&self) -> Value {
        match self {
            Self::Polygon(polygon) => json!({
                "type": "Polygon",
                "coordinates": polygon_coords(polygon),
            }),
            Self::MultiPolygon(mp) => json!({
                "type": "MultiPolygon",
                "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
            }),
            Self::Other(value) => value.clone(),
        }
    }

    /// GeoJSON type name, or "null" for a missing geometry.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Other(value) => value.get("type").and_then(Value::as_str).unwrap_or("null"),
        }
    }

    /// View polygonal geometry as a MultiPolygon.
    pub fn to_multipolygon(&self) -> Result<MultiPolygon<f64>, GeoJsonError> {
        match self {
            Self::Polygon(polygon) => Ok(MultiPolygon(vec![polygon.clone()])),
            Self::MultiPolygon(mp) => Ok(mp.clone()),
            Self::Other(_) => Err(GeoJsonError::Unsupported(self.type_name().to_string())),
        }
    }

    /// Wrap a MultiPolygon, collapsing single-part results to a plain Polygon.
    pub fn from_multipolygon(mut mp: MultiPolygon<f64>) -> Self {
        if mp.0.len() == 1 {
            Self::Polygon(mp.0.remove(0))
        } else {
            Self::MultiPolygon(mp)
        }
    }
}

/// Run `f` on the first ring of the first polygon part of a raw geometry object,
/// then write back only the positions whose x or y changed. Z values, integer
/// coordinates and every other member of the geometry are left as they were.
/// Returns `false` when there is no ring to edit.
pub(crate) fn edit_first_exterior<F>(geometry: &mut Value, f: F) -> Result<bool, GeoJsonError>
where F: FnOnce(&mut LineString<f64>) {
    let kind = geometry.get("type").and_then(Value::as_str).unwrap_or("null").to_string();
    let ring = match kind.as_str() {
        "Polygon" => coordinates_mut(geometry)?.first_mut(),
        "MultiPolygon" => match coordinates_mut(geometry)?.first_mut() {
            Some(part) => part.as_array_mut()
                .ok_or_else(|| GeoJsonError::Malformed("polygon part is not an array".into()))?
                .first_mut(),
            None => None,
        },
        _ => return Err(GeoJsonError::Unsupported(kind)),
    };
    let Some(ring) = ring else {
        return Ok(false);
    };
    let positions = ring.as_array_mut()
        .ok_or_else(|| GeoJsonError::Malformed("ring is not an array".into()))?;

    let mut line = parse_ring(positions.as_slice())?;
    f(&mut line);

    // parse_ring guarantees every position is an array of at least two numbers
    for (position, coord) in positions.iter_mut().zip(line.coords()) {
        if position[0].as_f64() != Some(coord.x) {
            position[0] = Value::from(coord.x);
        }
        if position[1].as_f64() != Some(coord.y) {
            position[1] = Value::from(coord.y);
        }
    }
    Ok(true)
}

/// Check that every ring is closed, finite and has at least 4 positions.
pub(crate) fn validate_multipolygon(mp: &MultiPolygon<f64>) -> Result<(), GeoJsonError> {
    let rings = mp.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()));

    for (ring, ls) in rings.enumerate() {
        let len = ls.0.len();
        if len < 4 {
            return Err(GeoJsonError::ShortRing { ring, len });
        }
        if ls.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeoJsonError::NonFinite { ring });
        }
        if !ls.is_closed() {
            return Err(GeoJsonError::OpenRing { ring });
        }
    }
    Ok(())
}

fn coordinates_mut(value: &mut Value) -> Result<&mut Vec<Value>, GeoJsonError> {
    value.get_mut("coordinates")
        .ok_or(GeoJsonError::MissingMember("coordinates"))?
        .as_array_mut()
        .ok_or_else(|| GeoJsonError::Malformed("coordinates is not an array".into()))
}

fn coordinates(value: &Value) -> Result<&[Value], GeoJsonError> {
    value.get("coordinates")
        .ok_or(GeoJsonError::MissingMember("coordinates"))?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| GeoJsonError::Malformed("coordinates is not an array".into()))
}

/// Parse polygon rings: [exterior, hole, hole, ...]
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>, GeoJsonError> {
    let mut rings = rings.iter()
        .map(|ring| ring.as_array()
            .ok_or_else(|| GeoJsonError::Malformed("ring is not an array".into()))
            .and_then(|positions| parse_ring(positions)));

    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString(Vec::new()));
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of [lon, lat] positions. Extra dimensions are dropped.
fn parse_ring(positions: &[Value]) -> Result<LineString<f64>, GeoJsonError> {
    positions.iter()
        .map(|position| {
            let pair = position.as_array()
                .filter(|pair| pair.len() >= 2)
                .ok_or_else(|| GeoJsonError::Malformed(format!("bad position {position}")))?;
            match (pair[0].as_f64(), pair[1].as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(GeoJsonError::Malformed(format!("non-numeric position {position}"))),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString)
}

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    if polygon.exterior().0.is_empty() && polygon.interiors().is_empty() {
        return Vec::new();
    }
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}
