use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::{common::{self, GeoJsonError}, zones::{Zone, ZoneName}};

/// An ordered GeoJSON FeatureCollection of zones with a name index.
#[derive(Debug, Clone)]
pub struct ZoneCollection {
    members: Map<String, Value>, // top-level members; "features" is filled in on write
    zones: Vec<Zone>,
    index: HashMap<ZoneName, usize>, // first feature carrying each name
}

impl ZoneCollection {
    /// Build a collection from a parsed GeoJSON document.
    pub fn from_geojson(value: Value) -> Result<Self> {
        let Value::Object(mut members) = value else {
            return Err(GeoJsonError::NotFeatureCollection("a non-object".into()).into());
        };

        let kind = members.get("type").and_then(Value::as_str).unwrap_or("untyped object");
        if kind != "FeatureCollection" {
            return Err(GeoJsonError::NotFeatureCollection(kind.to_string()).into());
        }

        let features = match members.get_mut("features").map(Value::take) {
            Some(Value::Array(features)) => features,
            Some(_) => return Err(GeoJsonError::Malformed("features is not an array".into()).into()),
            None => return Err(GeoJsonError::MissingMember("features").into()),
        };

        let zones = features.into_iter()
            .enumerate()
            .map(|(i, feature)| Zone::from_geojson(feature)
                .with_context(|| format!("[ZoneCollection.from_geojson] feature {i}")))
            .collect::<Result<Vec<_>>>()?;

        let mut collection = Self { members, zones, index: HashMap::new() };
        collection.reindex();
        Ok(collection)
    }

    /// Serialize the collection, preserving top-level and feature member order.
    pub fn to_geojson(&self) -> Value {
        let mut members = self.members.clone();
        members.insert(
            "features".to_string(),
            Value::Array(self.zones.iter().map(Zone::to_geojson).collect()),
        );
        Value::Object(members)
    }

    /// Read a collection from a GeoJSON file.
    pub fn read(path: &Path) -> Result<Self> {
        Self::from_geojson(common::read_json(path)?)
            .with_context(|| format!("Invalid zone collection in {}", path.display()))
    }

    /// Overwrite `path` with this collection, pretty-printed.
    pub fn write(&self, path: &Path) -> Result<()> {
        common::write_json_atomic(path, &self.to_geojson())
    }

    #[inline] pub fn len(&self) -> usize { self.zones.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    #[inline] pub fn zones(&self) -> &[Zone] { &self.zones }

    /// Position of the first zone with this name.
    #[inline] pub fn find(&self, name: &ZoneName) -> Option<usize> { self.index.get(name).copied() }

    #[inline] pub fn get(&self, name: &ZoneName) -> Option<&Zone> { self.find(name).map(|i| &self.zones[i]) }

    #[inline]
    pub fn get_mut(&mut self, name: &ZoneName) -> Option<&mut Zone> {
        self.find(name).map(|i| &mut self.zones[i])
    }

    /// Remove the first zone with this name, keeping the order of the rest.
    pub fn remove(&mut self, name: &ZoneName) -> Option<Zone> {
        let i = self.find(name)?;
        let zone = self.zones.remove(i);
        self.reindex();
        Some(zone)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, zone) in self.zones.iter().enumerate() {
            if let Some(name) = zone.name() {
                self.index.entry(name.clone()).or_insert(i);
            }
        }
    }
}
