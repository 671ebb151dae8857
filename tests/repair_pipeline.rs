use geo::BoundingRect;
use serde_json::{json, Value};
use snowcommand::{
    clip_zones, subtract_wall, BandTable, CoveredPolicy, Outcome, ZoneCollection, ZoneName,
};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!({"type": "Polygon", "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]})
}

fn dataset() -> Value {
    json!({
        "type": "FeatureCollection",
        "name": "snow-zones",
        "features": [
            {"type": "Feature", "id": 7, "properties": {"name": "Headingley North", "priority": "P2", "ward": 3},
             "geometry": rect(-97.40, 49.84, -97.30, 49.86)},
            {"type": "Feature", "properties": {"name": "Westwood", "priority": "P1"},
             "geometry": rect(-97.36, 49.80, -97.20, 49.90)},
            {"type": "Feature", "properties": {"name": "Downtown"}, "geometry": rect(-97.15, 49.88, -97.13, 49.90)}
        ]
    })
}

fn names(list: &[&str]) -> Vec<ZoneName> {
    ZoneName::parse_all(list).unwrap()
}

#[test]
fn clip_then_subtract_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snow-zones.geojson");
    std::fs::write(&path, serde_json::to_string_pretty(&dataset()).unwrap()).unwrap();

    let mut zones = ZoneCollection::read(&path).unwrap();
    let targets = names(&["Headingley North", "Headingley South"]);

    let reports = clip_zones(&mut zones, &targets, &BandTable::headingley()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].modified, 2);
    assert_eq!(reports[0].lon_range, Some((-97.40, -97.335)));

    let report = subtract_wall(
        &mut zones,
        &targets,
        &names(&["Westwood", "Charleswood"]),
        CoveredPolicy::Keep,
    ).unwrap();
    assert_eq!(report.wall_missing, names(&["Charleswood"]));
    assert_eq!(report.outcome(&targets[1]), Some(&Outcome::Missing));
    match report.outcome(&targets[0]) {
        Some(Outcome::Trimmed { parts, area_before, area_after }) => {
            assert_eq!(*parts, 1);
            assert!(area_after < area_before);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    zones.write(&path).unwrap();
    let reread = ZoneCollection::read(&path).unwrap();
    let raw = reread.to_geojson();

    assert_eq!(raw["name"], "snow-zones");
    let order: Vec<&str> = raw["features"].as_array().unwrap().iter()
        .map(|f| f["properties"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["Headingley North", "Westwood", "Downtown"]);

    let north = reread.get(&targets[0]).unwrap();
    assert_eq!(north.properties().unwrap()["ward"], 3);
    assert_eq!(north.properties().unwrap()["priority"], "P2");
    assert_eq!(raw["features"][0]["id"], 7);
    assert_eq!(north.geometry().unwrap().type_name(), "Polygon");

    let bounds = north.geometry().unwrap().to_multipolygon().unwrap().bounding_rect().unwrap();
    assert!((bounds.max().x - -97.36).abs() < 1e-9);
    assert!((bounds.min().x - -97.40).abs() < 1e-9);

    let westwood = reread.get(&ZoneName::new("Westwood").unwrap()).unwrap();
    assert_eq!(westwood.raw_geometry(), &rect(-97.36, 49.80, -97.20, 49.90));
}

#[test]
fn covered_target_with_error_policy_changes_nothing() {
    let mut zones = ZoneCollection::from_geojson(dataset()).unwrap();

    // Downtown lies outside the wall, Headingley North only partly inside it.
    let report = subtract_wall(
        &mut zones,
        &names(&["Downtown", "Headingley North"]),
        &names(&["Westwood"]),
        CoveredPolicy::Error,
    ).unwrap();
    assert!(report.covered().next().is_none());
    assert_eq!(report.outcome(&names(&["Downtown"])[0]), Some(&Outcome::Unchanged));

    let before = zones.to_geojson();
    let result = subtract_wall(
        &mut zones,
        &names(&["Downtown", "Headingley North"]),
        &names(&["Westwood", "Headingley North"]),
        CoveredPolicy::Error,
    );
    assert!(result.is_err());
    assert_eq!(zones.to_geojson(), before);
}

#[test]
fn repair_leaves_untouched_features_byte_for_byte() {
    let westwood = json!({
        "type": "Polygon",
        "bbox": [-97.36, 49.8, -97, 50],
        "coordinates": [[[-97.36, 49.80, 231], [-97, 49.80, 231], [-97, 50, 232.5], [-97.36, 50, 232.5], [-97.36, 49.80, 231]]],
    });
    let doc = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Headingley North"}, "geometry": rect(-97.40, 49.84, -97.30, 49.86)},
            {"type": "Feature", "properties": {"name": "Westwood"}, "geometry": westwood},
            {"type": "Feature", "properties": {"name": "Empty"}, "geometry": {"type": "Polygon", "coordinates": []}},
            {"type": "Feature", "properties": {"name": "Broken"}, "geometry": {"type": "Polygon", "coordinates": [[[-97, "x"]]]}},
        ]
    });
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zones.geojson");
    std::fs::write(&path, doc.to_string()).unwrap();

    let mut zones = ZoneCollection::read(&path).unwrap();
    let targets = names(&["Headingley North"]);
    clip_zones(&mut zones, &targets, &BandTable::headingley()).unwrap();
    subtract_wall(&mut zones, &targets, &names(&["Westwood"]), CoveredPolicy::Keep).unwrap();
    zones.write(&path).unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_ne!(written["features"][0], doc["features"][0]);
    for i in 1..4 {
        assert_eq!(
            serde_json::to_string(&written["features"][i]).unwrap(),
            serde_json::to_string(&doc["features"][i]).unwrap(),
        );
    }
}
