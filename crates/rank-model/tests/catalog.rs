//! Catalog decoding and lookup tests.

use std::io::Write;

use rank_model::{RankHierarchy, StationAssignment, load_catalog, resolve_station_references};

const CATALOG: &str = r#"{
    "agencies": [{ "name": "Los Santos Police Department", "short_name": "LSPD", "scripted_name": "lspd" }],
    "stations": [{ "name": "Mission Row", "agency": "lspd", "zones": ["DOWNT"] }],
    "vehicles": [{ "model": "police", "display_name": "Police Cruiser", "category": "Patrol", "agencies": ["lspd"] }],
    "outfits": [{ "name": "LSPD", "variations": [{ "name": "Class A" }, { "name": "Class B" }] }]
}"#;

#[test]
fn loads_catalog_from_file_and_resolves_lookups() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = load_catalog(file.path()).unwrap();

    assert!(catalog.station("mission row").is_some());
    assert!(catalog.vehicle("POLICE").is_some());
    assert!(catalog.has_outfit("LSPD.Class B"));
    assert!(!catalog.has_outfit("LSPD.Class C"));
    let station = catalog.station("Mission Row").unwrap();
    assert_eq!(
        catalog.agency_for_station(station).unwrap().short_name,
        "LSPD"
    );
}

#[test]
fn missing_catalog_file_is_an_io_error() {
    let error = load_catalog(std::path::Path::new("/nonexistent/catalog.json")).unwrap_err();
    assert!(matches!(error, rank_model::ModelError::Io { .. }));
}

#[test]
fn resolving_references_counts_unknown_stations() {
    let catalog = rank_model::DataCatalog::from_json_str(CATALOG).unwrap();
    let mut parent = RankHierarchy::new("Officer", 0, 100);
    let band = parent.add_pay_band();
    parent
        .pay_band_mut(&band)
        .unwrap()
        .stations
        .push(StationAssignment::new("Sandy Shores"));
    let mut standalone = RankHierarchy::new("Sergeant", 500, 200);
    standalone.stations.push(StationAssignment::new("Mission Row"));
    let mut ranks = vec![parent, standalone];

    let unresolved = resolve_station_references(&mut ranks, &catalog);

    assert_eq!(unresolved, 1);
    assert!(ranks[1].stations[0].is_valid());
    assert_eq!(ranks[1].stations[0].display_name(), "Mission Row (LSPD)");
}
