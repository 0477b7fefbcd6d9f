//! Ranks.xml round trips and regrouping.

use rank_model::{RankHierarchy, StationAssignment, Vehicle};
use rank_xml::{
    XmlError, generate_ranks_xml, parse_ranks_xml, read_ranks_file, write_ranks_file,
};

fn sample_ranks() -> Vec<RankHierarchy> {
    let mut recruit = RankHierarchy::new("Recruit", 0, 100);
    let mut mission_row =
        StationAssignment::new("Mission Row").with_zones(["DOWNT", "TEXTI", "PBOX"]);
    mission_row
        .vehicles
        .push(Vehicle::new("police", "Police Cruiser"));
    mission_row.outfits.push("LSPD.Class A".to_string());
    recruit.stations.push(mission_row);
    recruit
        .stations
        .push(StationAssignment::new("Vespucci").with_style(2));
    recruit.vehicles.push(Vehicle::new("police2", "Police Buffalo"));
    recruit.outfits.push("LSPD.Class B".to_string());

    let mut officer = RankHierarchy::new("Officer", 1000, 5000);
    let first = officer.add_pay_band();
    let second = officer.add_pay_band();
    let band = officer.pay_band_mut(&second).unwrap();
    band.required_points = 1500;
    band.salary = 5500;
    officer
        .pay_band_mut(&first)
        .unwrap()
        .vehicles
        .push(Vehicle::new("police3", "Police Interceptor"));

    vec![recruit, officer, RankHierarchy::new("Sergeant", 3000, 8000)]
}

/// Everything that survives serialization, ids excluded.
fn shape(rank: &RankHierarchy) -> String {
    let stations: Vec<String> = rank
        .stations
        .iter()
        .map(|station| {
            format!(
                "{}/{}/{:?}/{:?}/{:?}",
                station.station_name,
                station.style_id,
                station.zones,
                vehicle_shape(&station.vehicles),
                station.outfits
            )
        })
        .collect();
    format!(
        "{}|{}|{}|{:?}|{:?}|{:?}",
        rank.name,
        rank.required_points,
        rank.salary,
        stations,
        vehicle_shape(&rank.vehicles),
        rank.outfits
    )
}

fn vehicle_shape(vehicles: &[Vehicle]) -> Vec<(String, String)> {
    vehicles
        .iter()
        .map(|vehicle| (vehicle.model.clone(), vehicle.display_name.clone()))
        .collect()
}

fn tree_shape(ranks: &[RankHierarchy]) -> Vec<(String, Vec<String>)> {
    ranks
        .iter()
        .map(|rank| {
            (
                shape(rank),
                rank.pay_bands().iter().map(shape).collect(),
            )
        })
        .collect()
}

#[test]
fn round_trip_preserves_hierarchy() {
    let ranks = sample_ranks();
    let xml = generate_ranks_xml(&ranks).unwrap();
    let parsed = parse_ranks_xml(&xml).unwrap();

    assert_eq!(tree_shape(&parsed), tree_shape(&ranks));

    let officer = &parsed[1];
    assert!(officer.is_parent());
    for band in officer.pay_bands() {
        assert_eq!(band.parent_id(), Some(officer.id()));
        assert!(band.is_pay_band());
    }
}

#[test]
fn station_and_rank_items_stay_apart() {
    let parsed = parse_ranks_xml(&generate_ranks_xml(&sample_ranks()).unwrap()).unwrap();
    let recruit = &parsed[0];

    assert_eq!(recruit.vehicles.len(), 1);
    assert_eq!(recruit.vehicles[0].model, "police2");
    assert_eq!(recruit.outfits, vec!["LSPD.Class B".to_string()]);

    let mission_row = &recruit.stations[0];
    assert_eq!(mission_row.vehicles.len(), 1);
    assert_eq!(mission_row.vehicles[0].model, "police");
    assert_eq!(mission_row.outfits, vec!["LSPD.Class A".to_string()]);
    assert_eq!(mission_row.zones.len(), 3);

    let vespucci = &recruit.stations[1];
    assert!(vespucci.vehicles.is_empty());
    assert!(vespucci.outfits.is_empty());
    assert_eq!(vespucci.style_id, 2);
}

#[test]
fn generation_is_deterministic() {
    let ranks = sample_ranks();
    let first = generate_ranks_xml(&ranks).unwrap();
    let second = generate_ranks_xml(&ranks).unwrap();
    assert_eq!(first, second);

    let reparsed = parse_ranks_xml(&first).unwrap();
    assert_eq!(generate_ranks_xml(&reparsed).unwrap(), first);
}

#[test]
fn parents_are_written_as_their_bands() {
    let xml = generate_ranks_xml(&sample_ranks()).unwrap();
    assert!(xml.contains("<Name>Officer I</Name>"));
    assert!(xml.contains("<Name>Officer II</Name>"));
    assert!(!xml.contains("<Name>Officer</Name>"));
    assert_eq!(xml.matches("<Rank>").count(), 4);
}

#[test]
fn vehicle_model_is_an_attribute() {
    let xml = generate_ranks_xml(&sample_ranks()).unwrap();
    assert!(xml.contains(r#"<Vehicle model="police">Police Cruiser</Vehicle>"#));
}

#[test]
fn numbered_ranks_are_grouped_sorted_and_renumbered() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Ranks>
  <Rank><Name>Detective III</Name><RequiredPoints>900</RequiredPoints><Salary>30</Salary></Rank>
  <Rank><Name>Cadet</Name><RequiredPoints>0</RequiredPoints><Salary>10</Salary></Rank>
  <Rank><Name>Detective I</Name><RequiredPoints>500</RequiredPoints><Salary>20</Salary></Rank>
  <Rank><Name>Captain</Name><RequiredPoints>2000</RequiredPoints><Salary>50</Salary></Rank>
  <Rank><Name>Detective II</Name><RequiredPoints>700</RequiredPoints><Salary>25</Salary></Rank>
</Ranks>"#;

    let ranks = parse_ranks_xml(xml).unwrap();
    let names: Vec<&str> = ranks.iter().map(|rank| rank.name.as_str()).collect();
    assert_eq!(names, ["Detective", "Cadet", "Captain"]);

    let detective = &ranks[0];
    assert_eq!(detective.required_points, 500);
    assert_eq!(detective.salary, 20);
    let bands: Vec<(&str, i64)> = detective
        .pay_bands()
        .iter()
        .map(|band| (band.name.as_str(), band.required_points))
        .collect();
    assert_eq!(
        bands,
        [("Detective I", 500), ("Detective II", 700), ("Detective III", 900)]
    );
    assert!(!ranks[1].is_parent());
}

#[test]
fn equal_thresholds_keep_document_order() {
    let xml = "<Ranks>\
        <Rank><Name>Officer II</Name><RequiredPoints>100</RequiredPoints><Salary>2</Salary></Rank>\
        <Rank><Name>Officer I</Name><RequiredPoints>100</RequiredPoints><Salary>1</Salary></Rank>\
        </Ranks>";
    let ranks = parse_ranks_xml(xml).unwrap();
    let salaries: Vec<i64> = ranks[0].pay_bands().iter().map(|band| band.salary).collect();
    assert_eq!(salaries, [2, 1]);
    assert_eq!(ranks[0].salary, 2);
}

#[test]
fn unknown_elements_are_skipped() {
    let xml = "<Ranks><Comment>draft</Comment><Rank><Name>Cadet</Name>\
        <Badge>gold</Badge><Stations><Station><StationName>Davis</StationName>\
        <Radio>on</Radio></Station></Stations></Rank></Ranks>";
    let ranks = parse_ranks_xml(xml).unwrap();
    assert_eq!(ranks.len(), 1);
    assert_eq!(ranks[0].stations[0].station_name, "Davis");
}

#[test]
fn non_numeric_threshold_is_rejected() {
    let xml = "<Ranks><Rank><Name>Cadet</Name><RequiredPoints>lots</RequiredPoints></Rank></Ranks>";
    match parse_ranks_xml(xml) {
        Err(XmlError::InvalidNumber { element, value }) => {
            assert_eq!(element, "RequiredPoints");
            assert_eq!(value, "lots");
        }
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
}

#[test]
fn wrong_root_is_rejected() {
    let error = parse_ranks_xml("<Agencies/>").unwrap_err();
    assert!(matches!(error, XmlError::Structure(_)));
}

#[test]
fn malformed_xml_is_rejected() {
    assert!(parse_ranks_xml("<Ranks><Rank></Ranks>").is_err());
}

#[test]
fn files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Ranks.xml");
    let ranks = sample_ranks();

    write_ranks_file(&path, &ranks).unwrap();
    let loaded = read_ranks_file(&path).unwrap();
    assert_eq!(tree_shape(&loaded), tree_shape(&ranks));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xml");
    match read_ranks_file(&path) {
        Err(XmlError::File { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected File error, got {other:?}"),
    }
}
