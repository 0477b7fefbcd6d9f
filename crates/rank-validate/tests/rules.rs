//! Behaviour of the default rules.

use rank_model::{DataCatalog, RankHierarchy, RankId, StationAssignment, Vehicle};
use rank_validate::{
    AdvisoryRule, ListValidator, ProgressionPolicy, PropertyValidator, RankProgressionRule,
    RankStructureRule, RankValidator, ReferenceValidationRule, RuleInput, ValidationIssue,
    ValidationSeverity, property,
};

fn catalog() -> DataCatalog {
    DataCatalog::from_json_str(
        r#"{
            "agencies": [{"name": "Los Santos Police Department", "short_name": "LSPD", "scripted_name": "lspd"}],
            "stations": [
                {"name": "Mission Row", "agency": "lspd", "zones": ["DOWNT", "LMESA", "VINE"]},
                {"name": "Vinewood", "agency": "lspd", "zones": ["VINE"]}
            ],
            "vehicles": [
                {"model": "police", "display_name": "Police Cruiser"},
                {"model": "police2", "display_name": "Police Buffalo"}
            ],
            "outfits": [{"name": "LSPD", "variations": [{"name": "Class A"}, {"name": "Class B"}]}]
        }"#,
    )
    .unwrap()
}

fn equip(rank: &mut RankHierarchy) {
    rank.stations
        .push(StationAssignment::new("Mission Row").with_zones(["DOWNT"]));
    rank.vehicles.push(Vehicle::new("police", "Police Cruiser"));
    rank.outfits.push("LSPD.Class A".to_string());
}

fn assigned(name: &str, points: i64, salary: i64) -> RankHierarchy {
    let mut rank = RankHierarchy::new(name, points, salary);
    equip(&mut rank);
    rank
}

/// Recruit, Officer (two banded steps), Sergeant; no problems at all.
fn clean() -> Vec<RankHierarchy> {
    let mut officer = RankHierarchy::new("Officer", 1000, 2000);
    let bands: Vec<RankId> = (0..2).map(|_| officer.add_pay_band()).collect();
    for (step, id) in bands.iter().enumerate() {
        let band = officer.pay_band_mut(id).unwrap();
        band.required_points = 1000 + 500 * step as i64;
        band.salary = 2000 + 250 * step as i64;
        equip(band);
    }
    vec![
        assigned("Recruit", 0, 1000),
        officer,
        assigned("Sergeant", 3000, 4000),
    ]
}

fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|issue| issue.message.as_str()).collect()
}

#[test]
fn clean_hierarchy_passes_every_rule() {
    let ranks = clean();
    let catalog = catalog();
    let input = RuleInput::new(&ranks, Some(&catalog));
    assert!(RankStructureRule::new().validate_list(&input).is_empty());
    assert!(RankProgressionRule::default().validate_list(&input).is_empty());
    assert!(ReferenceValidationRule::new().validate_list(&input).is_empty());
    assert!(AdvisoryRule::new().validate_list(&input).is_empty());
}

#[test]
fn structure_reports_empty_name_and_negative_numbers() {
    let mut ranks = clean();
    ranks[0].name = "  ".to_string();
    ranks[2].salary = -10;
    ranks[2].required_points = -1;
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));

    assert_eq!(issues.len(), 3);
    assert!(issues.iter().all(|i| i.severity == ValidationSeverity::Error));
    assert_eq!(issues[0].property_name.as_deref(), Some(property::NAME));
    assert!(issues.iter().all(|i| i.rule_id == "RANK_STRUCTURE"));
}

#[test]
fn structure_auto_fix_clamps_negative_salary() {
    let mut ranks = clean();
    ranks[2].salary = -10;
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));
    let fix = issues[0].auto_fix.clone().unwrap();
    // validation itself left the model alone
    assert_eq!(ranks[2].salary, -10);

    fix.apply(&mut ranks);
    assert_eq!(ranks[2].salary, 0);
    assert!(
        RankStructureRule::new()
            .validate_list(&RuleInput::new(&ranks, None))
            .is_empty()
    );
}

#[test]
fn structure_reports_duplicate_names_across_pay_bands() {
    let mut ranks = clean();
    ranks.push(assigned("officer ii", 5000, 6000));
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(messages(&issues), ["Rank name 'officer ii' is used more than once"]);
    assert_eq!(issues[0].rank_id.as_ref(), Some(ranks[3].id()));
}

#[test]
fn structure_reports_out_of_sequence_band_names_with_fix() {
    let mut ranks = clean();
    let band = ranks[1].pay_bands()[1].id().clone();
    ranks[1].pay_band_mut(&band).unwrap().name = "Officer VII".to_string();
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ValidationSeverity::Warning);
    assert_eq!(
        issues[0].message,
        "Pay band 'Officer VII' should be named 'Officer II'"
    );
    issues[0].auto_fix.as_ref().unwrap().apply(&mut ranks);
    assert_eq!(ranks[1].pay_bands()[1].name, "Officer II");
}

#[test]
fn structure_detects_parent_flag_out_of_sync() {
    let mut value = serde_json::to_value(RankHierarchy::new("Detective", 10, 10)).unwrap();
    value["is_parent"] = serde_json::Value::Bool(true);
    let broken: RankHierarchy = serde_json::from_value(value).unwrap();
    let mut ranks = vec![broken];

    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].can_auto_fix());
    issues[0].auto_fix.as_ref().unwrap().apply(&mut ranks);
    assert!(!ranks[0].is_parent());
}

#[test]
fn structure_reports_items_held_by_a_parent_and_pushes_them_down() {
    let mut ranks = clean();
    ranks[1].stations.push(StationAssignment::new("Vinewood"));
    ranks[1].vehicles.push(Vehicle::new("police2", "Police Buffalo"));
    ranks[1].outfits.push("LSPD.Class A".to_string());
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ValidationSeverity::Error);
    assert_eq!(issues[0].rank_name.as_deref(), Some("Officer"));
    assert_eq!(
        issues[0].message,
        "'Officer' has pay bands, so its own 1 station(s), 1 vehicle(s) and 1 outfit(s) are not saved"
    );

    issues[0].auto_fix.as_ref().unwrap().apply(&mut ranks);
    let officer = &ranks[1];
    assert!(officer.stations.is_empty());
    assert!(officer.vehicles.is_empty());
    assert!(officer.outfits.is_empty());
    for band in officer.pay_bands() {
        let stations: Vec<_> = band.stations.iter().map(|s| s.station_name.as_str()).collect();
        assert_eq!(stations, ["Mission Row", "Vinewood"]);
        assert!(band.vehicles.iter().any(|v| v.model == "police2"));
        assert_eq!(band.outfits, ["LSPD.Class A"]);
    }
    assert!(
        RankStructureRule::new()
            .validate_list(&RuleInput::new(&ranks, None))
            .is_empty()
    );
}

#[test]
fn structure_reports_duplicate_assignments() {
    let mut ranks = clean();
    ranks[0].stations.push(StationAssignment::new("mission row "));
    ranks[0].vehicles.push(Vehicle::new("POLICE", ""));
    ranks[0].outfits.push("lspd.class a".to_string());
    ranks[0].stations[0]
        .vehicles
        .extend([Vehicle::new("police2", ""), Vehicle::new("police2", "")]);
    let issues = RankStructureRule::new().validate_list(&RuleInput::new(&ranks, None));

    assert_eq!(issues.len(), 4);
    assert!(issues.iter().all(|i| i.severity == ValidationSeverity::Warning));
    let items: Vec<_> = issues.iter().filter_map(|i| i.item_name.as_deref()).collect();
    assert_eq!(items, ["police2", "mission row ", "POLICE", "lspd.class a"]);
}

#[test]
fn structure_single_rank_keeps_only_its_issues() {
    let mut ranks = clean();
    ranks[0].salary = -1;
    ranks[2].salary = -1;
    let rule = RankStructureRule::new();
    let issues = rule.validate_rank(&ranks[2], &RuleInput::new(&ranks, None));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rank_name.as_deref(), Some("Sergeant"));
}

#[test]
fn structure_property_checks() {
    let ranks = clean();
    let rule = RankStructureRule::new();
    let input = RuleInput::new(&ranks, None);
    let sergeant = &ranks[2];

    assert!(rule.validate_property(sergeant, property::NAME, "Sergeant", &input).is_empty());
    assert!(rule.validate_property(sergeant, property::NAME, "Staff Sergeant", &input).is_empty());
    assert_eq!(
        messages(&rule.validate_property(sergeant, property::NAME, " recruit ", &input)),
        ["Rank name 'recruit' is already in use"]
    );
    assert_eq!(rule.validate_property(sergeant, property::NAME, "", &input).len(), 1);
    assert_eq!(
        messages(&rule.validate_property(sergeant, property::SALARY, "12k", &input)),
        ["'12k' is not a whole number"]
    );
    assert_eq!(
        messages(&rule.validate_property(sergeant, property::REQUIRED_POINTS, "-3", &input)),
        ["Value cannot be negative"]
    );
    assert!(rule.validate_property(sergeant, property::SALARY, " 4500 ", &input).is_empty());
    assert!(rule.validate_property(sergeant, "Colour", "", &input).is_empty());
}

#[test]
fn progression_equal_is_warning_and_decreasing_is_error() {
    let mut ranks = clean();
    ranks[2].required_points = 1500;
    ranks.push(assigned("Lieutenant", 1200, 5000));
    let issues = RankProgressionRule::default().validate_list(&RuleInput::new(&ranks, None));

    assert_eq!(
        messages(&issues),
        [
            "'Sergeant' requires the same XP (1500) as 'Officer II'",
            "'Lieutenant' requires less XP (1200) than 'Sergeant' (1500)",
        ]
    );
    assert_eq!(issues[0].severity, ValidationSeverity::Warning);
    assert_eq!(issues[1].severity, ValidationSeverity::Error);
}

#[test]
fn progression_checks_salary_across_pay_bands() {
    let mut ranks = clean();
    ranks[2].salary = 2100;
    let issues = RankProgressionRule::default().validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(
        messages(&issues),
        ["'Sergeant' pays less ($2100) than 'Officer II' ($2250)"]
    );
    assert_eq!(issues[0].property_name.as_deref(), Some(property::SALARY));
}

#[test]
fn progression_policy_is_configurable() {
    let mut ranks = clean();
    ranks[2].required_points = 1500;
    ranks[2].salary = 0;
    let strict = RankProgressionRule::new(ProgressionPolicy {
        equal_threshold: ValidationSeverity::Error,
        decreasing_salary: ValidationSeverity::None,
        ..ProgressionPolicy::default()
    });
    let issues = strict.validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ValidationSeverity::Error);
}

#[test]
fn progression_single_rank_reports_both_neighbours() {
    let mut ranks = clean();
    ranks[0].required_points = 1000;
    ranks[2].required_points = 0;
    let rule = RankProgressionRule::default();
    let input = RuleInput::new(&ranks, None);

    let officer = rule.validate_rank(&ranks[1], &input);
    // Officer I ties Recruit; Sergeant drops below Officer II and is reported
    // against the officer scope as well
    assert_eq!(officer.len(), 2);
    let ids: Vec<_> = officer.iter().filter_map(|i| i.rank_id.clone()).collect();
    let band_ids: Vec<_> = ranks[1].pay_bands().iter().map(|b| b.id().clone()).collect();
    assert!(ids.iter().all(|id| band_ids.contains(id)));

    let recruit = rule.validate_rank(&ranks[0], &input);
    assert_eq!(recruit.len(), 1);
    assert_eq!(recruit[0].rank_id.as_ref(), Some(ranks[0].id()));
}

#[test]
fn progression_property_checks_proposed_value() {
    let ranks = clean();
    let rule = RankProgressionRule::default();
    let input = RuleInput::new(&ranks, None);
    let sergeant = &ranks[2];

    assert!(rule.validate_property(sergeant, property::REQUIRED_POINTS, "4000", &input).is_empty());
    let equal = rule.validate_property(sergeant, property::REQUIRED_POINTS, "1500", &input);
    assert_eq!(equal[0].severity, ValidationSeverity::Warning);
    let lower = rule.validate_property(sergeant, property::REQUIRED_POINTS, "100", &input);
    assert_eq!(lower[0].severity, ValidationSeverity::Error);
    assert!(rule.validate_property(sergeant, property::REQUIRED_POINTS, "x", &input).is_empty());

    let recruit = &ranks[0];
    let above_next = rule.validate_property(recruit, property::SALARY, "9000", &input);
    assert_eq!(above_next.len(), 1);
    assert_eq!(above_next[0].rank_id.as_ref(), Some(recruit.id()));
}

#[test]
fn reference_rule_is_silent_without_catalog() {
    let mut ranks = clean();
    ranks[0].stations.push(StationAssignment::new("Atlantis"));
    let issues = ReferenceValidationRule::new().validate_list(&RuleInput::new(&ranks, None));
    assert!(issues.is_empty());
}

#[test]
fn reference_rule_reports_unknown_items() {
    let mut ranks = clean();
    let catalog = catalog();
    ranks[0].stations.push(StationAssignment::new("Atlantis"));
    ranks[0].stations[0].zones.push("SANDY".to_string());
    ranks[0].stations[0].vehicles.push(Vehicle::new("tank", ""));
    ranks[2].vehicles.push(Vehicle::new("bike", ""));
    ranks[2].outfits.push("LSPD.Class Z".to_string());
    let issues = ReferenceValidationRule::new().validate_list(&RuleInput::new(&ranks, Some(&catalog)));

    assert_eq!(
        messages(&issues),
        [
            "Zone 'SANDY' is not part of station 'Mission Row'",
            "Vehicle 'tank' at Mission Row was not found",
            "Station 'Atlantis' was not found",
            "Vehicle 'bike' was not found",
            "Outfit 'LSPD.Class Z' was not found",
        ]
    );
    assert!(issues.iter().all(|i| i.severity == ValidationSeverity::Warning));
}

#[test]
fn reference_fix_removes_unknown_station() {
    let mut ranks = clean();
    let catalog = catalog();
    ranks[0].stations.push(StationAssignment::new("Atlantis"));
    let issues = ReferenceValidationRule::new().validate_list(&RuleInput::new(&ranks, Some(&catalog)));
    issues[0].auto_fix.as_ref().unwrap().apply(&mut ranks);
    assert_eq!(ranks[0].stations.len(), 1);
}

#[test]
fn advisory_rule_gives_soft_hints() {
    let mut ranks = clean();
    ranks.push(RankHierarchy::new("Captain", 6000, 8000));
    let mut lieutenant = assigned("Lieutenant", 4000, 5000);
    lieutenant.stations.push(StationAssignment::new("Vinewood"));
    ranks.insert(3, lieutenant);
    let mut commander = assigned("Commander", 9000, 9000);
    commander.vehicles.clear();
    commander.stations[0].vehicles.push(Vehicle::new("police2", ""));
    ranks.push(commander);

    let issues = AdvisoryRule::new().validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(
        messages(&issues),
        [
            "'Captain' has no stations assigned",
            "'Captain' has no vehicles",
            "'Captain' has no outfits",
        ]
    );
    assert!(issues.iter().all(|i| i.severity == ValidationSeverity::Advisory));

    ranks.remove(4);
    let issues = AdvisoryRule::new().validate_list(&RuleInput::new(&ranks, None));
    assert_eq!(
        messages(&issues),
        ["Previous rank 'Lieutenant' had more stations assigned (2 vs 1)"]
    );
}
