//! Required fields, numeric ranges, duplicates and parent/pay band links.

use std::collections::HashSet;

use rank_model::{RankHierarchy, RankId, StationAssignment, find_rank, find_rank_mut, walk_ranks};

use crate::context::ValidationContext;
use crate::issue::{AutoFix, IssueCategory, ValidationIssue, ValidationSeverity};
use crate::rule::{
    ListValidator, PropertyValidator, RankValidator, RuleInput, ValidationRule, is_in_scope,
    property,
};

pub const RULE_ID: &str = "RANK_STRUCTURE";

const CONTEXTS: &[ValidationContext] = &[
    ValidationContext::Full,
    ValidationContext::RealTime,
    ValidationContext::PreGenerate,
    ValidationContext::Startup,
];

/// Structural checks. Failures here would corrupt the generated document,
/// so most of them are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankStructureRule;

impl RankStructureRule {
    pub fn new() -> Self {
        Self
    }
}

fn issue(severity: ValidationSeverity, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::new(RULE_ID, severity, IssueCategory::Structure, message)
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Items whose key already appeared earlier in the slice.
fn repeated<T>(items: &[T], key: impl Fn(&T) -> String) -> Vec<&T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert(key(*item)))
        .collect()
}

fn renumber_fix(parent_id: RankId) -> AutoFix {
    AutoFix::new("Renumber pay bands", move |ranks: &mut Vec<RankHierarchy>| {
        if let Some(parent) = find_rank_mut(ranks, &parent_id) {
            parent.renumber_pay_bands();
        }
    })
}

fn has_own_items(rank: &RankHierarchy) -> bool {
    !(rank.stations.is_empty() && rank.vehicles.is_empty() && rank.outfits.is_empty())
}

/// Copy a parent's own items onto every pay band that lacks them, then
/// clear them from the parent.
fn push_down_fix(parent_id: RankId) -> AutoFix {
    AutoFix::new("Move items to pay bands", move |ranks: &mut Vec<RankHierarchy>| {
        let Some(parent) = find_rank_mut(ranks, &parent_id) else {
            return;
        };
        let stations = std::mem::take(&mut parent.stations);
        let vehicles = std::mem::take(&mut parent.vehicles);
        let outfits = std::mem::take(&mut parent.outfits);
        for band in parent.pay_bands_mut() {
            for station in &stations {
                if !band.stations.iter().any(|s| s.key() == station.key()) {
                    band.stations.push(station.clone());
                }
            }
            for vehicle in &vehicles {
                if !band.vehicles.contains(vehicle) {
                    band.vehicles.push(vehicle.clone());
                }
            }
            for outfit in &outfits {
                if !band.outfits.iter().any(|o| name_key(o) == name_key(outfit)) {
                    band.outfits.push(outfit.clone());
                }
            }
        }
    })
}

fn check_numbers(node: &RankHierarchy, issues: &mut Vec<ValidationIssue>) {
    if node.required_points < 0 {
        let id = node.id().clone();
        issues.push(
            issue(
                ValidationSeverity::Error,
                format!("Required XP of '{}' is negative ({})", node.name, node.required_points),
            )
            .for_rank(node)
            .with_property(property::REQUIRED_POINTS)
            .with_suggested_fix("Use a threshold of 0 or more")
            .with_auto_fix(AutoFix::new("Set required XP to 0", move |ranks| {
                if let Some(rank) = find_rank_mut(ranks, &id) {
                    rank.required_points = 0;
                }
            })),
        );
    }
    if node.salary < 0 {
        let id = node.id().clone();
        issues.push(
            issue(
                ValidationSeverity::Error,
                format!("Salary of '{}' is negative ({})", node.name, node.salary),
            )
            .for_rank(node)
            .with_property(property::SALARY)
            .with_suggested_fix("Use a salary of 0 or more")
            .with_auto_fix(AutoFix::new("Set salary to 0", move |ranks| {
                if let Some(rank) = find_rank_mut(ranks, &id) {
                    rank.salary = 0;
                }
            })),
        );
    }
}

fn check_links(
    node: &RankHierarchy,
    parent: Option<&RankHierarchy>,
    issues: &mut Vec<ValidationIssue>,
) {
    if node.is_parent() == node.pay_bands().is_empty() {
        let id = node.id().clone();
        issues.push(
            issue(
                ValidationSeverity::Error,
                format!(
                    "'{}' is flagged as {} but has {} pay bands",
                    node.name,
                    if node.is_parent() { "a parent" } else { "standalone" },
                    node.pay_bands().len()
                ),
            )
            .for_rank(node)
            .with_auto_fix(AutoFix::new("Fix parent flag", move |ranks| {
                if let Some(rank) = find_rank_mut(ranks, &id) {
                    rank.sync_parent_flag();
                }
            })),
        );
    }

    match parent {
        Some(parent) => {
            if node.parent_id() != Some(parent.id()) {
                issues.push(
                    issue(
                        ValidationSeverity::Error,
                        format!("Pay band '{}' is not linked to '{}'", node.name, parent.name),
                    )
                    .for_rank(node)
                    .with_auto_fix(renumber_fix(parent.id().clone())),
                );
            }
            if !node.pay_bands().is_empty() {
                issues.push(
                    issue(
                        ValidationSeverity::Error,
                        format!("Pay band '{}' has pay bands of its own", node.name),
                    )
                    .for_rank(node)
                    .with_suggested_fix("Promote the pay band to a rank first"),
                );
            }
        }
        None => {
            if node.parent_id().is_some() {
                issues.push(
                    issue(
                        ValidationSeverity::Error,
                        format!("Top-level rank '{}' still points at a parent", node.name),
                    )
                    .for_rank(node),
                );
            }
        }
    }

    if node.is_parent() && has_own_items(node) {
        issues.push(
            issue(
                ValidationSeverity::Error,
                format!(
                    "'{}' has pay bands, so its own {} station(s), {} vehicle(s) and {} outfit(s) are not saved",
                    node.name,
                    node.stations.len(),
                    node.vehicles.len(),
                    node.outfits.len()
                ),
            )
            .for_rank(node)
            .with_suggested_fix("Assign them to the pay bands instead")
            .with_auto_fix(push_down_fix(node.id().clone())),
        );
    }

    for (position, band) in node.pay_bands().iter().enumerate() {
        let expected = node.pay_band_name(position + 1);
        if band.name != expected {
            issues.push(
                issue(
                    ValidationSeverity::Warning,
                    format!("Pay band '{}' should be named '{expected}'", band.name),
                )
                .for_rank(band)
                .with_property(property::NAME)
                .with_auto_fix(renumber_fix(node.id().clone())),
            );
        }
    }
}

fn check_assignments(node: &RankHierarchy, issues: &mut Vec<ValidationIssue>) {
    for station in &node.stations {
        if station.station_name.trim().is_empty() {
            issues.push(
                issue(
                    ValidationSeverity::Error,
                    format!("'{}' has a station assignment without a name", node.name),
                )
                .for_rank(node),
            );
        }
        for vehicle in repeated(&station.vehicles, |v| name_key(&v.model)) {
            issues.push(
                issue(
                    ValidationSeverity::Warning,
                    format!(
                        "Vehicle '{}' is listed twice for '{}' at {}",
                        vehicle.model, node.name, station.station_name
                    ),
                )
                .for_rank(node)
                .with_item(vehicle.model.clone()),
            );
        }
    }
    for station in repeated(&node.stations, StationAssignment::key) {
        if station.key().is_empty() {
            continue;
        }
        issues.push(
            issue(
                ValidationSeverity::Warning,
                format!(
                    "Station '{}' is assigned to '{}' more than once",
                    station.station_name, node.name
                ),
            )
            .for_rank(node)
            .with_item(station.station_name.clone())
            .with_suggested_fix("Merge the duplicate station assignments"),
        );
    }
    for vehicle in repeated(&node.vehicles, |v| name_key(&v.model)) {
        issues.push(
            issue(
                ValidationSeverity::Warning,
                format!("Vehicle '{}' is listed twice for '{}'", vehicle.model, node.name),
            )
            .for_rank(node)
            .with_item(vehicle.model.clone()),
        );
    }
    for outfit in repeated(&node.outfits, |o| name_key(o)) {
        issues.push(
            issue(
                ValidationSeverity::Warning,
                format!("Outfit '{outfit}' is listed twice for '{}'", node.name),
            )
            .for_rank(node)
            .with_item(outfit.clone()),
        );
    }
}

fn check_node(
    node: &RankHierarchy,
    parent: Option<&RankHierarchy>,
    issues: &mut Vec<ValidationIssue>,
) {
    if node.name.trim().is_empty() {
        issues.push(
            issue(ValidationSeverity::Error, "Rank name is empty")
                .for_rank(node)
                .with_property(property::NAME)
                .with_suggested_fix("Give the rank a name"),
        );
    }
    check_numbers(node, issues);
    check_links(node, parent, issues);
    check_assignments(node, issues);
}

/// Every node whose name was already used by an earlier node.
fn duplicate_names(ranks: &[RankHierarchy]) -> Vec<ValidationIssue> {
    let nodes = walk_ranks(ranks);
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| {
            let key = name_key(&node.name);
            !key.is_empty() && !seen.insert(key)
        })
        .map(|node| {
            issue(
                ValidationSeverity::Error,
                format!("Rank name '{}' is used more than once", node.name),
            )
            .for_rank(node)
            .with_property(property::NAME)
            .with_suggested_fix("Rank names must be unique")
        })
        .collect()
}

fn parse_number(
    rank: &RankHierarchy,
    property_name: &str,
    value: &str,
) -> Result<i64, ValidationIssue> {
    let number: i64 = value.trim().parse().map_err(|_| {
        issue(
            ValidationSeverity::Error,
            format!("'{value}' is not a whole number"),
        )
        .for_rank(rank)
        .with_property(property_name)
    })?;
    if number < 0 {
        return Err(issue(ValidationSeverity::Error, "Value cannot be negative")
            .for_rank(rank)
            .with_property(property_name));
    }
    Ok(number)
}

impl ValidationRule for RankStructureRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn rule_name(&self) -> &'static str {
        "Rank structure"
    }

    fn contexts(&self) -> &'static [ValidationContext] {
        CONTEXTS
    }

    fn as_list_validator(&self) -> Option<&dyn ListValidator> {
        Some(self)
    }

    fn as_rank_validator(&self) -> Option<&dyn RankValidator> {
        Some(self)
    }

    fn as_property_validator(&self) -> Option<&dyn PropertyValidator> {
        Some(self)
    }
}

impl ListValidator for RankStructureRule {
    fn validate_list(&self, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for rank in input.ranks {
            check_node(rank, None, &mut issues);
            for band in rank.pay_bands() {
                check_node(band, Some(rank), &mut issues);
            }
        }
        issues.extend(duplicate_names(input.ranks));
        issues
    }
}

impl RankValidator for RankStructureRule {
    fn validate_rank(&self, rank: &RankHierarchy, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let parent = rank
            .parent_id()
            .and_then(|parent_id| find_rank(input.ranks, parent_id));
        check_node(rank, parent, &mut issues);
        for band in rank.pay_bands() {
            check_node(band, Some(rank), &mut issues);
        }
        issues.extend(
            duplicate_names(input.ranks)
                .into_iter()
                .filter(|issue| is_in_scope(issue, rank)),
        );
        issues
    }
}

impl PropertyValidator for RankStructureRule {
    fn validate_property(
        &self,
        rank: &RankHierarchy,
        property_name: &str,
        value: &str,
        input: &RuleInput<'_>,
    ) -> Vec<ValidationIssue> {
        match property_name {
            property::NAME => {
                let key = name_key(value);
                if key.is_empty() {
                    return vec![
                        issue(ValidationSeverity::Error, "Rank name is empty")
                            .for_rank(rank)
                            .with_property(property::NAME),
                    ];
                }
                let taken = walk_ranks(input.ranks)
                    .into_iter()
                    .any(|other| other.id() != rank.id() && name_key(&other.name) == key);
                if taken {
                    return vec![
                        issue(
                            ValidationSeverity::Error,
                            format!("Rank name '{}' is already in use", value.trim()),
                        )
                        .for_rank(rank)
                        .with_property(property::NAME),
                    ];
                }
                Vec::new()
            }
            property::REQUIRED_POINTS | property::SALARY => {
                match parse_number(rank, property_name, value) {
                    Ok(_) => Vec::new(),
                    Err(issue) => vec![issue],
                }
            }
            _ => Vec::new(),
        }
    }
}
