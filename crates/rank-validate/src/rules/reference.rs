//! Stations, vehicles and outfits must exist in the loaded game data.

use tracing::debug;

use rank_model::{DataCatalog, RankHierarchy, RankId, find_rank_mut, walk_ranks};

use crate::context::ValidationContext;
use crate::issue::{AutoFix, IssueCategory, ValidationIssue, ValidationSeverity};
use crate::rule::{ListValidator, RankValidator, RuleInput, ValidationRule, rank_scope};

pub const RULE_ID: &str = "REFERENCE_VALIDATION";

const CONTEXTS: &[ValidationContext] = &[ValidationContext::Full, ValidationContext::Startup];

/// Cross-reference checks against the catalog. Skipped entirely when no
/// catalog is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceValidationRule;

impl ReferenceValidationRule {
    pub fn new() -> Self {
        Self
    }
}

fn issue(rank: &RankHierarchy, item: &str, message: String) -> ValidationIssue {
    ValidationIssue::new(
        RULE_ID,
        ValidationSeverity::Warning,
        IssueCategory::Reference,
        message,
    )
    .for_rank(rank)
    .with_item(item)
}

fn remove_station_fix(rank_id: RankId, station: String) -> AutoFix {
    AutoFix::new(
        format!("Remove station '{station}'"),
        move |ranks: &mut Vec<RankHierarchy>| {
            if let Some(rank) = find_rank_mut(ranks, &rank_id) {
                let key = station.trim().to_lowercase();
                rank.stations.retain(|assignment| assignment.key() != key);
            }
        },
    )
}

fn check_vehicles<'a>(
    node: &RankHierarchy,
    models: impl Iterator<Item = &'a str>,
    location: &str,
    catalog: &DataCatalog,
    issues: &mut Vec<ValidationIssue>,
) {
    for model in models {
        if catalog.vehicle(model).is_none() {
            issues.push(
                issue(node, model, format!("Vehicle '{model}'{location} was not found"))
                    .with_suggested_fix("Check the model name or remove the vehicle"),
            );
        }
    }
}

fn check_outfits<'a>(
    node: &RankHierarchy,
    outfits: impl Iterator<Item = &'a String>,
    location: &str,
    catalog: &DataCatalog,
    issues: &mut Vec<ValidationIssue>,
) {
    for outfit in outfits {
        if !catalog.has_outfit(outfit) {
            issues.push(
                issue(node, outfit, format!("Outfit '{outfit}'{location} was not found"))
                    .with_suggested_fix("Use an Outfit.Variation name from the loaded outfits"),
            );
        }
    }
}

fn check_node(node: &RankHierarchy, catalog: &DataCatalog, issues: &mut Vec<ValidationIssue>) {
    for assignment in &node.stations {
        let location = format!(" at {}", assignment.station_name);
        match catalog.station(&assignment.station_name) {
            Some(station) => {
                for zone in &assignment.zones {
                    let known = station.zones.is_empty()
                        || station.zones.iter().any(|z| z.eq_ignore_ascii_case(zone));
                    if !known {
                        issues.push(issue(
                            node,
                            zone,
                            format!(
                                "Zone '{zone}' is not part of station '{}'",
                                assignment.station_name
                            ),
                        ));
                    }
                }
            }
            None => issues.push(
                issue(
                    node,
                    &assignment.station_name,
                    format!("Station '{}' was not found", assignment.station_name),
                )
                .with_suggested_fix("Check the station name or remove the assignment")
                .with_auto_fix(remove_station_fix(
                    node.id().clone(),
                    assignment.station_name.clone(),
                )),
            ),
        }
        check_vehicles(
            node,
            assignment.vehicles.iter().map(|v| v.model.as_str()),
            &location,
            catalog,
            issues,
        );
        check_outfits(node, assignment.outfits.iter(), &location, catalog, issues);
    }
    check_vehicles(
        node,
        node.vehicles.iter().map(|v| v.model.as_str()),
        "",
        catalog,
        issues,
    );
    check_outfits(node, node.outfits.iter(), "", catalog, issues);
}

impl ValidationRule for ReferenceValidationRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn rule_name(&self) -> &'static str {
        "Reference validation"
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
}

impl ListValidator for ReferenceValidationRule {
    fn validate_list(&self, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let Some(catalog) = input.catalog else {
            debug!("no catalog loaded, skipping reference checks");
            return Vec::new();
        };
        let mut issues = Vec::new();
        for node in walk_ranks(input.ranks) {
            check_node(node, catalog, &mut issues);
        }
        issues
    }
}

impl RankValidator for ReferenceValidationRule {
    fn validate_rank(&self, rank: &RankHierarchy, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let Some(catalog) = input.catalog else {
            return Vec::new();
        };
        let mut issues = Vec::new();
        for node in rank_scope(rank) {
            check_node(node, catalog, &mut issues);
        }
        issues
    }
}
