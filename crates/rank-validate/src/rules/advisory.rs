//! Soft suggestions that never block generation.

use rank_model::{RankHierarchy, flatten_ranks};

use crate::context::ValidationContext;
use crate::issue::{IssueCategory, ValidationIssue, ValidationSeverity};
use crate::rule::{ListValidator, RankValidator, RuleInput, ValidationRule, rank_scope};

pub const RULE_ID: &str = "ADVISORY";

const CONTEXTS: &[ValidationContext] = &[ValidationContext::Full, ValidationContext::AdvisoryOnly];

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryRule;

impl AdvisoryRule {
    pub fn new() -> Self {
        Self
    }
}

fn advisory(rank: &RankHierarchy, message: String) -> ValidationIssue {
    ValidationIssue::new(
        RULE_ID,
        ValidationSeverity::Advisory,
        IssueCategory::Advisory,
        message,
    )
    .for_rank(rank)
}

fn has_vehicles(rank: &RankHierarchy) -> bool {
    !rank.vehicles.is_empty() || rank.stations.iter().any(|s| !s.vehicles.is_empty())
}

fn has_outfits(rank: &RankHierarchy) -> bool {
    !rank.outfits.is_empty() || rank.stations.iter().any(|s| !s.outfits.is_empty())
}

/// Hints for one generated rank, given the rank generated before it.
fn check(previous: Option<&RankHierarchy>, rank: &RankHierarchy) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if rank.stations.is_empty() {
        issues.push(
            advisory(rank, format!("'{}' has no stations assigned", rank.name))
                .with_suggested_fix("Assign at least one station"),
        );
    } else if let Some(previous) = previous
        && rank.stations.len() < previous.stations.len()
    {
        issues.push(advisory(
            rank,
            format!(
                "Previous rank '{}' had more stations assigned ({} vs {})",
                previous.name,
                previous.stations.len(),
                rank.stations.len()
            ),
        ));
    }
    if !has_vehicles(rank) {
        issues.push(advisory(rank, format!("'{}' has no vehicles", rank.name)));
    }
    if !has_outfits(rank) {
        issues.push(advisory(rank, format!("'{}' has no outfits", rank.name)));
    }
    issues
}

impl ValidationRule for AdvisoryRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn rule_name(&self) -> &'static str {
        "Advisory"
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

impl ListValidator for AdvisoryRule {
    fn validate_list(&self, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let flat = flatten_ranks(input.ranks);
        let mut previous = None;
        let mut issues = Vec::new();
        for rank in flat {
            issues.extend(check(previous, rank));
            previous = Some(rank);
        }
        issues
    }
}

impl RankValidator for AdvisoryRule {
    fn validate_rank(&self, rank: &RankHierarchy, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let scope = rank_scope(rank);
        let flat = flatten_ranks(input.ranks);
        let mut issues = Vec::new();
        for (index, node) in flat.iter().enumerate() {
            if scope.iter().any(|s| s.id() == node.id()) {
                let previous = index.checked_sub(1).map(|i| flat[i]);
                issues.extend(check(previous, node));
            }
        }
        issues
    }
}
