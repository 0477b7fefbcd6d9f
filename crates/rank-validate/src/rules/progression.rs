//! Thresholds and salaries must not go down in generation order.

use serde::{Deserialize, Serialize};
use tracing::trace;

use rank_model::{RankHierarchy, flatten_ranks};

use crate::context::ValidationContext;
use crate::issue::{IssueCategory, ValidationIssue, ValidationSeverity};
use crate::rule::{
    ListValidator, PropertyValidator, RankValidator, RuleInput, ValidationRule, property,
    rank_scope,
};

pub const RULE_ID: &str = "RANK_PROGRESSION";

const CONTEXTS: &[ValidationContext] = &[
    ValidationContext::Full,
    ValidationContext::RealTime,
    ValidationContext::Startup,
];

/// Severity of each progression problem. [`ValidationSeverity::None`] turns
/// a check off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionPolicy {
    /// Two adjacent ranks with the same XP threshold.
    pub equal_threshold: ValidationSeverity,
    /// A rank requiring less XP than the one before it.
    pub decreasing_threshold: ValidationSeverity,
    /// A rank paying less than the one before it.
    pub decreasing_salary: ValidationSeverity,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            equal_threshold: ValidationSeverity::Warning,
            decreasing_threshold: ValidationSeverity::Error,
            decreasing_salary: ValidationSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankProgressionRule {
    policy: ProgressionPolicy,
}

impl RankProgressionRule {
    pub fn new(policy: ProgressionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ProgressionPolicy {
        &self.policy
    }

    fn issue(
        &self,
        severity: ValidationSeverity,
        rank: &RankHierarchy,
        property_name: &str,
        message: String,
    ) -> Option<ValidationIssue> {
        severity.is_issue().then(|| {
            ValidationIssue::new(RULE_ID, severity, IssueCategory::Progression, message)
                .for_rank(rank)
                .with_property(property_name)
        })
    }

    fn threshold_issue(
        &self,
        previous: &RankHierarchy,
        current: &RankHierarchy,
        points: i64,
    ) -> Option<ValidationIssue> {
        if points == previous.required_points {
            self.issue(
                self.policy.equal_threshold,
                current,
                property::REQUIRED_POINTS,
                format!(
                    "'{}' requires the same XP ({points}) as '{}'",
                    current.name, previous.name
                ),
            )
            .map(|issue| {
                issue.with_suggested_fix(format!(
                    "Raise the threshold above {}",
                    previous.required_points
                ))
            })
        } else if points < previous.required_points {
            self.issue(
                self.policy.decreasing_threshold,
                current,
                property::REQUIRED_POINTS,
                format!(
                    "'{}' requires less XP ({points}) than '{}' ({})",
                    current.name, previous.name, previous.required_points
                ),
            )
            .map(|issue| issue.with_suggested_fix("Reorder the ranks or raise the threshold"))
        } else {
            None
        }
    }

    fn salary_issue(
        &self,
        previous: &RankHierarchy,
        current: &RankHierarchy,
        salary: i64,
    ) -> Option<ValidationIssue> {
        if salary >= previous.salary {
            return None;
        }
        self.issue(
            self.policy.decreasing_salary,
            current,
            property::SALARY,
            format!(
                "'{}' pays less (${salary}) than '{}' (${})",
                current.name, previous.name, previous.salary
            ),
        )
    }

    fn compare(&self, previous: &RankHierarchy, current: &RankHierarchy) -> Vec<ValidationIssue> {
        self.threshold_issue(previous, current, current.required_points)
            .into_iter()
            .chain(self.salary_issue(previous, current, current.salary))
            .collect()
    }
}

impl ValidationRule for RankProgressionRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn rule_name(&self) -> &'static str {
        "Rank progression"
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

impl ListValidator for RankProgressionRule {
    fn validate_list(&self, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let flat = flatten_ranks(input.ranks);
        trace!(nodes = flat.len(), "checking progression");
        flat.windows(2)
            .flat_map(|pair| self.compare(pair[0], pair[1]))
            .collect()
    }
}

impl RankValidator for RankProgressionRule {
    /// Checks both neighbours of every node in scope. A problem with the
    /// following rank is reported against the scoped rank.
    fn validate_rank(&self, rank: &RankHierarchy, input: &RuleInput<'_>) -> Vec<ValidationIssue> {
        let scope = rank_scope(rank);
        let in_scope = |node: &RankHierarchy| scope.iter().any(|s| s.id() == node.id());
        let flat = flatten_ranks(input.ranks);
        let mut issues = Vec::new();
        for pair in flat.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if in_scope(current) {
                issues.extend(self.compare(previous, current));
            } else if in_scope(previous) {
                issues.extend(
                    self.compare(previous, current)
                        .into_iter()
                        .map(|issue| issue.for_rank(previous)),
                );
            }
        }
        issues
    }
}

impl PropertyValidator for RankProgressionRule {
    fn validate_property(
        &self,
        rank: &RankHierarchy,
        property_name: &str,
        value: &str,
        input: &RuleInput<'_>,
    ) -> Vec<ValidationIssue> {
        // unparseable input is the structure rule's to report
        let Ok(proposed) = value.trim().parse::<i64>() else {
            return Vec::new();
        };
        let flat = flatten_ranks(input.ranks);
        let Some(position) = flat.iter().position(|node| node.id() == rank.id()) else {
            return Vec::new();
        };
        let previous = position.checked_sub(1).and_then(|i| flat.get(i)).copied();
        let next = flat.get(position + 1).copied();

        let mut edited = rank.clone();
        let mut issues = Vec::new();
        match property_name {
            property::REQUIRED_POINTS => {
                edited.required_points = proposed;
                if let Some(previous) = previous {
                    issues.extend(self.threshold_issue(previous, &edited, proposed));
                }
                if let Some(next) = next {
                    issues.extend(
                        self.threshold_issue(&edited, next, next.required_points)
                            .map(|issue| issue.for_rank(rank)),
                    );
                }
            }
            property::SALARY => {
                edited.salary = proposed;
                if let Some(previous) = previous {
                    issues.extend(self.salary_issue(previous, &edited, proposed));
                }
                if let Some(next) = next {
                    issues.extend(
                        self.salary_issue(&edited, next, next.salary)
                            .map(|issue| issue.for_rank(rank)),
                    );
                }
            }
            _ => {}
        }
        issues
    }
}
