//! The rule contract.
//!
//! A rule declares its id, name and contexts, and opts into any of three
//! capabilities. The service asks for a capability and skips the rule when
//! it is absent.

use rank_model::{DataCatalog, RankHierarchy};

use crate::context::ValidationContext;
use crate::issue::ValidationIssue;

/// Property names accepted by [`PropertyValidator`].
pub mod property {
    pub const NAME: &str = "Name";
    pub const REQUIRED_POINTS: &str = "RequiredPoints";
    pub const SALARY: &str = "Salary";
}

/// What a rule gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The whole top-level list, for checks that need siblings.
    pub ranks: &'a [RankHierarchy],
    pub catalog: Option<&'a DataCatalog>,
}

impl<'a> RuleInput<'a> {
    pub fn new(ranks: &'a [RankHierarchy], catalog: Option<&'a DataCatalog>) -> Self {
        Self { ranks, catalog }
    }
}

/// A stateless validation rule.
pub trait ValidationRule: Send + Sync {
    /// Stable id, also used to key dismissals.
    fn rule_id(&self) -> &'static str;

    fn rule_name(&self) -> &'static str;

    fn contexts(&self) -> &'static [ValidationContext];

    fn applies_to(&self, context: ValidationContext) -> bool {
        self.contexts().contains(&context)
    }

    fn as_list_validator(&self) -> Option<&dyn ListValidator> {
        None
    }

    fn as_rank_validator(&self) -> Option<&dyn RankValidator> {
        None
    }

    fn as_property_validator(&self) -> Option<&dyn PropertyValidator> {
        None
    }
}

/// Validates the whole rank list.
pub trait ListValidator {
    fn validate_list(&self, input: &RuleInput<'_>) -> Vec<ValidationIssue>;
}

/// Validates one rank (and its pay bands) against the rest of the list.
/// Issues are scoped to that rank.
pub trait RankValidator {
    fn validate_rank(&self, rank: &RankHierarchy, input: &RuleInput<'_>) -> Vec<ValidationIssue>;
}

/// Validates a proposed property value before it is committed.
///
/// `value` is the raw text being edited; unknown property names produce no
/// issues.
pub trait PropertyValidator {
    fn validate_property(
        &self,
        rank: &RankHierarchy,
        property_name: &str,
        value: &str,
        input: &RuleInput<'_>,
    ) -> Vec<ValidationIssue>;
}

/// The node and its pay bands, which is the scope of a single-rank check.
pub(crate) fn rank_scope(rank: &RankHierarchy) -> Vec<&RankHierarchy> {
    let mut scope = vec![rank];
    scope.extend(rank.pay_bands());
    scope
}

/// Issue filter for single-rank validation.
pub(crate) fn is_in_scope(issue: &ValidationIssue, rank: &RankHierarchy) -> bool {
    issue
        .rank_id
        .as_ref()
        .is_some_and(|id| rank_scope(rank).iter().any(|node| node.id() == id))
}
