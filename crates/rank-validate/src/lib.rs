//! Validation of rank hierarchies.
//!
//! Rules declare the [`ValidationContext`]s they take part in and which of
//! the list, rank and property capabilities they implement. The
//! [`ValidationService`] filters by context, runs the rules in registration
//! order and returns the issues as data.

pub mod context;
pub mod issue;
pub mod rule;
pub mod rules;
pub mod service;

pub use context::ValidationContext;
pub use issue::{
    AutoFix, DismissalKey, DismissedIssues, IssueCategory, ValidationIssue, ValidationSeverity,
};
pub use rule::{
    ListValidator, PropertyValidator, RankValidator, RuleInput, ValidationRule, property,
};
pub use rules::{
    AdvisoryRule, ProgressionPolicy, RankProgressionRule, RankStructureRule,
    ReferenceValidationRule, default_rules,
};
pub use service::{ValidationResult, ValidationService};
