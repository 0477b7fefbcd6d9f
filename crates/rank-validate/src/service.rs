//! Validation orchestration.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use rank_model::{DataCatalog, RankHierarchy, RankId};

use crate::context::ValidationContext;
use crate::issue::{DismissedIssues, ValidationIssue, ValidationSeverity};
use crate::rule::{RuleInput, ValidationRule, is_in_scope};
use crate::rules::{ProgressionPolicy, default_rules};

/// Aggregated issues of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub context: ValidationContext,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new(context: ValidationContext) -> Self {
        Self {
            context,
            issues: Vec::new(),
        }
    }

    fn count(&self, severity: ValidationSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(ValidationSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ValidationSeverity::Warning)
    }

    pub fn advisory_count(&self) -> usize {
        self.count(ValidationSeverity::Advisory)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Highest severity present, `Success` when there are no issues.
    pub fn max_severity(&self) -> ValidationSeverity {
        self.issues
            .iter()
            .map(|issue| issue.severity)
            .max()
            .unwrap_or(ValidationSeverity::Success)
    }

    pub fn issues_for_rank<'a>(
        &'a self,
        rank_id: &'a RankId,
    ) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.rank_id.as_ref() == Some(rank_id))
    }

    pub fn issues_for_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.rule_id == rule_id)
    }

    /// Remove issues the user has silenced.
    pub fn without_dismissed(mut self, dismissed: &DismissedIssues) -> Self {
        self.issues = dismissed.filter(self.issues);
        self
    }
}

/// Single entry point for validation. Owns the registered rules and the
/// optional catalog snapshot; never mutates the ranks it is given.
#[derive(Default)]
pub struct ValidationService {
    rules: Vec<Box<dyn ValidationRule>>,
    catalog: Option<Arc<DataCatalog>>,
}

impl fmt::Debug for ValidationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationService")
            .field("rules", &self.rule_ids())
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}

impl ValidationService {
    /// A service with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_rules() -> Self {
        Self::with_policy(ProgressionPolicy::default())
    }

    /// Default rules with a custom progression policy.
    pub fn with_policy(policy: ProgressionPolicy) -> Self {
        let mut service = Self::new();
        for rule in default_rules(policy) {
            service.register_rule(rule);
        }
        service
    }

    pub fn with_catalog(mut self, catalog: Arc<DataCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn set_catalog(&mut self, catalog: Option<Arc<DataCatalog>>) {
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> Option<&DataCatalog> {
        self.catalog.as_deref()
    }

    /// Register a rule. A rule whose id is already registered is ignored and
    /// `false` is returned; the first registration wins.
    pub fn register_rule(&mut self, rule: Box<dyn ValidationRule>) -> bool {
        if self.rules.iter().any(|r| r.rule_id() == rule.rule_id()) {
            debug!(rule = rule.rule_id(), "rule already registered");
            return false;
        }
        debug!(rule = rule.rule_id(), "rule registered");
        self.rules.push(rule);
        true
    }

    pub fn unregister_rule(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.rule_id() != rule_id);
        self.rules.len() != before
    }

    /// Registered rule ids, in execution order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.rule_id()).collect()
    }

    fn rules_for(
        &self,
        context: ValidationContext,
    ) -> impl Iterator<Item = &Box<dyn ValidationRule>> + '_ {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(context))
    }

    fn input<'a>(&'a self, ranks: &'a [RankHierarchy]) -> RuleInput<'a> {
        RuleInput::new(ranks, self.catalog())
    }

    /// Run every list-capable rule registered for `context`.
    pub fn validate_ranks(
        &self,
        ranks: &[RankHierarchy],
        context: ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new(context);
        if ranks.is_empty() {
            return result;
        }
        let input = self.input(ranks);
        for rule in self.rules_for(context) {
            let Some(validator) = rule.as_list_validator() else {
                continue;
            };
            let issues = validator.validate_list(&input);
            debug!(rule = rule.rule_id(), issues = issues.len(), "rule finished");
            result.issues.extend(issues);
        }
        info!(
            context = %context,
            errors = result.error_count(),
            warnings = result.warning_count(),
            advisories = result.advisory_count(),
            "validation complete"
        );
        result
    }

    /// Run rank-capable rules for one rank (with its pay bands), using the
    /// whole list for sibling checks. Only issues about that rank are kept.
    pub fn validate_single_rank(
        &self,
        rank: &RankHierarchy,
        ranks: &[RankHierarchy],
        context: ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new(context);
        let input = self.input(ranks);
        for rule in self.rules_for(context) {
            let Some(validator) = rule.as_rank_validator() else {
                continue;
            };
            result.issues.extend(
                validator
                    .validate_rank(rank, &input)
                    .into_iter()
                    .filter(|issue| is_in_scope(issue, rank)),
            );
        }
        debug!(rank = %rank.name, issues = result.len(), "rank validated");
        result
    }

    /// Check a value before it is committed. Always runs the real-time rule
    /// subset.
    pub fn validate_property(
        &self,
        rank: &RankHierarchy,
        property_name: &str,
        value: &str,
        ranks: &[RankHierarchy],
    ) -> ValidationResult {
        let context = ValidationContext::RealTime;
        let mut result = ValidationResult::new(context);
        let input = self.input(ranks);
        for rule in self.rules_for(context) {
            if let Some(validator) = rule.as_property_validator() {
                result.issues.extend(validator.validate_property(
                    rank,
                    property_name,
                    value,
                    &input,
                ));
            }
        }
        result
    }
}
