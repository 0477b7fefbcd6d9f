//! Validation issue types.
//!
//! Issues are plain data: rules build them, the service aggregates them and
//! the caller decides how to present them. Nothing here mutates the model
//! except an [`AutoFix`], and only when the caller applies it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rank_model::{RankHierarchy, RankId};

/// Issue severity, ordered from least to most severe.
///
/// `None` and `Success` are sentinels for "nothing to report"; rules never
/// emit them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    #[default]
    None,
    Success,
    /// Non-blocking hint
    Advisory,
    /// Should review
    Warning,
    /// Must fix before generating
    Error,
}

impl ValidationSeverity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Some(Self::None),
            "success" => Some(Self::Success),
            "advisory" => Some(Self::Advisory),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Success => "Success",
            Self::Advisory => "Advisory",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Whether an issue of this severity is worth reporting at all.
    pub fn is_issue(&self) -> bool {
        *self >= Self::Advisory
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What part of the document an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    Structure,
    Progression,
    Reference,
    Advisory,
}

impl IssueCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Progression => "Progression",
            Self::Reference => "Reference",
            Self::Advisory => "Advisory",
        }
    }
}

/// An opt-in remediation attached to an issue.
///
/// The action receives the rank list explicitly. Validation never runs it;
/// the caller applies it (typically wrapped in an undoable edit) and then
/// validates again.
#[derive(Clone)]
pub struct AutoFix {
    label: String,
    action: Arc<dyn Fn(&mut Vec<RankHierarchy>) + Send + Sync>,
}

impl AutoFix {
    pub fn new(
        label: impl Into<String>,
        action: impl Fn(&mut Vec<RankHierarchy>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            action: Arc::new(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn apply(&self, ranks: &mut Vec<RankHierarchy>) {
        (self.action)(ranks);
    }
}

impl fmt::Debug for AutoFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoFix")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub category: IssueCategory,
    pub rank_name: Option<String>,
    pub rank_id: Option<RankId>,
    /// Station, vehicle or outfit the issue is about.
    pub item_name: Option<String>,
    pub message: String,
    /// Set for property-scoped issues.
    pub property_name: Option<String>,
    pub rule_id: String,
    pub suggested_fix: Option<String>,
    #[serde(skip)]
    pub auto_fix: Option<AutoFix>,
}

impl ValidationIssue {
    pub fn new(
        rule_id: &str,
        severity: ValidationSeverity,
        category: IssueCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            rank_name: None,
            rank_id: None,
            item_name: None,
            message: message.into(),
            property_name: None,
            rule_id: rule_id.to_string(),
            suggested_fix: None,
            auto_fix: None,
        }
    }

    pub fn for_rank(mut self, rank: &RankHierarchy) -> Self {
        self.rank_name = Some(rank.name.clone());
        self.rank_id = Some(rank.id().clone());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item_name = Some(item.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property_name = Some(property.into());
        self
    }

    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_auto_fix(mut self, fix: AutoFix) -> Self {
        self.auto_fix = Some(fix);
        self
    }

    pub fn can_auto_fix(&self) -> bool {
        self.auto_fix.is_some()
    }

    /// Key under which a user can silence this issue, if it is tied to a rank.
    pub fn dismissal_key(&self) -> Option<DismissalKey> {
        let rank_id = self.rank_id.clone()?;
        Some(DismissalKey {
            rank_id,
            rule_id: self.rule_id.clone(),
            item_name: self.item_name.clone().unwrap_or_default(),
        })
    }
}

/// Identity of a silenced issue: stable rank id, rule id and item name, so
/// the dismissal survives renames.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DismissalKey {
    pub rank_id: RankId,
    pub rule_id: String,
    #[serde(default)]
    pub item_name: String,
}

/// The set of issues a user chose to silence.
///
/// Errors are never filtered out; only warnings and advisories can be
/// dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissedIssues {
    keys: BTreeSet<DismissalKey>,
}

impl DismissedIssues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key was already dismissed.
    pub fn dismiss(&mut self, key: DismissalKey) -> bool {
        self.keys.insert(key)
    }

    /// Dismiss an issue in place. Issues not tied to a rank, and errors,
    /// cannot be dismissed.
    pub fn dismiss_issue(&mut self, issue: &ValidationIssue) -> bool {
        if issue.severity >= ValidationSeverity::Error {
            return false;
        }
        match issue.dismissal_key() {
            Some(key) => self.dismiss(key),
            None => false,
        }
    }

    pub fn restore(&mut self, key: &DismissalKey) -> bool {
        self.keys.remove(key)
    }

    pub fn is_dismissed(&self, issue: &ValidationIssue) -> bool {
        issue.severity < ValidationSeverity::Error
            && issue
                .dismissal_key()
                .is_some_and(|key| self.keys.contains(&key))
    }

    /// Drop dismissed issues, keeping the order of the rest.
    pub fn filter(&self, issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
        issues
            .into_iter()
            .filter(|issue| !self.is_dismissed(issue))
            .collect()
    }

    /// Forget dismissals for ranks that no longer exist.
    pub fn retain_ranks(&mut self, ranks: &[RankHierarchy]) {
        let live: BTreeSet<&RankId> = rank_model::walk_ranks(ranks)
            .into_iter()
            .map(RankHierarchy::id)
            .collect();
        self.keys.retain(|key| live.contains(&key.rank_id));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
