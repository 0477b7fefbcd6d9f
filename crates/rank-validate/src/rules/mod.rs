//! Default rule set.

pub mod advisory;
pub mod progression;
pub mod reference;
pub mod structure;

pub use advisory::AdvisoryRule;
pub use progression::{ProgressionPolicy, RankProgressionRule};
pub use reference::ReferenceValidationRule;
pub use structure::RankStructureRule;

use crate::rule::ValidationRule;

/// The default rules in execution order. Structural checks come first so a
/// broken node does not surface as misleading reference problems.
pub fn default_rules(policy: ProgressionPolicy) -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(RankStructureRule::new()),
        Box::new(RankProgressionRule::new(policy)),
        Box::new(ReferenceValidationRule::new()),
        Box::new(AdvisoryRule::new()),
    ]
}
