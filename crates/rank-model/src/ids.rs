use std::fmt;

use uuid::Uuid;

use crate::ModelError;

/// Stable identity of a rank or pay band.
///
/// Ids are assigned once at creation and never recomputed, so anything keyed
/// by them (undo history, dismissed warnings) survives renames.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RankId(String);

impl RankId {
    /// Allocate a fresh, never reused id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidRankId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = RankId::generate();
        let b = RankId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn blank_id_is_rejected() {
        assert!(RankId::new("  ").is_err());
        assert_eq!(RankId::new(" abc ").unwrap().as_str(), "abc");
    }
}
