use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A vehicle as referenced by ranks and the catalog.
///
/// Identity is the model key, compared without regard to ASCII case; the
/// remaining fields are display data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vehicle {
    pub model: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub agencies: Vec<String>,
}

impl Vehicle {
    pub fn new(model: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Name shown to users, falling back to the model key.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.model
        } else {
            &self.display_name
        }
    }

    pub fn belongs_to(&self, agency: &str) -> bool {
        self.agencies
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(agency))
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.model.eq_ignore_ascii_case(&other.model)
    }
}

impl Eq for Vehicle {}

impl Hash for Vehicle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.model.to_ascii_lowercase().hash(state);
    }
}
