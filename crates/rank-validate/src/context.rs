//! Scenarios under which validation runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which rules participate in a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationContext {
    /// Everything, used when loading and before saving.
    Full,
    /// Cheap checks run on every keystroke.
    RealTime,
    /// Only what would corrupt the generated document.
    PreGenerate,
    /// Comprehensive checks that detect on-disk corruption.
    Startup,
    /// Non-blocking hints.
    AdvisoryOnly,
}

impl ValidationContext {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Full,
            Self::RealTime,
            Self::PreGenerate,
            Self::Startup,
            Self::AdvisoryOnly,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "full" => Some(Self::Full),
            "real-time" | "realtime" => Some(Self::RealTime),
            "pre-generate" | "pregenerate" => Some(Self::PreGenerate),
            "startup" => Some(Self::Startup),
            "advisory-only" | "advisoryonly" | "advisory" => Some(Self::AdvisoryOnly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::RealTime => "Real-time",
            Self::PreGenerate => "Pre-generate",
            Self::Startup => "Startup",
            Self::AdvisoryOnly => "Advisory only",
        }
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
