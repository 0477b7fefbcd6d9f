//! Edit error types.

use thiserror::Error;

use rank_model::RankId;

use crate::command::CommandState;

/// Failure of a command constructor or of an execute/undo step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A constructor received something it cannot work with. This is a
    /// programming error in the caller.
    #[error("invalid command argument: {0}")]
    InvalidArgument(String),

    /// An entity the command stored by id is no longer where it expects.
    /// The undo history no longer matches the model and must not be replayed.
    #[error("structural integrity violation in '{command}': {detail}")]
    Integrity { command: String, detail: String },

    /// Execute or undo was called out of order.
    #[error("cannot {action} '{command}' while it is {state}")]
    InvalidState {
        command: String,
        action: &'static str,
        state: CommandState,
    },
}

impl EditError {
    pub(crate) fn missing_rank(command: &str, id: &RankId) -> Self {
        Self::Integrity {
            command: command.to_string(),
            detail: format!("rank {id} not found"),
        }
    }

    pub(crate) fn integrity(command: &str, detail: impl Into<String>) -> Self {
        Self::Integrity {
            command: command.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn unknown_rank(id: &RankId) -> Self {
        Self::InvalidArgument(format!("rank {id} does not exist"))
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}
