//! The command contract shared by every reversible edit.

use std::fmt;
use std::rc::Rc;

use rank_model::{RankHierarchy, RankId};

use crate::error::EditError;

/// A reversible mutation of the rank list.
///
/// `execute` applies the edit, `undo` reverses it exactly. A command can go
/// through execute/undo any number of times. Entities are located by id on
/// every call, never through cached references.
pub trait UndoRedoCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError>;

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError>;

    /// Fixed at construction, so it still reads correctly after the target
    /// is renamed or removed.
    fn description(&self) -> &str;
}

impl fmt::Debug for dyn UndoRedoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UndoRedoCommand")
            .field(&self.description())
            .finish()
    }
}

/// Where a command is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Constructed,
    Executed,
    Undone,
}

impl CommandState {
    pub(crate) fn ensure_executable(self, command: &str) -> Result<(), EditError> {
        match self {
            Self::Constructed | Self::Undone => Ok(()),
            Self::Executed => Err(EditError::InvalidState {
                command: command.to_string(),
                action: "execute",
                state: self,
            }),
        }
    }

    pub(crate) fn ensure_undoable(self, command: &str) -> Result<(), EditError> {
        match self {
            Self::Executed => Ok(()),
            Self::Constructed | Self::Undone => Err(EditError::InvalidState {
                command: command.to_string(),
                action: "undo",
                state: self,
            }),
        }
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Constructed => "constructed",
            Self::Executed => "executed",
            Self::Undone => "undone",
        })
    }
}

/// The two notifications every command fires after execute and undo: one
/// to refresh the view, one to mark the document dirty.
#[derive(Clone)]
pub struct CommandCallbacks {
    refresh: Rc<dyn Fn()>,
    data_changed: Rc<dyn Fn()>,
}

impl CommandCallbacks {
    pub fn new(refresh: impl Fn() + 'static, data_changed: impl Fn() + 'static) -> Self {
        Self {
            refresh: Rc::new(refresh),
            data_changed: Rc::new(data_changed),
        }
    }

    /// Callbacks that do nothing, for headless use.
    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }

    pub(crate) fn notify(&self) {
        (self.refresh)();
        (self.data_changed)();
    }
}

impl fmt::Debug for CommandCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCallbacks").finish_non_exhaustive()
    }
}

/// `"1 vehicle"`, `"3 vehicles"`.
pub(crate) fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Locate a top-level rank at execute/undo time.
pub(crate) fn top_level_mut<'a>(
    ranks: &'a mut [RankHierarchy],
    id: &RankId,
    command: &str,
) -> Result<&'a mut RankHierarchy, EditError> {
    ranks
        .iter_mut()
        .find(|rank| rank.id() == id)
        .ok_or_else(|| EditError::missing_rank(command, id))
}

/// Locate a top-level rank at construction time.
pub(crate) fn top_level<'a>(
    ranks: &'a [RankHierarchy],
    id: &RankId,
) -> Result<&'a RankHierarchy, EditError> {
    ranks
        .iter()
        .find(|rank| rank.id() == id)
        .ok_or_else(|| EditError::unknown_rank(id))
}
