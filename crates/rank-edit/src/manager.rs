//! Bounded undo/redo history.

use std::collections::VecDeque;

use tracing::{debug, warn};

use rank_model::RankHierarchy;

use crate::command::UndoRedoCommand;
use crate::error::EditError;

/// Default number of undo steps kept.
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// Two-stack scheduler over [`UndoRedoCommand`]s.
///
/// The manager knows nothing about what a command does. When a command
/// fails, the error is returned as-is and the command is dropped; the
/// remaining history should be considered unreliable and is best cleared.
#[derive(Debug)]
pub struct UndoRedoManager {
    undo_stack: VecDeque<Box<dyn UndoRedoCommand>>,
    redo_stack: Vec<Box<dyn UndoRedoCommand>>,
    max_depth: usize,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl UndoRedoManager {
    /// A depth of zero is treated as one.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Execute a command and record it. Any redo branch is discarded.
    pub fn execute(
        &mut self,
        command: impl UndoRedoCommand + 'static,
        ranks: &mut Vec<RankHierarchy>,
    ) -> Result<(), EditError> {
        self.execute_boxed(Box::new(command), ranks)
    }

    pub fn execute_boxed(
        &mut self,
        mut command: Box<dyn UndoRedoCommand>,
        ranks: &mut Vec<RankHierarchy>,
    ) -> Result<(), EditError> {
        if let Err(error) = command.execute(ranks) {
            warn!(command = command.description(), %error, "command failed");
            return Err(error);
        }
        debug!(command = command.description(), "command executed");
        self.undo_stack.push_back(command);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.max_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                debug!(command = evicted.description(), "undo history full, dropping oldest");
            }
        }
        Ok(())
    }

    /// Undo the latest command. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<bool, EditError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(error) = command.undo(ranks) {
            warn!(command = command.description(), %error, "undo failed");
            return Err(error);
        }
        debug!(command = command.description(), "command undone");
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Replay the latest undone command. Returns `false` when there was
    /// nothing to redo.
    pub fn redo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<bool, EditError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(error) = command.execute(ranks) {
            warn!(command = command.description(), %error, "redo failed");
            return Err(error);
        }
        debug!(command = command.description(), "command redone");
        self.undo_stack.push_back(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|command| command.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|command| command.description())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
