use tracing::debug;

use rank_model::RankHierarchy;

use crate::command::{CommandCallbacks, CommandState, UndoRedoCommand};
use crate::error::EditError;

/// Several commands recorded as one undo step.
///
/// Sub-commands run in order and are undone in strict reverse order, since
/// later steps may rely on what earlier ones did.
#[derive(Debug)]
pub struct CompositeCommand {
    commands: Vec<Box<dyn UndoRedoCommand>>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl CompositeCommand {
    pub fn new(
        description: impl Into<String>,
        commands: Vec<Box<dyn UndoRedoCommand>>,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        if commands.is_empty() {
            return Err(EditError::InvalidArgument(
                "a composite command needs at least one step".to_string(),
            ));
        }
        Ok(Self {
            commands,
            description: description.into(),
            state: CommandState::Constructed,
            callbacks,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl UndoRedoCommand for CompositeCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        for command in &mut self.commands {
            debug!(composite = %self.description, step = command.description(), "executing step");
            command.execute(ranks)?;
        }
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        for command in self.commands.iter_mut().rev() {
            debug!(composite = %self.description, step = command.description(), "undoing step");
            command.undo(ranks)?;
        }
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
