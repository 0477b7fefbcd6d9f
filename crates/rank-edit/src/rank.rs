//! Commands over the top-level rank list.

use tracing::debug;

use rank_model::{
    RankHierarchy, RankId, find_rank, find_rank_mut, top_level_index, walk_ranks,
};

use crate::command::{CommandCallbacks, CommandState, UndoRedoCommand, count_noun, top_level};
use crate::error::EditError;

/// Insert a new top-level rank.
#[derive(Debug)]
pub struct AddRankCommand {
    rank_id: RankId,
    pending: Option<RankHierarchy>,
    index: usize,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl AddRankCommand {
    /// `index` past the end of the list appends.
    pub fn new(
        ranks: &[RankHierarchy],
        rank: RankHierarchy,
        index: usize,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let clashes = walk_ranks(ranks).into_iter().any(|existing| {
            existing.id() == rank.id()
                || rank
                    .pay_bands()
                    .iter()
                    .any(|band| band.id() == existing.id())
        });
        if clashes {
            return Err(EditError::InvalidArgument(format!(
                "'{}' is already in the list; add a copy made with clone_rank",
                rank.name
            )));
        }
        if rank.is_pay_band() {
            return Err(EditError::InvalidArgument(format!(
                "'{}' is a pay band; add it through its parent",
                rank.name
            )));
        }
        Ok(Self {
            rank_id: rank.id().clone(),
            description: format!("Add rank '{}'", rank.name),
            pending: Some(rank),
            index,
            state: CommandState::Constructed,
            callbacks,
        })
    }

    pub fn rank_id(&self) -> &RankId {
        &self.rank_id
    }
}

impl UndoRedoCommand for AddRankCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let rank = self
            .pending
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "no detached rank to add"))?;
        let index = self.index.min(ranks.len());
        ranks.insert(index, rank);
        debug!(command = %self.description, index, "rank inserted");
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let index = top_level_index(ranks, &self.rank_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.rank_id))?;
        self.pending = Some(ranks.remove(index));
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Remove a top-level rank together with any pay bands it owns.
#[derive(Debug)]
pub struct RemoveRankCommand {
    rank_id: RankId,
    removed: Option<(usize, RankHierarchy)>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl RemoveRankCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        rank_id: RankId,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let rank = top_level(ranks, &rank_id)?;
        let description = match rank.pay_bands().len() {
            0 => format!("Remove rank '{}'", rank.name),
            bands => format!(
                "Remove rank '{}' and {}",
                rank.name,
                count_noun(bands, "pay band", "pay bands")
            ),
        };
        Ok(Self {
            rank_id,
            removed: None,
            description,
            state: CommandState::Constructed,
            callbacks,
        })
    }
}

impl UndoRedoCommand for RemoveRankCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let index = top_level_index(ranks, &self.rank_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.rank_id))?;
        let rank = ranks.remove(index);
        debug!(command = %self.description, index, "rank removed");
        self.removed = Some((index, rank));
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let (index, rank) = self
            .removed
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "removed rank was lost"))?;
        ranks.insert(index.min(ranks.len()), rank);
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Move a top-level rank to another position.
#[derive(Debug)]
pub struct MoveRankCommand {
    rank_id: RankId,
    target_index: usize,
    original_index: Option<usize>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl MoveRankCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        rank_id: RankId,
        target_index: usize,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let rank = top_level(ranks, &rank_id)?;
        let position = target_index.min(ranks.len().saturating_sub(1)) + 1;
        Ok(Self {
            description: format!("Move rank '{}' to position {position}", rank.name),
            rank_id,
            target_index,
            original_index: None,
            state: CommandState::Constructed,
            callbacks,
        })
    }
}

fn relocate(
    ranks: &mut Vec<RankHierarchy>,
    id: &RankId,
    to: usize,
    command: &str,
) -> Result<usize, EditError> {
    let from =
        top_level_index(ranks, id).ok_or_else(|| EditError::missing_rank(command, id))?;
    let rank = ranks.remove(from);
    ranks.insert(to.min(ranks.len()), rank);
    Ok(from)
}

impl UndoRedoCommand for MoveRankCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let from = relocate(ranks, &self.rank_id, self.target_index, &self.description)?;
        debug!(command = %self.description, from, to = self.target_index, "rank moved");
        self.original_index = Some(from);
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let original = self
            .original_index
            .ok_or_else(|| EditError::integrity(&self.description, "original position unknown"))?;
        relocate(ranks, &self.rank_id, original, &self.description)?;
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Insert a deep copy of a top-level rank right after it.
#[derive(Debug)]
pub struct CloneRankCommand {
    source_id: RankId,
    clone_id: RankId,
    pending: Option<RankHierarchy>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl CloneRankCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        source_id: RankId,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let source = top_level(ranks, &source_id)?;
        let copy = source.clone_rank();
        Ok(Self {
            description: format!("Clone rank '{}'", source.name),
            source_id,
            clone_id: copy.id().clone(),
            pending: Some(copy),
            state: CommandState::Constructed,
            callbacks,
        })
    }

    pub fn clone_id(&self) -> &RankId {
        &self.clone_id
    }
}

impl UndoRedoCommand for CloneRankCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let source_index = top_level_index(ranks, &self.source_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.source_id))?;
        let copy = self
            .pending
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "no detached copy to insert"))?;
        ranks.insert(source_index + 1, copy);
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let index = top_level_index(ranks, &self.clone_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.clone_id))?;
        self.pending = Some(ranks.remove(index));
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// A single scalar edit. Pay bands take threshold and salary edits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankEdit {
    Name(String),
    RequiredPoints(i64),
    Salary(i64),
}

impl RankEdit {
    fn read(rank: &RankHierarchy, like: &RankEdit) -> RankEdit {
        match like {
            RankEdit::Name(_) => RankEdit::Name(rank.name.clone()),
            RankEdit::RequiredPoints(_) => RankEdit::RequiredPoints(rank.required_points),
            RankEdit::Salary(_) => RankEdit::Salary(rank.salary),
        }
    }

    fn apply(&self, rank: &mut RankHierarchy) {
        match self {
            RankEdit::Name(name) => {
                rank.name = name.clone();
                // band names are derived from the parent name
                if rank.is_parent() {
                    rank.renumber_pay_bands();
                }
            }
            RankEdit::RequiredPoints(points) => rank.required_points = *points,
            RankEdit::Salary(salary) => rank.salary = *salary,
        }
    }
}

/// Change the name, threshold or salary of a rank, or the threshold or
/// salary of a pay band.
#[derive(Debug)]
pub struct SetRankPropertyCommand {
    rank_id: RankId,
    new_value: RankEdit,
    old_value: RankEdit,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl SetRankPropertyCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        rank_id: RankId,
        edit: RankEdit,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let rank = find_rank(ranks, &rank_id).ok_or_else(|| EditError::unknown_rank(&rank_id))?;
        if rank.is_pay_band() && matches!(edit, RankEdit::Name(_)) {
            return Err(EditError::InvalidArgument(format!(
                "'{}' is a pay band; its name follows its parent",
                rank.name
            )));
        }
        let description = match &edit {
            RankEdit::Name(name) => format!("Rename '{}' to '{name}'", rank.name),
            RankEdit::RequiredPoints(points) => {
                format!("Set required points of '{}' to {points}", rank.name)
            }
            RankEdit::Salary(salary) => format!("Set salary of '{}' to {salary}", rank.name),
        };
        Ok(Self {
            old_value: RankEdit::read(rank, &edit),
            new_value: edit,
            rank_id,
            description,
            state: CommandState::Constructed,
            callbacks,
        })
    }
}

impl UndoRedoCommand for SetRankPropertyCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let rank = find_rank_mut(ranks, &self.rank_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.rank_id))?;
        self.new_value.apply(rank);
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let rank = find_rank_mut(ranks, &self.rank_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.rank_id))?;
        self.old_value.apply(rank);
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
