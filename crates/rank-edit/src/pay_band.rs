//! Commands over a parent rank's pay bands.
//!
//! Every structural change here renumbers the parent's surviving bands and
//! resyncs its parent flag, on execute and on undo alike.

use tracing::debug;

use rank_model::{RankHierarchy, RankId, find_rank, top_level_index};

use crate::command::{CommandCallbacks, CommandState, UndoRedoCommand, top_level, top_level_mut};
use crate::error::EditError;

/// Resolve a pay band and its parent id at construction time.
fn band_and_parent<'a>(
    ranks: &'a [RankHierarchy],
    band_id: &RankId,
) -> Result<(&'a RankHierarchy, RankId), EditError> {
    let band = find_rank(ranks, band_id).ok_or_else(|| EditError::unknown_rank(band_id))?;
    let parent_id = band
        .parent_id()
        .cloned()
        .ok_or_else(|| EditError::InvalidArgument(format!("'{}' is not a pay band", band.name)))?;
    top_level(ranks, &parent_id)?;
    Ok((band, parent_id))
}

/// Insert a new pay band under a rank.
#[derive(Debug)]
pub struct AddPayBandCommand {
    parent_id: RankId,
    band_id: RankId,
    pending: Option<RankHierarchy>,
    index: usize,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl AddPayBandCommand {
    /// The band is seeded from the parent's current threshold and salary.
    /// `index` past the end appends.
    pub fn new(
        ranks: &[RankHierarchy],
        parent_id: RankId,
        index: usize,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let parent = top_level(ranks, &parent_id)?;
        let band = parent.make_pay_band();
        Ok(Self {
            description: format!("Add pay band to '{}'", parent.name),
            band_id: band.id().clone(),
            pending: Some(band),
            parent_id,
            index,
            state: CommandState::Constructed,
            callbacks,
        })
    }

    pub fn band_id(&self) -> &RankId {
        &self.band_id
    }
}

impl UndoRedoCommand for AddPayBandCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let band = self
            .pending
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "no detached pay band"))?;
        let index = parent.insert_pay_band(self.index, band);
        parent.renumber_pay_bands();
        debug!(command = %self.description, index, "pay band inserted");
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let (_, band) = parent
            .remove_pay_band(&self.band_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.band_id))?;
        parent.renumber_pay_bands();
        self.pending = Some(band);
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Remove one pay band from its parent.
#[derive(Debug)]
pub struct RemovePayBandCommand {
    parent_id: RankId,
    band_id: RankId,
    removed: Option<(usize, RankHierarchy)>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl RemovePayBandCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        band_id: RankId,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let (band, parent_id) = band_and_parent(ranks, &band_id)?;
        Ok(Self {
            description: format!("Remove pay band '{}'", band.name),
            parent_id,
            band_id,
            removed: None,
            state: CommandState::Constructed,
            callbacks,
        })
    }
}

impl UndoRedoCommand for RemovePayBandCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let removed = parent
            .remove_pay_band(&self.band_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.band_id))?;
        parent.renumber_pay_bands();
        debug!(command = %self.description, index = removed.0, "pay band removed");
        self.removed = Some(removed);
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let (index, band) = self
            .removed
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "removed pay band was lost"))?;
        parent.insert_pay_band(index, band);
        parent.renumber_pay_bands();
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Reorder a pay band within its parent.
#[derive(Debug)]
pub struct MovePayBandCommand {
    parent_id: RankId,
    band_id: RankId,
    target_index: usize,
    original_index: Option<usize>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl MovePayBandCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        band_id: RankId,
        target_index: usize,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let (band, parent_id) = band_and_parent(ranks, &band_id)?;
        Ok(Self {
            description: format!("Move pay band '{}'", band.name),
            parent_id,
            band_id,
            target_index,
            original_index: None,
            state: CommandState::Constructed,
            callbacks,
        })
    }

    fn relocate(&self, ranks: &mut [RankHierarchy], to: usize) -> Result<usize, EditError> {
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let (from, band) = parent
            .remove_pay_band(&self.band_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.band_id))?;
        parent.insert_pay_band(to, band);
        parent.renumber_pay_bands();
        Ok(from)
    }
}

impl UndoRedoCommand for MovePayBandCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let from = self.relocate(ranks, self.target_index)?;
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
        self.relocate(ranks, original)?;
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Insert a copy of a pay band right after it, under the same parent.
#[derive(Debug)]
pub struct ClonePayBandCommand {
    parent_id: RankId,
    source_id: RankId,
    clone_id: RankId,
    pending: Option<RankHierarchy>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl ClonePayBandCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        band_id: RankId,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let (band, parent_id) = band_and_parent(ranks, &band_id)?;
        let copy = band.clone_rank();
        Ok(Self {
            description: format!("Clone pay band '{}'", band.name),
            parent_id,
            source_id: band_id,
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

impl UndoRedoCommand for ClonePayBandCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let source_index = parent
            .pay_band_index(&self.source_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.source_id))?;
        let copy = self
            .pending
            .take()
            .ok_or_else(|| EditError::integrity(&self.description, "no detached copy"))?;
        parent.insert_pay_band(source_index + 1, copy);
        parent.renumber_pay_bands();
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        let (_, copy) = parent
            .remove_pay_band(&self.clone_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.clone_id))?;
        parent.renumber_pay_bands();
        self.pending = Some(copy);
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Lift a pay band out of its parent into a standalone rank placed right
/// after the parent.
#[derive(Debug)]
pub struct PromotePayBandCommand {
    parent_id: RankId,
    band_id: RankId,
    band_index: Option<usize>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
}

impl PromotePayBandCommand {
    pub fn new(
        ranks: &[RankHierarchy],
        band_id: RankId,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let (band, parent_id) = band_and_parent(ranks, &band_id)?;
        Ok(Self {
            description: format!("Promote pay band '{}' to rank", band.name),
            parent_id,
            band_id,
            band_index: None,
            state: CommandState::Constructed,
            callbacks,
        })
    }
}

impl UndoRedoCommand for PromotePayBandCommand {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let parent_index = top_level_index(ranks, &self.parent_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.parent_id))?;
        let parent = &mut ranks[parent_index];
        let (band_index, mut band) = parent
            .remove_pay_band(&self.band_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.band_id))?;
        parent.renumber_pay_bands();
        band.promote_to_parent();
        ranks.insert(parent_index + 1, band);
        debug!(command = %self.description, band_index, "pay band promoted");
        self.band_index = Some(band_index);
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let band_index = self
            .band_index
            .ok_or_else(|| EditError::integrity(&self.description, "original position unknown"))?;
        let promoted_index = top_level_index(ranks, &self.band_id)
            .ok_or_else(|| EditError::missing_rank(&self.description, &self.band_id))?;
        // resolve the parent before detaching anything
        top_level_mut(ranks, &self.parent_id, &self.description)?;
        let mut band = ranks.remove(promoted_index);
        band.demote_to_pay_band(self.parent_id.clone());
        let parent = top_level_mut(ranks, &self.parent_id, &self.description)?;
        parent.insert_pay_band(band_index, band);
        parent.renumber_pay_bands();
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
