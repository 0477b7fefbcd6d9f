//! Bulk add/remove of stations, vehicles and outfits.
//!
//! One user gesture can touch many items. The commands store exactly which
//! items they affected, so undo applies the complement to that list instead
//! of recomputing it.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use rank_model::{RankHierarchy, RankId, StationAssignment, Vehicle, find_rank, find_rank_mut};

use crate::command::{CommandCallbacks, CommandState, UndoRedoCommand, count_noun};
use crate::error::EditError;

/// Which list of a rank an item command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemScope {
    /// The rank-global list.
    Rank,
    /// The override list of one station assignment, by station name.
    Station(String),
}

impl ItemScope {
    fn station<'a>(
        rank: &'a RankHierarchy,
        name: &str,
    ) -> Option<&'a StationAssignment> {
        let key = normalize_key(name);
        rank.stations.iter().find(|station| station.key() == key)
    }

    fn station_mut<'a>(
        rank: &'a mut RankHierarchy,
        name: &str,
    ) -> Option<&'a mut StationAssignment> {
        let key = normalize_key(name);
        rank.stations.iter_mut().find(|station| station.key() == key)
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A kind of item list that bulk commands can edit.
pub trait ItemCollection {
    type Item: Clone + fmt::Debug;

    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    /// Normalized identity used to detect duplicates and find items again.
    fn key(item: &Self::Item) -> String;

    fn items<'a>(rank: &'a RankHierarchy, scope: &ItemScope) -> Option<&'a [Self::Item]>;

    fn items_mut<'a>(
        rank: &'a mut RankHierarchy,
        scope: &ItemScope,
    ) -> Option<&'a mut Vec<Self::Item>>;
}

/// Station assignments of a rank. Only [`ItemScope::Rank`] applies.
#[derive(Debug)]
pub struct Stations;

impl ItemCollection for Stations {
    type Item = StationAssignment;

    const SINGULAR: &'static str = "station";
    const PLURAL: &'static str = "stations";

    fn key(item: &StationAssignment) -> String {
        item.key()
    }

    fn items<'a>(rank: &'a RankHierarchy, scope: &ItemScope) -> Option<&'a [StationAssignment]> {
        match scope {
            ItemScope::Rank => Some(rank.stations.as_slice()),
            ItemScope::Station(_) => None,
        }
    }

    fn items_mut<'a>(
        rank: &'a mut RankHierarchy,
        scope: &ItemScope,
    ) -> Option<&'a mut Vec<StationAssignment>> {
        match scope {
            ItemScope::Rank => Some(&mut rank.stations),
            ItemScope::Station(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Vehicles;

impl ItemCollection for Vehicles {
    type Item = Vehicle;

    const SINGULAR: &'static str = "vehicle";
    const PLURAL: &'static str = "vehicles";

    fn key(item: &Vehicle) -> String {
        normalize_key(&item.model)
    }

    fn items<'a>(rank: &'a RankHierarchy, scope: &ItemScope) -> Option<&'a [Vehicle]> {
        match scope {
            ItemScope::Rank => Some(rank.vehicles.as_slice()),
            ItemScope::Station(name) => {
                ItemScope::station(rank, name).map(|station| station.vehicles.as_slice())
            }
        }
    }

    fn items_mut<'a>(
        rank: &'a mut RankHierarchy,
        scope: &ItemScope,
    ) -> Option<&'a mut Vec<Vehicle>> {
        match scope {
            ItemScope::Rank => Some(&mut rank.vehicles),
            ItemScope::Station(name) => {
                ItemScope::station_mut(rank, name).map(|station| &mut station.vehicles)
            }
        }
    }
}

/// Outfit combined names (`"Outfit.Variation"`).
#[derive(Debug)]
pub struct Outfits;

impl ItemCollection for Outfits {
    type Item = String;

    const SINGULAR: &'static str = "outfit";
    const PLURAL: &'static str = "outfits";

    fn key(item: &String) -> String {
        normalize_key(item)
    }

    fn items<'a>(rank: &'a RankHierarchy, scope: &ItemScope) -> Option<&'a [String]> {
        match scope {
            ItemScope::Rank => Some(rank.outfits.as_slice()),
            ItemScope::Station(name) => {
                ItemScope::station(rank, name).map(|station| station.outfits.as_slice())
            }
        }
    }

    fn items_mut<'a>(
        rank: &'a mut RankHierarchy,
        scope: &ItemScope,
    ) -> Option<&'a mut Vec<String>> {
        match scope {
            ItemScope::Rank => Some(&mut rank.outfits),
            ItemScope::Station(name) => {
                ItemScope::station_mut(rank, name).map(|station| &mut station.outfits)
            }
        }
    }
}

pub type AddStationsCommand = BulkAddCommand<Stations>;
pub type RemoveStationsCommand = BulkRemoveCommand<Stations>;
pub type AddVehiclesCommand = BulkAddCommand<Vehicles>;
pub type RemoveVehiclesCommand = BulkRemoveCommand<Vehicles>;
pub type AddOutfitsCommand = BulkAddCommand<Outfits>;
pub type RemoveOutfitsCommand = BulkRemoveCommand<Outfits>;

fn scope_suffix(scope: &ItemScope) -> String {
    match scope {
        ItemScope::Rank => String::new(),
        ItemScope::Station(name) => format!(" at {name}"),
    }
}

fn existing_items<'a, C: ItemCollection>(
    ranks: &'a [RankHierarchy],
    rank_id: &RankId,
    scope: &ItemScope,
) -> Result<(&'a RankHierarchy, &'a [C::Item]), EditError> {
    let rank = find_rank(ranks, rank_id).ok_or_else(|| EditError::unknown_rank(rank_id))?;
    let items = C::items(rank, scope).ok_or_else(|| {
        EditError::InvalidArgument(format!(
            "'{}' has no {} list for {scope:?}",
            rank.name,
            C::SINGULAR
        ))
    })?;
    Ok((rank, items))
}

fn live_items<'a, C: ItemCollection>(
    ranks: &'a mut [RankHierarchy],
    rank_id: &RankId,
    scope: &ItemScope,
    command: &str,
) -> Result<&'a mut Vec<C::Item>, EditError> {
    let rank =
        find_rank_mut(ranks, rank_id).ok_or_else(|| EditError::missing_rank(command, rank_id))?;
    C::items_mut(rank, scope)
        .ok_or_else(|| EditError::integrity(command, format!("{scope:?} list not found")))
}

/// Append items that are not already present.
pub struct BulkAddCommand<C: ItemCollection> {
    rank_id: RankId,
    scope: ItemScope,
    items: Vec<C::Item>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
    collection: PhantomData<C>,
}

impl<C: ItemCollection> BulkAddCommand<C> {
    /// Candidates already in the target list (or repeated in `candidates`)
    /// are dropped; the command fails when nothing is left to add.
    pub fn new(
        ranks: &[RankHierarchy],
        rank_id: RankId,
        scope: ItemScope,
        candidates: Vec<C::Item>,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError> {
        let (rank, existing) = existing_items::<C>(ranks, &rank_id, &scope)?;
        // Only pay bands reach the generated document.
        if rank.is_parent() {
            return Err(EditError::InvalidArgument(format!(
                "'{}' has pay bands; assign {} to its pay bands instead",
                rank.name,
                C::PLURAL
            )));
        }
        let mut seen: HashSet<String> = existing.iter().map(C::key).collect();
        let items: Vec<C::Item> = candidates
            .into_iter()
            .filter(|item| seen.insert(C::key(item)))
            .collect();
        if items.is_empty() {
            return Err(EditError::InvalidArgument(format!(
                "every {} is already assigned to '{}'",
                C::SINGULAR,
                rank.name
            )));
        }
        let description = format!(
            "Add {} to '{}'{}",
            count_noun(items.len(), C::SINGULAR, C::PLURAL),
            rank.name,
            scope_suffix(&scope)
        );
        Ok(Self {
            rank_id,
            scope,
            items,
            description,
            state: CommandState::Constructed,
            callbacks,
            collection: PhantomData,
        })
    }

    pub fn items(&self) -> &[C::Item] {
        &self.items
    }
}

impl<C: ItemCollection> fmt::Debug for BulkAddCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAddCommand")
            .field("rank_id", &self.rank_id)
            .field("scope", &self.scope)
            .field("items", &self.items)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C: ItemCollection> UndoRedoCommand for BulkAddCommand<C> {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let list = live_items::<C>(ranks, &self.rank_id, &self.scope, &self.description)?;
        list.extend(self.items.iter().cloned());
        debug!(command = %self.description, count = self.items.len(), "items added");
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let list = live_items::<C>(ranks, &self.rank_id, &self.scope, &self.description)?;
        // verify everything first so a failure leaves the list untouched
        let mut positions = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let key = C::key(item);
            let position = list
                .iter()
                .rposition(|candidate| C::key(candidate) == key)
                .ok_or_else(|| {
                    EditError::integrity(&self.description, format!("{key} is no longer assigned"))
                })?;
            positions.push(position);
        }
        positions.sort_unstable();
        for position in positions.into_iter().rev() {
            list.remove(position);
        }
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Remove items by key, remembering where each one was.
pub struct BulkRemoveCommand<C: ItemCollection> {
    rank_id: RankId,
    scope: ItemScope,
    keys: Vec<String>,
    removed: Vec<(usize, C::Item)>,
    description: String,
    state: CommandState,
    callbacks: CommandCallbacks,
    collection: PhantomData<C>,
}

impl<C: ItemCollection> BulkRemoveCommand<C> {
    /// `keys` are station names, vehicle models or outfit combined names,
    /// matched without regard to case. Keys that match nothing are ignored;
    /// the command fails when none match.
    pub fn new<I, S>(
        ranks: &[RankHierarchy],
        rank_id: RankId,
        scope: ItemScope,
        keys: I,
        callbacks: CommandCallbacks,
    ) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (rank, existing) = existing_items::<C>(ranks, &rank_id, &scope)?;
        let present: HashSet<String> = existing.iter().map(C::key).collect();
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .into_iter()
            .map(|key| normalize_key(key.as_ref()))
            .filter(|key| present.contains(key) && seen.insert(key.clone()))
            .collect();
        if keys.is_empty() {
            return Err(EditError::InvalidArgument(format!(
                "no matching {} assigned to '{}'",
                C::PLURAL,
                rank.name
            )));
        }
        let description = format!(
            "Remove {} from '{}'{}",
            count_noun(keys.len(), C::SINGULAR, C::PLURAL),
            rank.name,
            scope_suffix(&scope)
        );
        Ok(Self {
            rank_id,
            scope,
            keys,
            removed: Vec::new(),
            description,
            state: CommandState::Constructed,
            callbacks,
            collection: PhantomData,
        })
    }
}

impl<C: ItemCollection> fmt::Debug for BulkRemoveCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkRemoveCommand")
            .field("rank_id", &self.rank_id)
            .field("scope", &self.scope)
            .field("keys", &self.keys)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C: ItemCollection> UndoRedoCommand for BulkRemoveCommand<C> {
    fn execute(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_executable(&self.description)?;
        let list = live_items::<C>(ranks, &self.rank_id, &self.scope, &self.description)?;
        if let Some(missing) = self
            .keys
            .iter()
            .find(|key| !list.iter().any(|item| &C::key(item) == *key))
        {
            return Err(EditError::integrity(
                &self.description,
                format!("{missing} is no longer assigned"),
            ));
        }
        let mut removed = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            if let Some(position) = list.iter().position(|item| &C::key(item) == key) {
                removed.push((position, list.remove(position)));
            }
        }
        debug!(command = %self.description, count = removed.len(), "items removed");
        self.removed = removed;
        self.state = CommandState::Executed;
        self.callbacks.notify();
        Ok(())
    }

    fn undo(&mut self, ranks: &mut Vec<RankHierarchy>) -> Result<(), EditError> {
        self.state.ensure_undoable(&self.description)?;
        let list = live_items::<C>(ranks, &self.rank_id, &self.scope, &self.description)?;
        // positions were recorded one removal at a time, so replay backwards
        for (position, item) in self.removed.drain(..).rev() {
            let position = position.min(list.len());
            list.insert(position, item);
        }
        self.state = CommandState::Undone;
        self.callbacks.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
