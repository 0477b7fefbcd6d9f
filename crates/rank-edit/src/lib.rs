//! Reversible editing of rank hierarchies.
//!
//! Every structural edit is a [`UndoRedoCommand`]; the [`UndoRedoManager`]
//! executes them and keeps the bounded undo and redo stacks. The rank list
//! is passed explicitly to every call.

pub mod bulk;
pub mod command;
pub mod composite;
pub mod error;
pub mod manager;
pub mod pay_band;
pub mod rank;

pub use bulk::{
    AddOutfitsCommand, AddStationsCommand, AddVehiclesCommand, BulkAddCommand,
    BulkRemoveCommand, ItemCollection, ItemScope, Outfits, RemoveOutfitsCommand,
    RemoveStationsCommand, RemoveVehiclesCommand, Stations, Vehicles,
};
pub use command::{CommandCallbacks, CommandState, UndoRedoCommand};
pub use composite::CompositeCommand;
pub use error::EditError;
pub use manager::{DEFAULT_UNDO_DEPTH, UndoRedoManager};
pub use pay_band::{
    AddPayBandCommand, ClonePayBandCommand, MovePayBandCommand, PromotePayBandCommand,
    RemovePayBandCommand,
};
pub use rank::{
    AddRankCommand, CloneRankCommand, MoveRankCommand, RankEdit, RemoveRankCommand,
    SetRankPropertyCommand,
};
