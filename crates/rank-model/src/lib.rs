//! Rank hierarchy model shared by the editing, validation and XML crates.

pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod numeral;
pub mod station;
pub mod vehicle;

pub use catalog::{
    Agency, DataCatalog, Outfit, OutfitVariation, Station, combined_outfit_name, load_catalog,
};
pub use error::{ModelError, Result};
pub use hierarchy::{
    COPY_SUFFIX, RankHierarchy, find_rank, find_rank_mut, flatten_ranks,
    resolve_station_references, top_level_index, walk_ranks,
};
pub use ids::RankId;
pub use numeral::{base_rank_name, roman_numeral, split_numeral_suffix};
pub use station::{StationAssignment, UNKNOWN_AGENCY};
pub use vehicle::Vehicle;
