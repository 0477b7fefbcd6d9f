//! Element and attribute names of the ranks document.

pub const RANKS: &str = "Ranks";
pub const RANK: &str = "Rank";
pub const NAME: &str = "Name";
pub const REQUIRED_POINTS: &str = "RequiredPoints";
pub const SALARY: &str = "Salary";
pub const STATIONS: &str = "Stations";
pub const STATION: &str = "Station";
pub const STATION_NAME: &str = "StationName";
pub const STYLE_ID: &str = "StyleID";
pub const ZONES: &str = "Zones";
pub const ZONE: &str = "Zone";
pub const VEHICLES: &str = "Vehicles";
pub const VEHICLE: &str = "Vehicle";
pub const OUTFITS: &str = "Outfits";
pub const OUTFIT: &str = "Outfit";
pub const MODEL_ATTR: &str = "model";
