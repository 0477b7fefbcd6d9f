//! Read-only snapshot of externally loaded game data.
//!
//! The catalog is produced by whatever discovers agencies, stations, outfits
//! and vehicles on disk. The core only looks things up in it.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub scripted_name: String,
}

impl Agency {
    fn matches(&self, key: &str) -> bool {
        [&self.scripted_name, &self.short_name, &self.name]
            .iter()
            .any(|candidate| !candidate.is_empty() && candidate.eq_ignore_ascii_case(key))
    }
}

/// Master record of a station, as loaded from game data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    /// Scripted name of the owning agency.
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutfitVariation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Outfit {
    pub name: String,
    #[serde(default)]
    pub variations: Vec<OutfitVariation>,
}

impl Outfit {
    /// Combined `"{Outfit}.{Variation}"` names of every variation.
    pub fn combined_names(&self) -> impl Iterator<Item = String> + '_ {
        self.variations
            .iter()
            .map(|variation| combined_outfit_name(&self.name, &variation.name))
    }
}

pub fn combined_outfit_name(outfit: &str, variation: &str) -> String {
    format!("{outfit}.{variation}")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataCatalog {
    #[serde(default)]
    pub agencies: Vec<Agency>,
    #[serde(default)]
    pub stations: Vec<Arc<Station>>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub outfits: Vec<Outfit>,
}

impl DataCatalog {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(text)?;
        debug!(
            agencies = catalog.agencies.len(),
            stations = catalog.stations.len(),
            vehicles = catalog.vehicles.len(),
            outfits = catalog.outfits.len(),
            "catalog decoded"
        );
        Ok(catalog)
    }

    pub fn station(&self, name: &str) -> Option<&Arc<Station>> {
        self.stations
            .iter()
            .find(|station| station.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn vehicle(&self, model: &str) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.model.eq_ignore_ascii_case(model.trim()))
    }

    pub fn has_outfit(&self, combined_name: &str) -> bool {
        let wanted = combined_name.trim();
        self.outfits
            .iter()
            .flat_map(Outfit::combined_names)
            .any(|name| name.eq_ignore_ascii_case(wanted))
    }

    pub fn agency(&self, key: &str) -> Option<&Agency> {
        self.agencies.iter().find(|agency| agency.matches(key))
    }

    pub fn agency_for_station(&self, station: &Station) -> Option<&Agency> {
        self.agency(&station.agency)
    }

    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
            && self.stations.is_empty()
            && self.vehicles.is_empty()
            && self.outfits.is_empty()
    }
}

/// Load a catalog snapshot from a JSON file.
pub fn load_catalog(path: &Path) -> Result<DataCatalog> {
    let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DataCatalog::from_json_str(&text)
}
