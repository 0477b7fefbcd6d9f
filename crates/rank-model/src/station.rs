use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::{DataCatalog, Station};
use crate::vehicle::Vehicle;

/// Agency tag shown for assignments whose station is not in the catalog.
pub const UNKNOWN_AGENCY: &str = "UNKNOWN";

/// A rank's binding to a named station.
///
/// The station record itself lives in the external catalog; the assignment
/// only holds a shared, non-owning handle to it. Validity and display text
/// are derived from that handle on every call, so replacing it through
/// [`StationAssignment::set_station_reference`] is immediately visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationAssignment {
    pub station_name: String,
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default)]
    pub style_id: i32,
    /// Station-specific vehicle overrides.
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    /// Station-specific outfit overrides (combined names).
    #[serde(default)]
    pub outfits: Vec<String>,
    #[serde(skip)]
    station_reference: Option<Arc<Station>>,
}

impl StationAssignment {
    pub fn new(station_name: impl Into<String>) -> Self {
        Self {
            station_name: station_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style_id: i32) -> Self {
        self.style_id = style_id;
        self
    }

    pub fn station_reference(&self) -> Option<&Arc<Station>> {
        self.station_reference.as_ref()
    }

    /// Replace the catalog link. Returns true when validity or display text
    /// changed as a result.
    pub fn set_station_reference(&mut self, station: Option<Arc<Station>>) -> bool {
        let before = (self.is_valid(), self.display_name());
        self.station_reference = station;
        let after = (self.is_valid(), self.display_name());
        let changed = before != after;
        if changed {
            trace!(
                station = %self.station_name,
                valid = after.0,
                display = %after.1,
                "station reference changed"
            );
        }
        changed
    }

    /// Look the station up by name and bind it (or clear the link).
    pub fn resolve(&mut self, catalog: &DataCatalog) -> bool {
        let station = catalog.station(&self.station_name).cloned();
        self.set_station_reference(station)
    }

    pub fn is_valid(&self) -> bool {
        self.station_reference.is_some()
    }

    pub fn agency_tag(&self) -> String {
        match &self.station_reference {
            Some(station) if !station.agency.trim().is_empty() => station.agency.to_uppercase(),
            _ => UNKNOWN_AGENCY.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} ({})", self.station_name, self.agency_tag())
    }

    /// Key used for duplicate detection within one rank.
    pub fn key(&self) -> String {
        self.station_name.trim().to_lowercase()
    }
}
