//! The rank tree: standalone ranks and parents owning ordered pay bands.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ids::RankId;
use crate::numeral::roman_numeral;
use crate::station::StationAssignment;
use crate::vehicle::Vehicle;

/// Suffix appended to the name of a cloned rank.
pub const COPY_SUFFIX: &str = " (Copy)";

/// A standalone rank, a parent rank, or a pay band.
///
/// Ownership flows downward only: a parent owns its pay bands, a rank owns
/// its station assignments. The parent link of a pay band is an id used for
/// lookups, never an owning reference.
///
/// `Clone` keeps identities (it is how commands snapshot state); use
/// [`RankHierarchy::clone_rank`] for a user-facing copy with fresh ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankHierarchy {
    id: RankId,
    pub name: String,
    pub required_points: i64,
    pub salary: i64,
    is_parent: bool,
    parent_id: Option<RankId>,
    pay_bands: Vec<RankHierarchy>,
    #[serde(default)]
    pub stations: Vec<StationAssignment>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub outfits: Vec<String>,
}

impl RankHierarchy {
    pub fn new(name: impl Into<String>, required_points: i64, salary: i64) -> Self {
        Self {
            id: RankId::generate(),
            name: name.into(),
            required_points,
            salary,
            is_parent: false,
            parent_id: None,
            pay_bands: Vec::new(),
            stations: Vec::new(),
            vehicles: Vec::new(),
            outfits: Vec::new(),
        }
    }

    pub fn id(&self) -> &RankId {
        &self.id
    }

    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    pub fn parent_id(&self) -> Option<&RankId> {
        self.parent_id.as_ref()
    }

    pub fn is_pay_band(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn pay_bands(&self) -> &[RankHierarchy] {
        &self.pay_bands
    }

    /// Bands for in-place edits; the list itself changes only through the
    /// insert and remove methods.
    pub fn pay_bands_mut(&mut self) -> &mut [RankHierarchy] {
        &mut self.pay_bands
    }

    pub fn pay_band(&self, id: &RankId) -> Option<&RankHierarchy> {
        self.pay_bands.iter().find(|band| &band.id == id)
    }

    pub fn pay_band_mut(&mut self, id: &RankId) -> Option<&mut RankHierarchy> {
        self.pay_bands.iter_mut().find(|band| &band.id == id)
    }

    pub fn pay_band_index(&self, id: &RankId) -> Option<usize> {
        self.pay_bands.iter().position(|band| &band.id == id)
    }

    /// Name a pay band would get at the given 1-based position.
    pub fn pay_band_name(&self, position: usize) -> String {
        format!("{} {}", self.name, roman_numeral(position))
    }

    /// Build a detached pay band for the next position, seeded with this
    /// rank's current threshold and salary.
    pub fn make_pay_band(&self) -> RankHierarchy {
        let mut band = RankHierarchy::new(
            self.pay_band_name(self.pay_bands.len() + 1),
            self.required_points,
            self.salary,
        );
        band.parent_id = Some(self.id.clone());
        band
    }

    /// Append a new pay band and return its id.
    pub fn add_pay_band(&mut self) -> RankId {
        let band = self.make_pay_band();
        let id = band.id.clone();
        self.pay_bands.push(band);
        self.is_parent = true;
        trace!(parent = %self.name, band = %id, "pay band added");
        id
    }

    /// Insert a pay band, appending when `index` is past the end.
    ///
    /// Links the band to this rank and syncs the parent flag. Names are left
    /// alone; call [`RankHierarchy::renumber_pay_bands`] once the structural
    /// change is complete. Returns the index actually used.
    pub fn insert_pay_band(&mut self, index: usize, mut band: RankHierarchy) -> usize {
        band.parent_id = Some(self.id.clone());
        let index = index.min(self.pay_bands.len());
        self.pay_bands.insert(index, band);
        self.sync_parent_flag();
        index
    }

    /// Detach a pay band by id, returning its former index.
    ///
    /// The detached band keeps its parent link so it can be put back by an
    /// undo; promotion is what clears it.
    pub fn remove_pay_band(&mut self, id: &RankId) -> Option<(usize, RankHierarchy)> {
        let index = self.pay_band_index(id)?;
        let band = self.pay_bands.remove(index);
        self.sync_parent_flag();
        Some((index, band))
    }

    /// Rename every pay band after its position and relink it to this rank.
    pub fn renumber_pay_bands(&mut self) {
        let names: Vec<String> = (1..=self.pay_bands.len())
            .map(|position| self.pay_band_name(position))
            .collect();
        for (band, name) in self.pay_bands.iter_mut().zip(names) {
            band.name = name;
            band.parent_id = Some(self.id.clone());
        }
        self.sync_parent_flag();
    }

    pub fn sync_parent_flag(&mut self) {
        self.is_parent = !self.pay_bands.is_empty();
    }

    /// Deep copy with fresh ids and a `" (Copy)"` name suffix.
    ///
    /// Station references are shared with the source because they point at
    /// catalog records, not at data owned by the rank. The copy is not
    /// registered anywhere.
    pub fn clone_rank(&self) -> RankHierarchy {
        let mut copy = self.clone();
        copy.id = RankId::generate();
        copy.name = format!("{}{COPY_SUFFIX}", self.name);
        for band in &mut copy.pay_bands {
            band.reassign_ids();
        }
        copy.renumber_pay_bands();
        copy
    }

    fn reassign_ids(&mut self) {
        self.id = RankId::generate();
        let id = self.id.clone();
        for band in &mut self.pay_bands {
            band.reassign_ids();
            band.parent_id = Some(id.clone());
        }
    }

    /// Turn a pay band into a clean standalone rank. No-op for nodes without
    /// a parent.
    pub fn promote_to_parent(&mut self) {
        if self.parent_id.is_none() {
            return;
        }
        self.parent_id = None;
        self.is_parent = false;
        self.pay_bands.clear();
    }

    /// Re-attach a promoted rank to a parent id. Used when a promotion is
    /// undone.
    pub fn demote_to_pay_band(&mut self, parent_id: RankId) {
        self.parent_id = Some(parent_id);
        self.is_parent = false;
        self.pay_bands.clear();
    }

    /// Lowest threshold of the node (across pay bands for a parent).
    pub fn min_required_points(&self) -> i64 {
        self.pay_bands
            .iter()
            .map(|band| band.required_points)
            .min()
            .unwrap_or(self.required_points)
    }

    pub fn max_required_points(&self) -> i64 {
        self.pay_bands
            .iter()
            .map(|band| band.required_points)
            .max()
            .unwrap_or(self.required_points)
    }

    fn salary_range(&self) -> (i64, i64) {
        let salaries = self.pay_bands.iter().map(|band| band.salary);
        match (salaries.clone().min(), salaries.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => (self.salary, self.salary),
        }
    }

    /// Human-readable threshold and salary range.
    ///
    /// With a next rank the range is closed just below the next rank's
    /// threshold, otherwise it is open-ended.
    pub fn summary(&self, next_rank: Option<&RankHierarchy>) -> String {
        let lower = self.min_required_points();
        let upper = next_rank.map(|next| next.min_required_points().saturating_sub(1));
        let points = match upper {
            Some(upper) if upper >= lower => format!("{lower}-{upper} XP"),
            Some(_) => format!("{lower} XP"),
            None => format!("{lower}+ XP"),
        };
        let (min_salary, max_salary) = self.salary_range();
        let salary = if min_salary == max_salary {
            format!("${min_salary}")
        } else {
            format!("${min_salary}-${max_salary}")
        };
        if self.pay_bands.is_empty() {
            format!("{points} | {salary}")
        } else {
            let count = self.pay_bands.len();
            let noun = if count == 1 { "pay band" } else { "pay bands" };
            format!("{points} | {salary} | {count} {noun}")
        }
    }
}

/// Find a rank or pay band anywhere in the list.
pub fn find_rank<'a>(ranks: &'a [RankHierarchy], id: &RankId) -> Option<&'a RankHierarchy> {
    ranks.iter().find_map(|rank| {
        if &rank.id == id {
            Some(rank)
        } else {
            rank.pay_band(id)
        }
    })
}

pub fn find_rank_mut<'a>(
    ranks: &'a mut [RankHierarchy],
    id: &RankId,
) -> Option<&'a mut RankHierarchy> {
    for rank in ranks.iter_mut() {
        if &rank.id == id {
            return Some(rank);
        }
        if let Some(band) = rank.pay_band_mut(id) {
            return Some(band);
        }
    }
    None
}

pub fn top_level_index(ranks: &[RankHierarchy], id: &RankId) -> Option<usize> {
    ranks.iter().position(|rank| &rank.id == id)
}

/// Ranks in generation order: each parent is replaced by its pay bands.
pub fn flatten_ranks(ranks: &[RankHierarchy]) -> Vec<&RankHierarchy> {
    let mut flat = Vec::new();
    for rank in ranks {
        if rank.pay_bands.is_empty() {
            flat.push(rank);
        } else {
            flat.extend(rank.pay_bands.iter());
        }
    }
    flat
}

/// Every node: each top-level rank followed by its pay bands.
pub fn walk_ranks(ranks: &[RankHierarchy]) -> Vec<&RankHierarchy> {
    let mut all = Vec::new();
    for rank in ranks {
        all.push(rank);
        all.extend(rank.pay_bands.iter());
    }
    all
}

/// Bind every station assignment to its catalog record. Returns the number
/// of assignments that stayed unresolved.
pub fn resolve_station_references(
    ranks: &mut [RankHierarchy],
    catalog: &crate::DataCatalog,
) -> usize {
    let mut unresolved = 0;
    for rank in ranks.iter_mut() {
        unresolved += resolve_station_references(&mut rank.pay_bands, catalog);
        for station in &mut rank.stations {
            station.resolve(catalog);
            if !station.is_valid() {
                unresolved += 1;
            }
        }
    }
    unresolved
}
