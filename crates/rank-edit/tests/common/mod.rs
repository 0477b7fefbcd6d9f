#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use rank_edit::{CommandCallbacks, UndoRedoCommand};
use rank_model::{RankHierarchy, StationAssignment, Vehicle};

/// Recruit (standalone), Officer (three pay bands), Sergeant (standalone).
pub fn fixture() -> Vec<RankHierarchy> {
    let mut recruit = RankHierarchy::new("Recruit", 0, 1000);
    recruit.stations.push(
        StationAssignment::new("Mission Row")
            .with_zones(["DOWNT", "LMESA", "VINE"])
            .with_style(1),
    );
    recruit.stations.push(StationAssignment::new("Vinewood"));
    recruit.vehicles.push(Vehicle::new("police", "Police Cruiser"));
    recruit.outfits.push("LSPD.Class A".to_string());

    let mut officer = RankHierarchy::new("Officer", 1000, 5000);
    officer.add_pay_band();
    officer.add_pay_band();
    officer.add_pay_band();

    let sergeant = RankHierarchy::new("Sergeant", 5000, 9000);
    vec![recruit, officer, sergeant]
}

pub fn band_names(rank: &RankHierarchy) -> Vec<String> {
    rank.pay_bands().iter().map(|band| band.name.clone()).collect()
}

pub fn names(ranks: &[RankHierarchy]) -> Vec<String> {
    ranks.iter().map(|rank| rank.name.clone()).collect()
}

/// Execute/undo repeatedly, checking the model returns to its prior state
/// and every re-execution lands on the same result.
pub fn assert_symmetric(ranks: &mut Vec<RankHierarchy>, command: &mut dyn UndoRedoCommand) {
    let before = ranks.clone();
    command.execute(ranks).unwrap();
    let after = ranks.clone();
    assert_ne!(after, before, "{} changed nothing", command.description());
    command.undo(ranks).unwrap();
    assert_eq!(*ranks, before);
    for _ in 0..3 {
        command.execute(ranks).unwrap();
        assert_eq!(*ranks, after);
        command.undo(ranks).unwrap();
        assert_eq!(*ranks, before);
    }
}

#[derive(Clone, Default)]
pub struct Counters {
    pub refreshed: Rc<Cell<usize>>,
    pub changed: Rc<Cell<usize>>,
}

impl Counters {
    pub fn callbacks(&self) -> CommandCallbacks {
        let refreshed = Rc::clone(&self.refreshed);
        let changed = Rc::clone(&self.changed);
        CommandCallbacks::new(
            move || refreshed.set(refreshed.get() + 1),
            move || changed.set(changed.get() + 1),
        )
    }
}

pub fn noop() -> CommandCallbacks {
    CommandCallbacks::noop()
}
