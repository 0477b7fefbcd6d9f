//! Undo/redo stack discipline.

mod common;

use rank_edit::{
    AddRankCommand, DEFAULT_UNDO_DEPTH, RankEdit, RemoveRankCommand, SetRankPropertyCommand,
    UndoRedoManager,
};
use rank_model::RankHierarchy;

use common::{Counters, fixture, names, noop};

fn rename(ranks: &[RankHierarchy], index: usize, name: &str) -> SetRankPropertyCommand {
    SetRankPropertyCommand::new(
        ranks,
        ranks[index].id().clone(),
        RankEdit::Name(name.to_string()),
        noop(),
    )
    .unwrap()
}

#[test]
fn empty_manager_has_nothing_to_do() {
    let mut ranks = fixture();
    let initial = ranks.clone();
    let mut manager = UndoRedoManager::default();
    assert_eq!(manager.max_depth(), DEFAULT_UNDO_DEPTH);
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
    assert!(!manager.undo(&mut ranks).unwrap());
    assert!(!manager.redo(&mut ranks).unwrap());
    assert_eq!(manager.undo_description(), None);
    assert_eq!(ranks, initial);
}

#[test]
fn new_command_discards_redo_branch() {
    let mut ranks = fixture();
    let initial = ranks.clone();
    let mut manager = UndoRedoManager::new(10);

    let a = rename(&ranks, 0, "A");
    manager.execute(a, &mut ranks).unwrap();
    let after_a = ranks.clone();
    let b = rename(&ranks, 1, "B");
    manager.execute(b, &mut ranks).unwrap();
    assert!(manager.undo(&mut ranks).unwrap());
    assert_eq!(ranks, after_a);
    assert!(manager.can_redo());

    let c = rename(&ranks, 2, "C");
    manager.execute(c, &mut ranks).unwrap();
    assert!(!manager.can_redo());
    let after_c = ranks.clone();
    assert!(!manager.redo(&mut ranks).unwrap());
    assert_eq!(ranks, after_c);

    assert_eq!(manager.undo_description(), Some("Rename 'Sergeant' to 'C'"));
    assert!(manager.undo(&mut ranks).unwrap());
    assert_eq!(ranks, after_a);
    assert!(manager.undo(&mut ranks).unwrap());
    assert_eq!(ranks, initial);
    assert!(!manager.can_undo());
}

#[test]
fn undo_then_redo_replays_the_same_command() {
    let mut ranks = fixture();
    let mut manager = UndoRedoManager::default();
    let id = ranks[1].id().clone();
    let remove = RemoveRankCommand::new(&ranks, id, noop()).unwrap();
    manager.execute(remove, &mut ranks).unwrap();
    let removed = ranks.clone();

    manager.undo(&mut ranks).unwrap();
    assert_eq!(names(&ranks), ["Recruit", "Officer", "Sergeant"]);
    assert_eq!(
        manager.redo_description(),
        Some("Remove rank 'Officer' and 3 pay bands")
    );
    manager.redo(&mut ranks).unwrap();
    assert_eq!(ranks, removed);
    assert_eq!(manager.undo_len(), 1);
    assert_eq!(manager.redo_len(), 0);
}

#[test]
fn history_is_bounded_and_drops_the_oldest() {
    let mut ranks = vec![RankHierarchy::new("Recruit", 0, 100)];
    let mut manager = UndoRedoManager::new(3);
    for step in 1..=5 {
        let command = rename(&ranks, 0, &format!("Step {step}"));
        manager.execute(command, &mut ranks).unwrap();
    }
    assert_eq!(manager.undo_len(), 3);

    while manager.undo(&mut ranks).unwrap() {}
    // steps 1 and 2 fell off the bottom of the stack
    assert_eq!(ranks[0].name, "Step 2");
    assert_eq!(manager.redo_len(), 3);
}

#[test]
fn zero_depth_keeps_one_step() {
    let mut ranks = vec![RankHierarchy::new("Recruit", 0, 100)];
    let mut manager = UndoRedoManager::new(0);
    let first = rename(&ranks, 0, "First");
    manager.execute(first, &mut ranks).unwrap();
    let second = rename(&ranks, 0, "Second");
    manager.execute(second, &mut ranks).unwrap();
    assert_eq!(manager.max_depth(), 1);
    assert_eq!(manager.undo_len(), 1);
}

#[test]
fn failed_command_is_not_recorded() {
    let mut ranks = fixture();
    let mut manager = UndoRedoManager::default();
    let id = ranks[0].id().clone();
    let remove = RemoveRankCommand::new(&ranks, id, noop()).unwrap();
    ranks.remove(0);

    let error = manager.execute(remove, &mut ranks).unwrap_err();
    assert!(error.is_integrity());
    assert!(!manager.can_undo());
}

#[test]
fn manager_notifies_through_command_callbacks() {
    let mut ranks = fixture();
    let counters = Counters::default();
    let mut manager = UndoRedoManager::default();
    let rank = RankHierarchy::new("Captain", 9000, 12000);
    let add = AddRankCommand::new(&ranks, rank, usize::MAX, counters.callbacks()).unwrap();

    manager.execute(add, &mut ranks).unwrap();
    manager.undo(&mut ranks).unwrap();
    manager.redo(&mut ranks).unwrap();
    assert_eq!(counters.refreshed.get(), 3);
    assert_eq!(counters.changed.get(), 3);
}

#[test]
fn clear_forgets_everything() {
    let mut ranks = fixture();
    let mut manager = UndoRedoManager::default();
    let command = rename(&ranks, 0, "Cadet");
    manager.execute(command, &mut ranks).unwrap();
    manager.undo(&mut ranks).unwrap();
    manager.clear();
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
}
