//! S8 from the design doc's §8: history capture on exit, and restore through
//! the `EnterHistory` extension point.

use tablegen_core::types::{
  Behavior, HistoryId, HistoryKind, HistoryPseudostate, Hsm, InitialPseudostate, NamedVertex, StateId,
};

use crate::utils::{build, Simulator};

/// `P(history)` with children `C1`, `C2`, entered in `C1` by default;
/// `Other` is a sibling of `P`. A transition out of `C1` exits `P` entirely
/// (crossing its history boundary), and a later `EnterHistory` call restores
/// `C1` because the exit recorded it in the slot.
fn hsm_with_history() -> Hsm {
  let p = NamedVertex::new("P", None, 1)
    .with_history(HistoryPseudostate { kind: HistoryKind::Shallow, id: HistoryId(0) })
    .with_initial(InitialPseudostate { action_text: None, target: StateId(1) });
  let c1 =
    NamedVertex::new("C1", Some(StateId(0)), 2).with_behaviors(vec![Behavior::transition(&["LEAVE"], StateId(3))]);
  let c2 = NamedVertex::new("C2", Some(StateId(0)), 2);
  let other = NamedVertex::new("Other", None, 1);
  Hsm::new(vec![p, c1, c2, other], vec!["LEAVE".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) })
}

#[test]
fn exiting_through_the_history_parent_records_the_last_child() {
  let hsm = hsm_with_history();
  let (tables, _) = build(&hsm);
  assert_eq!(tables.histories.len(), 1);
  assert_eq!(tables.histories[0].parent, StateId(0));
  assert_eq!(tables.histories[0].children, vec![StateId(1), StateId(2)]);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(1)).unwrap();
  assert_eq!(row.next_state, StateId(3));

  let mut sim = Simulator::new(&hsm, &tables);
  let log = sim.perform_transition(StateId(1), StateId(3), row.action_id.0);
  assert_eq!(
    log,
    vec![
      "exit:C1".to_string(),
      "exit:P".to_string(),
      format!("action:{}", row.action_id.0),
      "enter:Other".to_string(),
    ]
  );
  assert_eq!(sim.history_slots.get(&HistoryId(0)), Some(&StateId(1)));
}

#[test]
fn enter_history_restores_the_recorded_child() {
  let hsm = hsm_with_history();
  let (tables, _) = build(&hsm);
  let row = tables.transitions.iter().find(|t| t.current_state == StateId(1)).unwrap();

  let mut sim = Simulator::new(&hsm, &tables);
  sim.perform_transition(StateId(1), StateId(3), row.action_id.0);

  let restore_log = sim.enter_history(HistoryId(0));
  assert_eq!(restore_log, vec!["enter:C1".to_string()]);
}

#[test]
fn enter_history_falls_back_to_initial_target_when_slot_is_unset() {
  let hsm = hsm_with_history();
  let (tables, _) = build(&hsm);

  let mut sim = Simulator::new(&hsm, &tables);
  let restore_log = sim.enter_history(HistoryId(0));
  assert_eq!(restore_log, vec!["enter:C1".to_string()]);
}
