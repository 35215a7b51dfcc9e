//! End-to-end scenarios S1, S2, S5, S6, S7 from the design doc's §8.

use tablegen_core::types::{Behavior, EventId, Hsm, InitialPseudostate, NamedVertex, StateId};

use crate::utils::{build, Simulator};

/// S1: flat two-state, unguarded transition.
#[test]
fn flat_two_state_transition() {
  let a = NamedVertex::new("A", None, 1).with_behaviors(vec![Behavior::transition(&["GO"], StateId(1))]);
  let b = NamedVertex::new("B", None, 1);
  let hsm = Hsm::new(vec![a, b], vec!["GO".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(0)).unwrap();
  assert_eq!(row.trigger, tables.event_id("GO").unwrap());
  assert_eq!(row.next_state, StateId(1));

  let mut sim = Simulator::new(&hsm, &tables);
  let log = sim.perform_transition(StateId(0), StateId(1), row.action_id.0);
  assert_eq!(log, vec!["exit:A".to_string(), format!("action:{}", row.action_id.0), "enter:B".to_string()]);
}

/// S2: guarded transition where the guard would fail is never reached by
/// `dispatch_event`'s own linear scan + `EvaluateGuard` gate; at the table
/// level we only assert the row carries a non-zero guard id so the emitted
/// dispatcher actually consults `EvaluateGuard` before transitioning.
#[test]
fn guarded_transition_gets_nonzero_guard_id() {
  let a = NamedVertex::new("A", None, 1)
    .with_behaviors(vec![Behavior::guarded_transition(&["GO"], "x == 1", StateId(1))]);
  let b = NamedVertex::new("B", None, 1);
  let hsm = Hsm::new(vec![a, b], vec!["GO".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(0)).unwrap();
  assert!(!row.guard_id.is_none());
}

/// S5: self-transition exits and re-enters the same state around the action.
#[test]
fn self_transition_exits_and_reenters_same_state() {
  let s = NamedVertex::new("S", None, 1).with_behaviors(vec![Behavior::transition(&["E"], StateId(0))]);
  let hsm = Hsm::new(vec![s], vec!["E".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(0)).unwrap();
  assert_eq!(row.next_state, StateId(0));

  let mut sim = Simulator::new(&hsm, &tables);
  let log = sim.perform_transition(StateId(0), StateId(0), row.action_id.0);
  assert_eq!(log, vec!["exit:S".to_string(), format!("action:{}", row.action_id.0), "enter:S".to_string()]);
}

/// S6: `DO` completion — a state declares `A --DO--> B` and the HSM's event
/// table grows the reserved `DO` entry automatically.
#[test]
fn do_completion_event_is_registered_and_dispatchable() {
  let a = NamedVertex::new("A", None, 1).with_behaviors(vec![Behavior::transition(&["DO"], StateId(1))]);
  let b = NamedVertex::new("B", None, 1);
  let hsm = Hsm::new(vec![a, b], vec![], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  assert!(tables.uses_do());
  let row = tables.transitions.iter().find(|t| t.current_state == StateId(0)).unwrap();
  assert_eq!(row.trigger, tables.event_id("DO").unwrap());
  assert_eq!(row.next_state, StateId(1));
}

/// S7: a state declaring the same trigger twice on a guarded-then-unguarded
/// pair of behaviors keeps both rows, in declared order; a linear dispatcher
/// that skips a row whenever its guard fails lands in the second row's
/// target once the first guard is false.
#[test]
fn own_state_duplicate_trigger_keeps_both_rows_in_declared_order() {
  let s = NamedVertex::new("S", None, 1).with_behaviors(vec![
    Behavior::guarded_transition(&["T"], "x == 1", StateId(0)),
    Behavior::transition(&["T"], StateId(1)),
  ]);
  let d = NamedVertex::new("D", None, 1);
  let hsm = Hsm::new(vec![s, d], vec!["T".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let rows: Vec<_> = tables.transitions.iter().filter(|t| t.current_state == StateId(0)).collect();
  assert_eq!(rows.len(), 2);
  assert!(!rows[0].guard_id.is_none());
  assert!(rows[1].guard_id.is_none());

  // A linear dispatcher skips rows whose guard evaluates false; with the
  // first guard false here, it must fall through to the second row.
  let guard_false = true;
  let chosen = rows.iter().find(|r| r.guard_id.is_none() || !guard_false).unwrap();
  assert_eq!(chosen.next_state, StateId(1));
}

#[test]
fn unhandled_event_leaves_no_matching_row() {
  let a = NamedVertex::new("A", None, 1).with_behaviors(vec![Behavior::transition(&["GO"], StateId(1))]);
  let b = NamedVertex::new("B", None, 1);
  let hsm = Hsm::new(vec![a, b], vec!["GO".into(), "OTHER".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let other = EventId(tables.event_id("OTHER").unwrap().0);
  assert!(!tables.transitions.iter().any(|t| t.current_state == StateId(0) && t.trigger == other));
}
