//! End-to-end scenarios S3 and S4 from the design doc's §8: inherited
//! transitions and LCA computation at an intermediate ancestor.

use tablegen_core::types::{Behavior, Hsm, InitialPseudostate, NamedVertex, StateId};

use crate::utils::{build, Simulator};

/// S3: parent `P` with children `C1`, `C2`; `P --RESET--> C1`. Starting in
/// `C2`, dispatching `RESET` exits C2 then P, runs the action, then enters
/// P then C1.
#[test]
fn hierarchical_inherited_transition_exits_and_enters_through_parent() {
  let p = NamedVertex::new("P", None, 1).with_behaviors(vec![Behavior::transition(&["RESET"], StateId(1))]);
  let c1 = NamedVertex::new("C1", Some(StateId(0)), 2);
  let c2 = NamedVertex::new("C2", Some(StateId(0)), 2);
  let hsm = Hsm::new(vec![p, c1, c2], vec!["RESET".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(2)).unwrap();
  assert!(row.inherited);
  assert_eq!(row.next_state, StateId(1));

  let mut sim = Simulator::new(&hsm, &tables);
  let log = sim.perform_transition(StateId(2), StateId(1), row.action_id.0);
  assert_eq!(
    log,
    vec![
      "exit:C2".to_string(),
      "exit:P".to_string(),
      format!("action:{}", row.action_id.0),
      "enter:P".to_string(),
      "enter:C1".to_string(),
    ]
  );
}

/// S4: `Root > A > A1`, `Root > B > B1`; `A1 --X--> B1`. The LCA is `ROOT`,
/// so both full branches participate in the exit/enter walk.
#[test]
fn lca_at_root_walks_both_full_branches() {
  let a = NamedVertex::new("A", None, 1);
  let a1 = NamedVertex::new("A1", Some(StateId(0)), 2).with_behaviors(vec![Behavior::transition(&["X"], StateId(3))]);
  let b = NamedVertex::new("B", None, 1);
  let b1 = NamedVertex::new("B1", Some(StateId(2)), 2);
  let hsm = Hsm::new(vec![a, a1, b, b1], vec!["X".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });
  let (tables, _) = build(&hsm);

  let row = tables.transitions.iter().find(|t| t.current_state == StateId(1)).unwrap();
  let mut sim = Simulator::new(&hsm, &tables);
  let log = sim.perform_transition(StateId(1), StateId(3), row.action_id.0);
  assert_eq!(
    log,
    vec![
      "exit:A1".to_string(),
      "exit:A".to_string(),
      format!("action:{}", row.action_id.0),
      "enter:B".to_string(),
      "enter:B1".to_string(),
    ]
  );
}

#[test]
fn inheritance_completeness_for_every_unoverridden_descendant() {
  let p = NamedVertex::new("P", None, 1).with_behaviors(vec![Behavior::transition(&["E"], StateId(1))]);
  let c1 = NamedVertex::new("C1", Some(StateId(0)), 2);
  let c2 = NamedVertex::new("C2", Some(StateId(0)), 2).with_behaviors(vec![Behavior::transition(&["E"], StateId(0))]);
  let hsm = Hsm::new(vec![p, c1, c2], vec!["E".into()], vec![])
    .with_root_initial(InitialPseudostate { action_text: None, target: StateId(1) });
  let (tables, _) = build(&hsm);

  let c1_row = tables.transitions.iter().find(|t| t.current_state == StateId(1)).unwrap();
  assert!(c1_row.inherited);
  assert_eq!(c1_row.next_state, StateId(1));

  let c2_row = tables.transitions.iter().find(|t| t.current_state == StateId(2)).unwrap();
  assert!(!c2_row.inherited);
  assert_eq!(c2_row.next_state, StateId(0));
}
