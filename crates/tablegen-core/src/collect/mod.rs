//! Collection pass: §4.1 Index Builders followed by §4.2 Transition
//! Collector, bundled into the immutable [`IndexTables`] every emit pass
//! consumes.

mod index_builders;
mod transitions;

use crate::{error::EmitResult, journal::Journal, types::Hsm, types::IndexTables};

pub fn build(hsm: &Hsm, journal: &mut Journal) -> EmitResult<IndexTables> {
  let index = index_builders::build(hsm, journal)?;
  let collected = transitions::collect(hsm, &index.events, journal);

  Ok(IndexTables {
    state_parent: index.state_parent,
    state_depth: index.state_depth,
    events: index.events,
    histories: index.histories,
    transitions: collected.transitions,
    guard_behaviors: collected.guard_behaviors,
    action_behaviors: collected.action_behaviors,
    max_depth: index.max_depth,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Behavior, InitialPseudostate, NamedVertex, StateId};

  #[test]
  fn builds_full_index_tables_for_small_hsm() {
    let parent =
      NamedVertex::new("P", None, 1).with_behaviors(vec![Behavior::transition(&["STOP"], StateId(2))]);
    let child = NamedVertex::new("C", Some(StateId(0)), 2).with_behaviors(vec![Behavior::guarded_transition(
      &["GO"],
      "ready",
      StateId(2),
    )
    .with_action("do_go()")]);
    let other = NamedVertex::new("Other", None, 1);
    let hsm = Hsm::new(vec![parent, child, other], vec!["GO".into(), "STOP".into()], vec![])
      .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) });

    let mut journal = Journal::new();
    let tables = build(&hsm, &mut journal).unwrap();

    assert_eq!(tables.state_count(), 3);
    assert_eq!(tables.max_depth, 2);
    assert!(!tables.transitions.is_empty());
    assert!(tables.guard_behaviors.len() >= 2);
    assert!(tables.action_behaviors.len() >= 2);
  }
}
