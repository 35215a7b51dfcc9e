//! §4.1 Index Builders: one deterministic pass that validates the HSM's
//! declared structure and assigns the dense `state_parent[]`/`state_depth[]`
//! tables, the event table, and the history table.

use crate::{
  error::{EmitError, EmitResult},
  journal::Journal,
  types::{HistorySlot, Hsm, StateId},
};

pub struct BuiltIndex {
  pub state_parent: Vec<StateId>,
  pub state_depth: Vec<u32>,
  pub events: Vec<String>,
  pub histories: Vec<HistorySlot>,
  pub max_depth: u32,
}

/// Runs the Index Builder. Fails fast on `TableOverflowRisk` (orthogonal
/// regions) before doing any other work, and on `MissingInitialState` once
/// the rest of the structure has been validated, matching the order a
/// reviewer would expect a compiler front end to fail in: structural
/// soundness first, then "can we even start".
pub fn build(hsm: &Hsm, journal: &mut Journal) -> EmitResult<BuiltIndex> {
  if hsm.has_orthogonal_regions {
    return Err(EmitError::TableOverflowRisk);
  }

  let state_count = hsm.state_count();
  let mut state_parent = Vec::with_capacity(state_count);
  let mut state_depth = Vec::with_capacity(state_count);
  let mut max_depth = 0u32;

  for (i, vertex) in hsm.states.iter().enumerate() {
    let id = StateId(i as u32);
    let parent = vertex.parent.unwrap_or(StateId::ROOT);

    let expected_depth = match vertex.parent {
      None => 1,
      Some(p) => hsm
        .state(p)
        .map(|pv| pv.depth + 1)
        .ok_or_else(|| EmitError::Text(format!("state `{}` has a parent that does not resolve", vertex.name)))?,
    };
    if vertex.depth != expected_depth {
      journal.warn(format!(
        "state `{}` (id {id}) declares depth {} but its parent chain implies {expected_depth}; trusting the declared parent chain",
        vertex.name, vertex.depth
      ));
    }

    state_parent.push(parent);
    state_depth.push(vertex.depth);
    max_depth = max_depth.max(vertex.depth);
  }

  let mut events = hsm.declared_events.clone();
  if hsm.uses_do() && !events.iter().any(|e| e == "DO") {
    events.push("DO".to_string());
  }

  let mut histories = Vec::new();
  for (i, vertex) in hsm.states.iter().enumerate() {
    if let Some(h) = &vertex.history {
      let children = hsm
        .states
        .iter()
        .enumerate()
        .filter(|(_, v)| v.parent == Some(StateId(i as u32)))
        .map(|(ci, _)| StateId(ci as u32))
        .collect();
      histories.push(HistorySlot { id: h.id, parent: StateId(i as u32), children });
    }
  }

  validate_initial(hsm)?;

  Ok(BuiltIndex { state_parent, state_depth, events, histories, max_depth })
}

fn validate_initial(hsm: &Hsm) -> EmitResult<()> {
  let initial = hsm.root_initial.as_ref().ok_or(EmitError::MissingInitialState)?;
  match hsm.state(initial.target) {
    Some(target) if target.parent.is_none() => Ok(()),
    _ => Err(EmitError::MissingInitialState),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{InitialPseudostate, NamedVertex};

  fn flat_two_state() -> Hsm {
    let states = vec![NamedVertex::new("A", None, 1), NamedVertex::new("B", None, 1)];
    Hsm::new(states, vec!["GO".into()], vec![]).with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) })
  }

  #[test]
  fn rejects_orthogonal_regions() {
    let mut hsm = flat_two_state();
    hsm.has_orthogonal_regions = true;
    let mut j = Journal::new();
    assert!(matches!(build(&hsm, &mut j), Err(EmitError::TableOverflowRisk)));
  }

  #[test]
  fn rejects_missing_initial() {
    let mut hsm = flat_two_state();
    hsm.root_initial = None;
    let mut j = Journal::new();
    assert!(matches!(build(&hsm, &mut j), Err(EmitError::MissingInitialState)));
  }

  #[test]
  fn assigns_dense_ids_and_do_event() {
    let states = vec![
      NamedVertex::new("P", None, 1),
      NamedVertex::new("C1", Some(StateId(0)), 2),
      NamedVertex::new("C2", Some(StateId(0)), 2),
    ];
    let mut hsm = Hsm::new(states, vec![], vec![]).with_root_initial(InitialPseudostate {
      action_text: None,
      target: StateId(0),
    });
    hsm.states[1].behaviors.push(crate::types::Behavior::transition(&["DO"], StateId(2)));
    let mut j = Journal::new();
    let idx = build(&hsm, &mut j).unwrap();
    assert_eq!(idx.state_parent, vec![StateId::ROOT, StateId(0), StateId(0)]);
    assert_eq!(idx.state_depth, vec![1, 2, 2]);
    assert_eq!(idx.max_depth, 2);
    assert!(idx.events.iter().any(|e| e == "DO"));
  }
}
