//! §4.2 Transition Collector: flattens each state's own and inherited
//! transitions into one ordered table, masking an ancestor's trigger with
//! whatever the same trigger resolves to closer to the leaf.

use std::collections::{HashMap, HashSet};

use crate::{
  journal::Journal,
  types::{ActionId, Behavior, BehaviorRef, EventId, GuardId, Hsm, StateId, TransitionEntry},
};

const LIFECYCLE_TRIGGERS: [&str; 2] = ["enter", "exit"];

pub struct CollectedTransitions {
  pub transitions: Vec<TransitionEntry>,
  /// `guard_behaviors[0]` is an unused placeholder for `GuardId::NONE`.
  pub guard_behaviors: Vec<BehaviorRef>,
  /// `action_behaviors[0]` is an unused placeholder for `ActionId::NONE`.
  pub action_behaviors: Vec<BehaviorRef>,
}

struct IdAllocator {
  guard_behaviors: Vec<BehaviorRef>,
  action_behaviors: Vec<BehaviorRef>,
  guard_ids: HashMap<BehaviorRef, GuardId>,
  action_ids: HashMap<BehaviorRef, ActionId>,
}

impl IdAllocator {
  fn new() -> Self {
    let placeholder = BehaviorRef { owner: StateId::ROOT, index: 0 };
    Self {
      guard_behaviors: vec![placeholder],
      action_behaviors: vec![placeholder],
      guard_ids: HashMap::new(),
      action_ids: HashMap::new(),
    }
  }

  /// Guard ids are assigned lazily: a behavior with no guard text (or empty
  /// guard text) never consumes a slot and always resolves to
  /// `GuardId::NONE` (§4.2, §9 Open Question — decided in favor of not
  /// reusing slot `0` for distinct unguarded behaviors).
  fn guard_id(&mut self, owner: StateId, index: usize, guard_text: &Option<String>) -> GuardId {
    let has_guard = guard_text.as_deref().is_some_and(|t| !t.is_empty());
    if !has_guard {
      return GuardId::NONE;
    }
    let key = BehaviorRef { owner, index };
    if let Some(id) = self.guard_ids.get(&key) {
      return *id;
    }
    let id = GuardId(self.guard_behaviors.len() as u32);
    self.guard_behaviors.push(key);
    self.guard_ids.insert(key, id);
    id
  }

  /// Action ids are assigned unconditionally, even for a transition with no
  /// action text: every transition behavior that reaches the table consumes
  /// its own id starting at `1` (§4.2).
  fn action_id(&mut self, owner: StateId, index: usize) -> ActionId {
    let key = BehaviorRef { owner, index };
    if let Some(id) = self.action_ids.get(&key) {
      return *id;
    }
    let id = ActionId(self.action_behaviors.len() as u32);
    self.action_behaviors.push(key);
    self.action_ids.insert(key, id);
    id
  }
}

pub fn collect(hsm: &Hsm, events: &[String], journal: &mut Journal) -> CollectedTransitions {
  let mut alloc = IdAllocator::new();
  let mut transitions = Vec::new();

  for i in 0..hsm.state_count() {
    let leaf = StateId(i as u32);
    let mut handled: HashSet<EventId> = HashSet::new();

    collect_own(hsm, events, leaf, leaf, &mut handled, &mut transitions, &mut alloc, journal, false);

    let mut ancestor = hsm.state(leaf).and_then(|v| v.parent);
    while let Some(anc) = ancestor {
      collect_own(hsm, events, leaf, anc, &mut handled, &mut transitions, &mut alloc, journal, true);
      ancestor = hsm.state(anc).and_then(|v| v.parent);
    }
  }

  CollectedTransitions {
    transitions,
    guard_behaviors: alloc.guard_behaviors,
    action_behaviors: alloc.action_behaviors,
  }
}

/// Walks `source`'s own declared behaviors, registering a [`TransitionEntry`]
/// under `leaf` for every trigger not already `handled`, in declaration
/// order. When `source != leaf` the entries are marked `inherited`; the
/// first state (closest to the leaf) to declare a given trigger always wins,
/// matching the masking rule in §3's key invariants.
#[allow(clippy::too_many_arguments)]
fn collect_own(
  hsm: &Hsm,
  events: &[String],
  leaf: StateId,
  source: StateId,
  handled: &mut HashSet<EventId>,
  out: &mut Vec<TransitionEntry>,
  alloc: &mut IdAllocator,
  journal: &mut Journal,
  inherited: bool,
) {
  let Some(vertex) = hsm.state(source) else { return };

  for (behavior_index, behavior) in vertex.behaviors.iter().enumerate() {
    if !behavior.is_transition() {
      continue;
    }
    let Some(target) = behavior.target else { continue };

    for trigger in &behavior.triggers {
      if LIFECYCLE_TRIGGERS.contains(&trigger.as_str()) {
        journal.hint(format!(
          "state `{}` declares transition trigger `{trigger}` alongside lifecycle triggers; treated as a lifecycle trigger and not added to the transition table",
          vertex.name
        ));
        continue;
      }

      let Some(pos) = events.iter().position(|e| e == trigger) else {
        journal.hint(format!("state `{}` declares transition on unrecognized trigger `{trigger}`; ignored", vertex.name));
        continue;
      };
      let event_id = EventId(pos as u32);

      // A state's own behaviors are never masked against each other (only
      // against ancestors): every own-declared row for a repeated trigger
      // reaches the table, in declared order, so a guard-less runtime
      // dispatcher still picks the first whose guard passes. Ancestor rows
      // that lose to something already `handled` (by this leaf itself or a
      // closer ancestor) are dropped instead (§4.2 edge cases, §3 masking).
      if source != leaf && handled.contains(&event_id) {
        continue;
      }
      handled.insert(event_id);

      let guard_id = alloc.guard_id(source, behavior_index, &behavior.guard_text);
      let action_id = alloc.action_id(source, behavior_index);

      out.push(TransitionEntry {
        current_state: leaf,
        trigger: event_id,
        next_state: target,
        action_id,
        guard_id,
        inherited,
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::NamedVertex;

  fn events() -> Vec<String> {
    vec!["GO".into(), "STOP".into()]
  }

  #[test]
  fn own_transition_masks_inherited_one() {
    let parent = NamedVertex::new("P", None, 1).with_behaviors(vec![Behavior::transition(&["GO"], StateId(2))]);
    let child =
      NamedVertex::new("C", Some(StateId(0)), 2).with_behaviors(vec![Behavior::transition(&["GO"], StateId(1))]);
    let sibling = NamedVertex::new("S", None, 1);
    let hsm = Hsm::new(vec![parent, child, sibling], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);

    let child_go: Vec<_> = collected.transitions.iter().filter(|t| t.current_state == StateId(1)).collect();
    assert_eq!(child_go.len(), 1);
    assert_eq!(child_go[0].next_state, StateId(1));
    assert!(!child_go[0].inherited);
  }

  #[test]
  fn inherits_ancestor_trigger_not_overridden() {
    let parent = NamedVertex::new("P", None, 1).with_behaviors(vec![Behavior::transition(&["STOP"], StateId(2))]);
    let child = NamedVertex::new("C", Some(StateId(0)), 2);
    let sibling = NamedVertex::new("S", None, 1);
    let hsm = Hsm::new(vec![parent, child, sibling], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);

    let child_rows: Vec<_> = collected.transitions.iter().filter(|t| t.current_state == StateId(1)).collect();
    assert_eq!(child_rows.len(), 1);
    assert!(child_rows[0].inherited);
    assert_eq!(child_rows[0].next_state, StateId(2));
  }

  #[test]
  fn own_state_duplicate_triggers_are_not_masked_against_each_other() {
    let vertex = NamedVertex::new("A", None, 1).with_behaviors(vec![
      Behavior::transition(&["GO"], StateId(1)),
      Behavior::transition(&["GO"], StateId(0)),
    ]);
    let target = NamedVertex::new("B", None, 1);
    let hsm = Hsm::new(vec![vertex, target], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);

    let rows: Vec<_> = collected.transitions.iter().filter(|t| t.current_state == StateId(0)).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].next_state, StateId(1));
    assert_eq!(rows[1].next_state, StateId(0));
  }

  #[test]
  fn ancestor_duplicate_triggers_still_mask_to_first_declared() {
    let parent = NamedVertex::new("P", None, 1).with_behaviors(vec![
      Behavior::transition(&["GO"], StateId(2)),
      Behavior::transition(&["GO"], StateId(0)),
    ]);
    let child = NamedVertex::new("C", Some(StateId(0)), 2);
    let other = NamedVertex::new("Other", None, 1);
    let hsm = Hsm::new(vec![parent, child, other], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);

    let rows: Vec<_> = collected.transitions.iter().filter(|t| t.current_state == StateId(1)).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].next_state, StateId(2));
  }

  #[test]
  fn unguarded_behaviors_share_guard_none() {
    let vertex = NamedVertex::new("A", None, 1).with_behaviors(vec![
      Behavior::transition(&["GO"], StateId(1)),
      Behavior::transition(&["STOP"], StateId(1)),
    ]);
    let target = NamedVertex::new("B", None, 1);
    let hsm = Hsm::new(vec![vertex, target], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);
    assert!(collected.transitions.iter().all(|t| t.guard_id == GuardId::NONE));
    assert_eq!(collected.guard_behaviors.len(), 1);
  }

  #[test]
  fn every_transition_gets_its_own_action_id_even_without_action_text() {
    let vertex = NamedVertex::new("A", None, 1).with_behaviors(vec![
      Behavior::transition(&["GO"], StateId(1)),
      Behavior::transition(&["STOP"], StateId(1)),
    ]);
    let target = NamedVertex::new("B", None, 1);
    let hsm = Hsm::new(vec![vertex, target], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);
    let ids: HashSet<_> = collected.transitions.iter().map(|t| t.action_id).collect();
    assert_eq!(ids.len(), 2);
    assert!(collected.transitions.iter().all(|t| t.action_id != ActionId::NONE));
  }

  #[test]
  fn lifecycle_trigger_mixed_with_real_trigger_only_keeps_real_one() {
    let vertex =
      NamedVertex::new("A", None, 1).with_behaviors(vec![Behavior::transition(&["enter", "GO"], StateId(1))]);
    let target = NamedVertex::new("B", None, 1);
    let hsm = Hsm::new(vec![vertex, target], events(), vec![]);
    let mut journal = Journal::new();
    let collected = collect(&hsm, &events(), &mut journal);
    assert_eq!(collected.transitions.len(), 1);
    assert_eq!(collected.transitions[0].trigger, EventId(0));
    assert!(journal.reports().iter().any(|r| r.message.contains("lifecycle")));
  }
}
