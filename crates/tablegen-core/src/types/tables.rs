//! The immutable output of the collection pass (§9 "reimplement as locals on
//! a collection pass returning an immutable `IndexTables` value"). Every emit
//! pass is a pure function of `(hsm, tables, mangler, expander)`.

use crate::types::{ActionId, BehaviorRef, EventId, GuardId, HistoryId, StateId};

/// One row of the flattened transition table (§4.2/§4.3), in table order.
#[derive(Debug, Clone, Copy)]
pub struct TransitionEntry {
  pub current_state: StateId,
  pub trigger: EventId,
  pub next_state: StateId,
  pub action_id: ActionId,
  pub guard_id: GuardId,
  /// `true` if this row was pulled down from an ancestor rather than
  /// declared directly on `current_state` (§3 key invariants). Not emitted
  /// into the generated table itself — it exists for the Index Builder's own
  /// invariant tests (§8 "Inheritance completeness").
  pub inherited: bool,
}

/// A history pseudostate's generated enum, listing its parent's direct
/// children in declaration order (§4.6, §6 output interface).
#[derive(Debug, Clone)]
pub struct HistorySlot {
  pub id: HistoryId,
  pub parent: StateId,
  pub children: Vec<StateId>,
}

/// Everything the collection pass produced, bundled up and handed by
/// reference into every emit-phase function. Built once per `generate()`
/// call and never mutated afterward (§9).
#[derive(Debug, Clone)]
pub struct IndexTables {
  /// `state_parent[i]` is the parent of `StateId(i)`, or `StateId::ROOT`.
  pub state_parent: Vec<StateId>,
  /// `state_depth[i]` is the depth of `StateId(i)`; root is depth 0.
  pub state_depth: Vec<u32>,
  /// `EventId(i)` → declared name; `"DO"` is appended last when used.
  pub events: Vec<String>,
  /// One per history pseudostate found while walking the states.
  pub histories: Vec<HistorySlot>,
  /// The flattened, ordered transition table.
  pub transitions: Vec<TransitionEntry>,
  /// `GuardId(i)` (`i >= 1`) → the behavior that owns that guard text.
  pub guard_behaviors: Vec<BehaviorRef>,
  /// `ActionId(i)` (`i >= 1`) → the behavior that owns that action text.
  pub action_behaviors: Vec<BehaviorRef>,
  /// Deepest state's depth; sizes the `EnterDownTo` ancestor-path buffer.
  pub max_depth: u32,
}

impl IndexTables {
  pub fn state_count(&self) -> usize {
    self.state_parent.len()
  }

  pub fn event_name(&self, id: EventId) -> &str {
    &self.events[id.0 as usize]
  }

  pub fn event_id(&self, name: &str) -> Option<EventId> {
    self.events.iter().position(|e| e == name).map(|i| EventId(i as u32))
  }

  pub fn uses_do(&self) -> bool {
    self.events.iter().any(|e| e == "DO")
  }
}
