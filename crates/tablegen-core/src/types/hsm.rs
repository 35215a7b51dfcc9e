//! The HSM graph itself (§3). Constructed by the out-of-scope Graph Provider;
//! the emitter only reads it.

use crate::types::{HistoryId, StateId};

/// One trigger/guard/action/target tuple declared on a state, in source
/// order. If `target` is `Some`, this behavior is a transition; otherwise it
/// is a lifecycle (`enter`/`exit`) body or something the Name Mangler/Expander
/// layer attached for other reasons.
#[derive(Debug, Clone)]
pub struct Behavior {
  /// Declared trigger names, in source order. `"enter"`/`"exit"` are
  /// reserved lifecycle triggers and are never treated as transitions even
  /// if `target` happens to be set (§7 `UnrecognizedTrigger`).
  pub triggers: Vec<String>,
  /// Raw (pre-expansion) guard source text, or `None` for an unguarded
  /// transition.
  pub guard_text: Option<String>,
  /// Raw (pre-expansion) action source text. `Some("")` and `None` are both
  /// treated as "no body" by the Behavior Table Emitter, but both still
  /// consume an action id when this behavior is a transition (§4.2).
  pub action_text: Option<String>,
  /// The transition target, if this behavior is a transition.
  pub target: Option<StateId>,
}

impl Behavior {
  pub fn transition(triggers: &[&str], target: StateId) -> Self {
    Self {
      triggers: triggers.iter().map(|s| s.to_string()).collect(),
      guard_text: None,
      action_text: None,
      target: Some(target),
    }
  }

  pub fn guarded_transition(triggers: &[&str], guard: &str, target: StateId) -> Self {
    Self { guard_text: Some(guard.to_string()), ..Self::transition(triggers, target) }
  }

  pub fn with_action(mut self, action: &str) -> Self {
    self.action_text = Some(action.to_string());
    self
  }

  pub fn lifecycle(trigger: &str) -> Self {
    Self { triggers: vec![trigger.to_string()], guard_text: None, action_text: None, target: None }
  }

  pub fn lifecycle_with_action(trigger: &str, action: &str) -> Self {
    Self { action_text: Some(action.to_string()), ..Self::lifecycle(trigger) }
  }

  pub fn is_transition(&self) -> bool {
    self.target.is_some()
  }
}

/// Shallow history remembers only the direct child; deep history would walk
/// further down on restore. The Transition Collector treats both the same
/// way (§9: history is an extension point); the distinction only affects
/// what a future `EnterHistory` caller would want to do with the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
  Shallow,
  Deep,
}

/// Owned by a `NamedVertex`; costs one runtime slot (§3).
#[derive(Debug, Clone)]
pub struct HistoryPseudostate {
  pub kind: HistoryKind,
  pub id: HistoryId,
}

/// Owned by a `NamedVertex` or by the HSM itself (for the root). At most one
/// outgoing target, which must be a sibling of the pseudostate — i.e. a
/// direct child of whichever state owns it (§3).
#[derive(Debug, Clone)]
pub struct InitialPseudostate {
  pub action_text: Option<String>,
  pub target: StateId,
}

/// A real state. `parent = None` means "child of root".
#[derive(Debug, Clone)]
pub struct NamedVertex {
  pub name: String,
  pub parent: Option<StateId>,
  pub depth: u32,
  pub behaviors: Vec<Behavior>,
  pub initial: Option<InitialPseudostate>,
  pub history: Option<HistoryPseudostate>,
}

impl NamedVertex {
  pub fn new(name: &str, parent: Option<StateId>, depth: u32) -> Self {
    Self { name: name.to_string(), parent, depth, behaviors: vec![], initial: None, history: None }
  }

  pub fn with_behaviors(mut self, behaviors: Vec<Behavior>) -> Self {
    self.behaviors = behaviors;
    self
  }

  pub fn with_initial(mut self, initial: InitialPseudostate) -> Self {
    self.initial = Some(initial);
    self
  }

  pub fn with_history(mut self, history: HistoryPseudostate) -> Self {
    self.history = Some(history);
    self
  }
}

/// The whole graph: a dense, already-ordered list of states plus the HSM's
/// own declared event set and variable declarations (§3). The order of
/// `states` *is* the StateId assignment (§4.1) — the Graph Provider is
/// trusted to have produced a deterministic order already.
#[derive(Debug, Clone)]
pub struct Hsm {
  pub states: Vec<NamedVertex>,
  pub declared_events: Vec<String>,
  pub variable_decls: Vec<String>,
  pub root_initial: Option<InitialPseudostate>,
  /// Set by the Graph Provider when the source diagram used orthogonal
  /// (parallel) regions. Orthogonal regions are an explicit Non-goal; the
  /// Index Builder fails emission immediately (`TableOverflowRisk`, §7) if
  /// this is set, rather than attempting to model them.
  pub has_orthogonal_regions: bool,
}

impl Hsm {
  pub fn new(states: Vec<NamedVertex>, declared_events: Vec<String>, variable_decls: Vec<String>) -> Self {
    Self { states, declared_events, variable_decls, root_initial: None, has_orthogonal_regions: false }
  }

  pub fn with_root_initial(mut self, initial: InitialPseudostate) -> Self {
    self.root_initial = Some(initial);
    self
  }

  pub fn state(&self, id: StateId) -> Option<&NamedVertex> {
    id.index().and_then(|i| self.states.get(i))
  }

  pub fn state_count(&self) -> usize {
    self.states.len()
  }

  /// `true` if any transition behavior anywhere in the HSM names `"DO"` as a
  /// trigger, or the HSM's declared event set already contains it (§4.1).
  pub fn uses_do(&self) -> bool {
    self.declared_events.iter().any(|e| e == "DO")
      || self
        .states
        .iter()
        .flat_map(|s| s.behaviors.iter())
        .filter(|b| b.is_transition())
        .flat_map(|b| b.triggers.iter())
        .any(|t| t == "DO")
  }
}
