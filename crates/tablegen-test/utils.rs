//! Shared fixtures and a small in-Rust simulator of the LCA-based runtime
//! protocol described in the design doc's §4.5, built directly on top of
//! `IndexTables` rather than on generated (and therefore un-executable) C
//! text. Every scenario/property test in this crate drives this simulator,
//! not the string output of `tablegen_core::emit`.

use std::collections::HashMap;

use tablegen_core::{
  collect,
  journal::Journal,
  types::{HistoryId, Hsm, IndexTables, StateId},
};

pub fn build(hsm: &Hsm) -> (IndexTables, Journal) {
  let mut journal = Journal::new();
  let tables = collect::build(hsm, &mut journal).expect("collection should succeed for a well-formed test fixture");
  (tables, journal)
}

pub fn name(hsm: &Hsm, id: StateId) -> String {
  if id.is_root() {
    "ROOT".to_string()
  } else {
    hsm.state(id).map(|v| v.name.clone()).unwrap_or_else(|| "?".to_string())
  }
}

fn depth(tables: &IndexTables, id: StateId) -> u32 {
  id.index().map(|i| tables.state_depth[i]).unwrap_or(0)
}

fn parent(tables: &IndexTables, id: StateId) -> StateId {
  id.index().map(|i| tables.state_parent[i]).unwrap_or(StateId::ROOT)
}

fn lca(tables: &IndexTables, from: StateId, to: StateId) -> StateId {
  let mut a = from;
  let mut b = to;
  while depth(tables, a) != depth(tables, b) {
    if depth(tables, a) > depth(tables, b) {
      a = parent(tables, a);
    } else {
      b = parent(tables, b);
    }
  }
  while a != b {
    a = parent(tables, a);
    b = parent(tables, b);
  }
  a
}

/// Replays `PerformTransition` for `(from, to, action_idx)`, returning the
/// ordered log of exit/action/enter events. `history_slots` is mutated the
/// same way the generated `ExitUpTo` mutates its static history variables.
pub struct Simulator<'a> {
  hsm: &'a Hsm,
  tables: &'a IndexTables,
  pub history_slots: HashMap<HistoryId, StateId>,
}

impl<'a> Simulator<'a> {
  pub fn new(hsm: &'a Hsm, tables: &'a IndexTables) -> Self {
    Self { hsm, tables, history_slots: HashMap::new() }
  }

  pub fn perform_transition(&mut self, from: StateId, to: StateId, action_idx: u32) -> Vec<String> {
    let mut log = Vec::new();
    if from == to {
      log.push(format!("exit:{}", name(self.hsm, from)));
      log.push(format!("action:{action_idx}"));
      log.push(format!("enter:{}", name(self.hsm, to)));
      return log;
    }

    let lca = lca(self.tables, from, to);
    self.exit_up_to(from, lca, &mut log);
    log.push(format!("action:{action_idx}"));
    self.enter_down_to(lca, to, &mut log);
    log
  }

  fn exit_up_to(&mut self, from: StateId, lca: StateId, log: &mut Vec<String>) {
    let mut cur = from;
    while cur != lca && !cur.is_root() {
      let parent = parent(self.tables, cur);
      if let Some(slot) = self.tables.histories.iter().find(|s| s.parent == parent) {
        self.history_slots.insert(slot.id, cur);
      }
      log.push(format!("exit:{}", name(self.hsm, cur)));
      cur = parent;
    }
  }

  fn enter_down_to(&mut self, lca: StateId, to: StateId, log: &mut Vec<String>) {
    let mut path = Vec::new();
    let mut cur = to;
    while cur != lca && !cur.is_root() {
      path.push(cur);
      cur = parent(self.tables, cur);
    }
    for state in path.into_iter().rev() {
      log.push(format!("enter:{}", name(self.hsm, state)));
    }
  }

  /// Mirrors the generated `EnterHistory(history_id)` extension point
  /// (§4.5/§9): if the slot was recorded by an earlier `exit_up_to`, restore
  /// that child; otherwise fall back to the parent's own InitialPseudostate
  /// target.
  pub fn enter_history(&mut self, history_id: HistoryId) -> Vec<String> {
    let slot = self.tables.histories.iter().find(|s| s.id == history_id).expect("unknown history id");
    let parent = slot.parent;
    let target = self.history_slots.get(&history_id).copied().or_else(|| {
      self.hsm.state(parent).and_then(|v| v.initial.as_ref()).map(|i| i.target)
    });
    let mut log = Vec::new();
    if let Some(target) = target {
      self.enter_down_to(parent, target, &mut log);
    }
    log
  }
}
