//! Property tests for the design doc's §8 invariants: ID density, uniqueness
//! of inherited rows, and determinism across repeated collection passes.
//! Scoped to the collection pass (`IndexTables`), not the generated text —
//! the generated text's determinism is covered separately in
//! `tablegen_core::emit::driver`'s own unit tests.

use std::collections::HashSet;

use proptest::prelude::*;
use tablegen_core::types::{Behavior, Hsm, InitialPseudostate, NamedVertex, StateId};

use crate::utils::build;

const EVENTS: [&str; 3] = ["E1", "E2", "E3"];

/// A tree of `n` states: state `0` is always a root child; every other state
/// `i` picks its parent from `0..i` (or root), so the resulting
/// `parent`/`depth` chain is valid by construction without needing a
/// rejection-sampling strategy. Roughly half the states get a single
/// transition behavior on a random event to a random target (including
/// themselves, to exercise self-transitions).
fn arb_hsm() -> impl Strategy<Value = Hsm> {
  (2usize..8).prop_flat_map(|n| {
    let parent_picks = prop::collection::vec(0usize..64, n);
    let behavior_picks = prop::collection::vec(any::<(bool, u8, usize)>(), n);
    (Just(n), parent_picks, behavior_picks).prop_map(|(n, parent_picks, behavior_picks)| {
      let mut parents: Vec<Option<usize>> = Vec::with_capacity(n);
      let mut depths: Vec<u32> = Vec::with_capacity(n);
      for i in 0..n {
        if i == 0 {
          parents.push(None);
          depths.push(1);
        } else {
          // `i + 1` options: root, or any earlier state as parent.
          let choice = parent_picks[i] % (i + 1);
          if choice == 0 {
            parents.push(None);
            depths.push(1);
          } else {
            let p = choice - 1;
            parents.push(Some(p));
            depths.push(depths[p] + 1);
          }
        }
      }

      let states: Vec<NamedVertex> = (0..n)
        .map(|i| {
          let vertex = NamedVertex::new(&format!("S{i}"), parents[i].map(|p| StateId(p as u32)), depths[i]);
          let (has_behavior, event_pick, target_pick) = behavior_picks[i];
          if has_behavior {
            let event = EVENTS[event_pick as usize % EVENTS.len()];
            let target = StateId((target_pick % n) as u32);
            vertex.with_behaviors(vec![Behavior::transition(&[event], target)])
          } else {
            vertex
          }
        })
        .collect();

      Hsm::new(states, EVENTS.iter().map(|e| e.to_string()).collect(), vec![])
        .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) })
    })
  })
}

proptest! {
  /// §8 invariant 3 (ID density): every non-root state's depth is exactly
  /// one more than its parent's (or `1` when the parent is root).
  #[test]
  fn id_density_holds(hsm in arb_hsm()) {
    let (tables, _) = build(&hsm);
    for i in 0..tables.state_count() {
      let parent = tables.state_parent[i];
      let expected = match parent.index() {
        Some(p) => tables.state_depth[p] + 1,
        None => 1,
      };
      prop_assert_eq!(tables.state_depth[i], expected);
    }
  }

  /// §8 invariant 1 (uniqueness): at most one *inherited* row per
  /// `(current_state, trigger)` pair — a state's own rows are exempt
  /// (§4.2 edge cases) so only inherited rows are checked here.
  #[test]
  fn inherited_rows_are_unique_per_state_and_trigger(hsm in arb_hsm()) {
    let (tables, _) = build(&hsm);
    let mut seen = HashSet::new();
    for t in tables.transitions.iter().filter(|t| t.inherited) {
      prop_assert!(seen.insert((t.current_state, t.trigger)), "duplicate inherited row for {:?}/{:?}", t.current_state, t.trigger);
    }
  }

  /// §8 invariant 6 (determinism): collecting the same HSM twice yields
  /// byte-identical `IndexTables` (compared via `Debug`, since the table
  /// types intentionally don't derive `PartialEq` — nothing downstream
  /// needs table equality outside of this test).
  #[test]
  fn collection_is_deterministic(hsm in arb_hsm()) {
    let (tables_a, _) = build(&hsm);
    let (tables_b, _) = build(&hsm);
    prop_assert_eq!(format!("{:?}", tables_a), format!("{:?}", tables_b));
  }

  /// Every row's `current_state` must actually own (directly or by
  /// inheritance) the trigger it's keyed on, and `next_state` must be a
  /// valid state index — sanity checks that the flattening didn't invent a
  /// dangling reference.
  #[test]
  fn every_row_references_valid_states(hsm in arb_hsm()) {
    let (tables, _) = build(&hsm);
    for t in &tables.transitions {
      prop_assert!(t.current_state.index().is_some_and(|i| i < tables.state_count()));
      prop_assert!(t.next_state.index().is_some_and(|i| i < tables.state_count()) || t.next_state.is_root());
    }
  }
}
