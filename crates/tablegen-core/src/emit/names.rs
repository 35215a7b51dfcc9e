//! Resolves every Name-Mangler-fallible identifier exactly once, up front,
//! the same way [`crate::collect`] resolves the HSM into an immutable
//! [`crate::types::IndexTables`] before any emit pass runs. A rejected name
//! turns into [`crate::error::EmitError::NameMangling`] (§7) right here,
//! instead of every downstream formatting helper having to thread a
//! `Result` through a handful of string concatenations.

use crate::{
  collaborators::NameMangler,
  error::{state_name, EmitError, EmitResult},
  types::{Hsm, StateId},
};

/// Every mangled name the emit passes need, resolved once. Emit passes take
/// `&ResolvedNames` wherever they used to take `&dyn NameMangler`.
pub struct ResolvedNames {
  type_name: String,
  start_fn_name: String,
  dispatch_fn_name: String,
  state_id_field_name: String,
  /// `state_enum_values[i]` is the mangled enum literal for `StateId(i)`.
  state_enum_values: Vec<String>,
  /// Declared-order event names, parallel to `event_enum_values`.
  event_names: Vec<String>,
  event_enum_values: Vec<String>,
}

impl ResolvedNames {
  pub fn mangle_type_name(&self) -> String {
    self.type_name.clone()
  }

  pub fn start_fn_name(&self) -> String {
    self.start_fn_name.clone()
  }

  pub fn dispatch_fn_name(&self) -> String {
    self.dispatch_fn_name.clone()
  }

  pub fn state_id_field_name(&self) -> String {
    self.state_id_field_name.clone()
  }

  /// The mangled enum literal for `id`, or `"ROOT"` for the sentinel.
  pub fn state_enum_value(&self, id: StateId) -> &str {
    id.index().and_then(|i| self.state_enum_values.get(i)).map(String::as_str).unwrap_or("ROOT")
  }

  /// The mangled enum literal for the declared event `name`. Falls back to
  /// `name` itself if it isn't one of the resolved events (shouldn't happen
  /// for a well-formed `IndexTables`, but this is a pure lookup, not a
  /// second validation pass).
  pub fn event_enum_value(&self, name: &str) -> &str {
    self
      .event_names
      .iter()
      .position(|e| e == name)
      .and_then(|i| self.event_enum_values.get(i))
      .map(String::as_str)
      .unwrap_or(name)
  }
}

/// Runs every `NameMangler` call the Driver needs and bundles the results.
/// Fails with `EmitError::NameMangling` on the first rejection, naming the
/// offending state (or event) by its original, pre-mangled name.
pub fn resolve(hsm: &Hsm, events: &[String], mangler: &dyn NameMangler) -> EmitResult<ResolvedNames> {
  let type_name = mangler.mangle_type_name().map_err(|reason| EmitError::NameMangling {
    state: "<type name>".to_string(),
    reason,
  })?;

  let mut state_enum_values = Vec::with_capacity(hsm.states.len());
  for i in 0..hsm.states.len() {
    let id = StateId(i as u32);
    let value = mangler
      .mangle_state_enum_value(state_name(hsm, id))
      .map_err(|reason| EmitError::NameMangling { state: state_name(hsm, id).to_string(), reason })?;
    state_enum_values.push(value);
  }

  let mut event_enum_values = Vec::with_capacity(events.len());
  for event in events {
    let value = mangler
      .mangle_event_enum_value(event)
      .map_err(|reason| EmitError::NameMangling { state: format!("<event `{event}`>"), reason })?;
    event_enum_values.push(value);
  }

  Ok(ResolvedNames {
    type_name,
    start_fn_name: mangler.start_fn_name(),
    dispatch_fn_name: mangler.dispatch_fn_name(),
    state_id_field_name: mangler.state_id_field_name(),
    state_enum_values,
    event_names: events.to_vec(),
    event_enum_values,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Hsm, NamedVertex};

  struct RejectingMangler;

  impl NameMangler for RejectingMangler {
    fn mangle_type_name(&self) -> Result<String, String> {
      Ok("Ok".to_string())
    }

    fn mangle_state_enum_value(&self, state: &str) -> Result<String, String> {
      if state == "Bad" {
        Err("reserved keyword".to_string())
      } else {
        Ok(state.to_string())
      }
    }

    fn mangle_event_enum_value(&self, trigger: &str) -> Result<String, String> {
      Ok(trigger.to_string())
    }

    fn mangle_var_name(&self, name: &str) -> Result<String, String> {
      Ok(name.to_string())
    }
  }

  #[test]
  fn rejection_propagates_as_name_mangling_error_with_original_name() {
    let hsm = Hsm::new(vec![NamedVertex::new("Bad", None, 1)], vec![], vec![]);
    let err = resolve(&hsm, &hsm.declared_events, &RejectingMangler).unwrap_err();
    match err {
      EmitError::NameMangling { state, reason } => {
        assert_eq!(state, "Bad");
        assert_eq!(reason, "reserved keyword");
      }
      other => panic!("expected NameMangling, got {other:?}"),
    }
  }

  #[test]
  fn accepted_names_resolve_in_state_id_order() {
    let hsm = Hsm::new(vec![NamedVertex::new("A", None, 1), NamedVertex::new("B", None, 1)], vec![], vec![]);
    let names = resolve(&hsm, &hsm.declared_events, &RejectingMangler).unwrap();
    assert_eq!(names.state_enum_value(StateId(0)), "A");
    assert_eq!(names.state_enum_value(StateId(1)), "B");
    assert_eq!(names.state_enum_value(StateId::ROOT), "ROOT");
  }
}
