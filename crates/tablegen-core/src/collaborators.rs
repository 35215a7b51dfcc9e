//! Interfaces for the two external collaborators the emitter consumes
//! (§1, §6): the Name Mangler and the Expander. Diagram parsing / HSM graph
//! construction (the Graph Provider) is out of scope entirely — the emitter
//! never sees anything but an already-built [`crate::types::Hsm`].

use crate::types::Behavior;

/// Converts human-readable names from the HSM into target-language-safe
/// identifiers. Fixed names (the start/dispatch routines, the state-id
/// field) have defaults so a minimal implementation only has to provide the
/// four per-entity mangling methods.
///
/// The four per-entity methods are fallible: a mangler is free to reject a
/// name it cannot make target-safe (`Err` holds a human-readable reason).
/// Rejections are resolved once, up front, into
/// [`crate::error::EmitError::NameMangling`] (§7) — see
/// `crate::emit::names::resolve`.
pub trait NameMangler {
  fn mangle_type_name(&self) -> Result<String, String>;
  fn mangle_state_enum_value(&self, state: &str) -> Result<String, String>;
  fn mangle_event_enum_value(&self, trigger: &str) -> Result<String, String>;
  fn mangle_var_name(&self, name: &str) -> Result<String, String>;

  fn start_fn_name(&self) -> String {
    "start".to_string()
  }

  fn dispatch_fn_name(&self) -> String {
    "dispatch_event".to_string()
  }

  fn state_id_field_name(&self) -> String {
    "state_id".to_string()
  }
}

/// Substitutes user-visible identifiers inside guard/action source text with
/// target-language field/variable accessors. The emitter treats the returned
/// strings as opaque fragments — it never interprets them (§4.4).
pub trait Expander {
  fn expand_guard(&self, behavior: &Behavior) -> String;
  fn expand_action(&self, behavior: &Behavior) -> String;
}

/// A mangler that mangles nothing; every name passes through unchanged and
/// never rejects. Useful for tests and for HSMs whose Graph Provider already
/// emits target-safe identifiers.
pub struct PassthroughMangler;

impl NameMangler for PassthroughMangler {
  fn mangle_type_name(&self) -> Result<String, String> {
    Ok("StateMachine".to_string())
  }

  fn mangle_state_enum_value(&self, state: &str) -> Result<String, String> {
    Ok(state.to_string())
  }

  fn mangle_event_enum_value(&self, trigger: &str) -> Result<String, String> {
    Ok(trigger.to_string())
  }

  fn mangle_var_name(&self, name: &str) -> Result<String, String> {
    Ok(name.to_string())
  }
}

/// An expander that returns guard/action source text verbatim, i.e. assumes
/// it is already valid target-language source. Useful for tests that don't
/// exercise identifier substitution.
pub struct IdentityExpander;

impl Expander for IdentityExpander {
  fn expand_guard(&self, behavior: &Behavior) -> String {
    behavior.guard_text.clone().unwrap_or_else(|| "1".to_string())
  }

  fn expand_action(&self, behavior: &Behavior) -> String {
    behavior.action_text.clone().unwrap_or_default()
  }
}
