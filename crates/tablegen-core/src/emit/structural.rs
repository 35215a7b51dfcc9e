//! §4.3 Structural Table Emitter: the state/event/history enums and the
//! three constant arrays indexed by `StateId`.

use core::fmt::Write as _;

use crate::{
  error::EmitResult,
  types::{Hsm, IndexTables, StateId},
};

use super::{names::ResolvedNames, writer::CodeWriter};

pub fn state_enum_name(names: &ResolvedNames) -> String {
  format!("{}State", names.mangle_type_name())
}

pub fn event_enum_name(names: &ResolvedNames) -> String {
  format!("{}Event", names.mangle_type_name())
}

pub fn history_enum_name(names: &ResolvedNames, parent: StateId) -> String {
  format!("{}{}History", names.mangle_type_name(), names.state_enum_value(parent))
}

pub fn emit_state_enum(w: &mut CodeWriter, hsm: &Hsm, names: &ResolvedNames) -> EmitResult<()> {
  w.start_block(format!("typedef enum {}", state_enum_name(names)))?;
  w.line(format!("{} = -1,", state_value(hsm, names, StateId::ROOT)))?;
  for i in 0..hsm.states.len() {
    w.line(format!("{}{},", mangler_prefix(names), names.state_enum_value(StateId(i as u32))))?;
  }
  w.end_block_with(format!("}} {};", state_enum_name(names)))?;
  w.blank()?;
  Ok(())
}

pub fn emit_event_enum(w: &mut CodeWriter, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  w.start_block(format!("typedef enum {}", event_enum_name(names)))?;
  for event in &tables.events {
    w.line(format!("{}{},", mangler_prefix(names), names.event_enum_value(event)))?;
  }
  w.end_block_with(format!("}} {};", event_enum_name(names)))?;
  w.blank()?;
  Ok(())
}

pub fn emit_history_enums(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  for slot in &tables.histories {
    w.start_block(format!("typedef enum {}", history_enum_name(names, slot.parent)))?;
    for child in &slot.children {
      if hsm.state(*child).is_some() {
        w.line(format!("{}{},", mangler_prefix(names), names.state_enum_value(*child)))?;
      }
    }
    w.end_block_with(format!("}} {};", history_enum_name(names, slot.parent)))?;
    w.blank()?;
  }
  Ok(())
}

/// `GuardId`/`ActionId` are plain dense-integer typedefs rather than
/// enums with named members — guard/action cases have no natural symbolic
/// name, only a table position — but are still given their own named type
/// (not bare `int`) so the generated row/dispatch signatures read as
/// intentional indices rather than arbitrary integers (§4.6).
pub fn guard_id_type_name(names: &ResolvedNames) -> String {
  format!("{}GuardId", names.mangle_type_name())
}

pub fn action_id_type_name(names: &ResolvedNames) -> String {
  format!("{}ActionId", names.mangle_type_name())
}

pub fn emit_guard_action_id_types(w: &mut CodeWriter, names: &ResolvedNames) -> EmitResult<()> {
  w.line(format!("typedef int {};", guard_id_type_name(names)))?;
  w.line(format!("typedef int {};", action_id_type_name(names)))?;
  w.blank()?;
  Ok(())
}

pub fn emit_transition_row_type(w: &mut CodeWriter, names: &ResolvedNames) -> EmitResult<()> {
  w.start_block(format!("typedef struct {}TransitionRow", names.mangle_type_name()))?;
  w.line(format!("{} current_state;", state_enum_name(names)))?;
  w.line(format!("{} trigger;", event_enum_name(names)))?;
  w.line(format!("{} next_state;", state_enum_name(names)))?;
  w.line(format!("{} action_index;", action_id_type_name(names)))?;
  w.line(format!("{} guard_index;", guard_id_type_name(names)))?;
  w.end_block_with(format!("}} {}TransitionRow;", names.mangle_type_name()))?;
  w.blank()?;
  Ok(())
}

/// The mangled, prefixed enum literal for a `StateId`, including the `ROOT`
/// sentinel. Shared by the structural tables and every runtime-protocol
/// routine that needs to name a state in generated code.
pub fn state_value(_hsm: &Hsm, names: &ResolvedNames, id: StateId) -> String {
  if id.is_root() {
    format!("{}ROOT", mangler_prefix(names))
  } else {
    format!("{}{}", mangler_prefix(names), names.state_enum_value(id))
  }
}

/// The mangled, prefixed enum literal for an `EventId`'s name.
pub fn event_value(names: &ResolvedNames, name: &str) -> String {
  format!("{}{}", mangler_prefix(names), names.event_enum_value(name))
}

pub fn emit_static_tables(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let sv = |id: StateId| -> String { state_value(hsm, names, id) };

  w.start_block(format!(
    "static const {}TransitionRow {}[]",
    names.mangle_type_name(),
    transitions_array_name(names)
  ))?;
  for t in &tables.transitions {
    let mut line = String::new();
    write!(
      line,
      "{{ {}, {}, {}, {}, {} }},",
      sv(t.current_state),
      event_value(names, tables.event_name(t.trigger)),
      sv(t.next_state),
      t.action_id.0,
      t.guard_id.0,
    )?;
    w.line(line)?;
  }
  w.end_block_with("};")?;
  w.blank()?;

  w.start_block(format!("static const {} {}[]", state_enum_name(names), state_parent_array_name(names)))?;
  for parent in &tables.state_parent {
    w.line(format!("{},", sv(*parent)))?;
  }
  w.end_block_with("};")?;
  w.blank()?;

  w.start_block(format!("static const int {}[]", state_depth_array_name(names)))?;
  for depth in &tables.state_depth {
    w.line(format!("{depth},"))?;
  }
  w.end_block_with("};")?;
  w.blank()?;

  Ok(())
}

pub fn transitions_array_name(names: &ResolvedNames) -> String {
  format!("{}_transitions", snake(&names.mangle_type_name()))
}

pub fn state_parent_array_name(names: &ResolvedNames) -> String {
  format!("{}_state_parent", snake(&names.mangle_type_name()))
}

pub fn state_depth_array_name(names: &ResolvedNames) -> String {
  format!("{}_state_depth", snake(&names.mangle_type_name()))
}

/// The snake_case-prefixed form of the state-machine type name, used as a
/// free-function/global prefix everywhere the target C can't rely on
/// namespacing (enum literals, static tables, history slots).
pub(super) fn mangler_prefix(names: &ResolvedNames) -> String {
  format!("{}_", snake(&names.mangle_type_name()))
}

pub(super) fn snake(s: &str) -> String {
  let mut out = String::new();
  for (i, c) in s.chars().enumerate() {
    if c.is_uppercase() && i > 0 {
      out.push('_');
    }
    out.extend(c.to_lowercase());
  }
  out
}
