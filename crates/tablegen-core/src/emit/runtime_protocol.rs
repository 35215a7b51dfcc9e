//! §4.5 Runtime-Protocol Emitter: the dispatcher, the LCA-based
//! `PerformTransition` routine, `ExitUpTo`/`EnterDownTo`, per-state enter/exit
//! bodies, `start()`, and the history re-entry extension point.

use crate::{
  collaborators::Expander,
  error::EmitResult,
  types::{Hsm, IndexTables, StateId},
};

use super::{
  behavior::{evaluate_guard_fn_name, execute_action_fn_name},
  names::ResolvedNames,
  structural::{
    self, action_id_type_name, event_value, mangler_prefix, state_depth_array_name, state_enum_name,
    state_parent_array_name, state_value, transitions_array_name,
  },
  writer::CodeWriter,
};

fn get_state_parent_fn_name(names: &ResolvedNames) -> String {
  format!("{}_GetStateParent", names.mangle_type_name())
}

fn get_state_depth_fn_name(names: &ResolvedNames) -> String {
  format!("{}_GetStateDepth", names.mangle_type_name())
}

fn call_state_enter_fn_name(names: &ResolvedNames) -> String {
  format!("{}_CallStateEnter", names.mangle_type_name())
}

fn call_state_exit_fn_name(names: &ResolvedNames) -> String {
  format!("{}_CallStateExit", names.mangle_type_name())
}

fn exit_up_to_fn_name(names: &ResolvedNames) -> String {
  format!("{}_ExitUpTo", names.mangle_type_name())
}

fn enter_down_to_fn_name(names: &ResolvedNames) -> String {
  format!("{}_EnterDownTo", names.mangle_type_name())
}

fn perform_transition_fn_name(names: &ResolvedNames) -> String {
  format!("{}_PerformTransition", names.mangle_type_name())
}

pub fn enter_history_fn_name(names: &ResolvedNames) -> String {
  format!("{}_EnterHistory", names.mangle_type_name())
}

fn history_slot_var(names: &ResolvedNames, history_id: u32) -> String {
  format!("{}history_{}", mangler_prefix(names), history_id)
}

pub fn emit_lookup_helpers(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  let root = state_value(hsm, names, StateId::ROOT);

  w.start_block(format!("static {state_ty} {}({state_ty} id)", get_state_parent_fn_name(names)))?;
  w.line(format!("if (id < 0 || id >= {}) {{ return {root}; }}", tables.state_count()))?;
  w.line(format!("return {}[id];", state_parent_array_name(names)))?;
  w.end_block()?;
  w.blank()?;

  w.start_block(format!("static int {}({state_ty} id)", get_state_depth_fn_name(names)))?;
  w.line(format!("if (id < 0 || id >= {}) {{ return 0; }}", tables.state_count()))?;
  w.line(format!("return {}[id];", state_depth_array_name(names)))?;
  w.end_block()?;
  w.blank()?;

  Ok(())
}

pub fn emit_state_lifecycle_dispatch(
  w: &mut CodeWriter,
  hsm: &Hsm,
  names: &ResolvedNames,
  expander: &dyn Expander,
) -> EmitResult<()> {
  emit_lifecycle_fn(w, hsm, names, expander, "enter", &call_state_enter_fn_name(names))?;
  emit_lifecycle_fn(w, hsm, names, expander, "exit", &call_state_exit_fn_name(names))?;
  Ok(())
}

fn emit_lifecycle_fn(
  w: &mut CodeWriter,
  hsm: &Hsm,
  names: &ResolvedNames,
  expander: &dyn Expander,
  trigger: &str,
  fn_name: &str,
) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  w.start_block(format!("static void {fn_name}({state_ty} id)"))?;
  w.start_block("switch (id)")?;
  for (i, vertex) in hsm.states.iter().enumerate() {
    let body: Vec<&crate::types::Behavior> =
      vertex.behaviors.iter().filter(|b| !b.is_transition() && b.triggers.iter().any(|t| t == trigger)).collect();
    if body.is_empty() {
      continue;
    }
    w.line(format!("case {}: {{", state_value(hsm, names, StateId(i as u32))))?;
    for b in body {
      let action = expander.expand_action(b);
      if !action.is_empty() {
        w.line(format!("  {action};"))?;
      }
    }
    w.line("  break;")?;
    w.line("}")?;
  }
  w.line("default: break;")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_exit_up_to(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  let root = state_value(hsm, names, StateId::ROOT);
  w.start_block(format!("static void {}({state_ty} from, {state_ty} lca)", exit_up_to_fn_name(names)))?;
  w.start_block(format!("for ({state_ty} cur = from; cur != lca && cur != {root};)"))?;
  w.line(format!("{state_ty} parent = {}(cur);", get_state_parent_fn_name(names)))?;
  if !tables.histories.is_empty() {
    w.start_block("switch (parent)")?;
    for slot in &tables.histories {
      w.line(format!(
        "case {}: {} = cur; break;",
        state_value(hsm, names, slot.parent),
        history_slot_var(names, slot.id.0)
      ))?;
    }
    w.line("default: break;")?;
    w.end_block()?;
  }
  w.line(format!("{}(cur);", call_state_exit_fn_name(names)))?;
  w.line("cur = parent;")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_enter_down_to(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  let root = state_value(hsm, names, StateId::ROOT);
  w.start_block(format!("static void {}({state_ty} lca, {state_ty} to)", enter_down_to_fn_name(names)))?;
  w.line(format!("{state_ty} path[{}];", tables.max_depth + 1))?;
  w.line("int n = 0;")?;
  w.start_block(format!(
    "for ({state_ty} cur = to; cur != lca && cur != {root}; cur = {}(cur))",
    get_state_parent_fn_name(names)
  ))?;
  w.line("path[n++] = cur;")?;
  w.end_block()?;
  w.start_block("for (int i = n - 1; i >= 0; i--)")?;
  w.line(format!("{}(path[i]);", call_state_enter_fn_name(names)))?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_perform_transition(w: &mut CodeWriter, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  let do_dispatch = if tables.uses_do() {
    Some(format!("{}(self, {});", names.dispatch_fn_name(), event_value(names, "DO")))
  } else {
    None
  };

  w.start_block(format!(
    "static void {}({}* self, {state_ty} from, {state_ty} to, {} action_idx)",
    perform_transition_fn_name(names),
    names.mangle_type_name(),
    action_id_type_name(names)
  ))?;
  w.start_block("if (from == to)")?;
  w.line(format!("{}(from);", call_state_exit_fn_name(names)))?;
  w.line(format!("{}(action_idx);", execute_action_fn_name(names)))?;
  w.line(format!("{}(to);", call_state_enter_fn_name(names)))?;
  w.line(format!("self->{} = to;", names.state_id_field_name()))?;
  w.end_block()?;
  w.block("else", |w| {
    w.line(format!("{state_ty} a = from;"))?;
    w.line(format!("{state_ty} b = to;"))?;
    w.start_block(format!("while ({}(a) != {}(b))", get_state_depth_fn_name(names), get_state_depth_fn_name(names)))?;
    w.start_block(format!("if ({}(a) > {}(b))", get_state_depth_fn_name(names), get_state_depth_fn_name(names)))?;
    w.line(format!("a = {}(a);", get_state_parent_fn_name(names)))?;
    w.end_block()?;
    w.block("else", |w| w.line(format!("b = {}(b);", get_state_parent_fn_name(names))))?;
    w.end_block()?;
    w.start_block("while (a != b)")?;
    w.line(format!("a = {}(a);", get_state_parent_fn_name(names)))?;
    w.line(format!("b = {}(b);", get_state_parent_fn_name(names)))?;
    w.end_block()?;
    w.line(format!("{state_ty} lca = a;"))?;
    w.line(format!("{}(from, lca);", exit_up_to_fn_name(names)))?;
    w.line(format!("{}(action_idx);", execute_action_fn_name(names)))?;
    w.line(format!("{}(lca, to);", enter_down_to_fn_name(names)))?;
    w.line(format!("self->{} = to;", names.state_id_field_name()))
  })?;
  if let Some(call) = &do_dispatch {
    w.line(call)?;
  }
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_dispatch_event(w: &mut CodeWriter, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  let event_ty = structural::event_enum_name(names);
  w.start_block(format!(
    "void {}({}* self, {event_ty} event_id)",
    names.dispatch_fn_name(),
    names.mangle_type_name()
  ))?;
  w.start_block(format!("for (int i = 0; i < {}; i++)", tables.transitions.len()))?;
  w.start_block(format!(
    "if ({}[i].current_state == self->{} && {}[i].trigger == event_id)",
    transitions_array_name(names),
    names.state_id_field_name(),
    transitions_array_name(names)
  ))?;
  w.start_block(format!(
    "if ({}[i].guard_index != 0 && !{}({}[i].guard_index))",
    transitions_array_name(names),
    evaluate_guard_fn_name(names),
    transitions_array_name(names)
  ))?;
  w.line("continue;")?;
  w.end_block()?;
  w.line(format!(
    "{}(self, self->{}, {}[i].next_state, {}[i].action_index);",
    perform_transition_fn_name(names),
    names.state_id_field_name(),
    transitions_array_name(names),
    transitions_array_name(names)
  ))?;
  w.line("return;")?;
  w.end_block()?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_start(
  w: &mut CodeWriter,
  hsm: &Hsm,
  tables: &IndexTables,
  names: &ResolvedNames,
  expander: &dyn Expander,
) -> EmitResult<()> {
  let root = state_value(hsm, names, StateId::ROOT);
  let initial = hsm.root_initial.as_ref();
  let target = initial.map(|i| i.target).unwrap_or(StateId::ROOT);
  let target_value = state_value(hsm, names, target);

  w.start_block(format!("void {}({}* self)", names.start_fn_name(), names.mangle_type_name()))?;
  w.line(format!("{}({root});", call_state_enter_fn_name(names)))?;
  if let Some(init) = initial {
    if let Some(text) = &init.action_text {
      let action = expander.expand_action(&crate::types::Behavior::transition(&[], target).with_action(text));
      if !action.is_empty() {
        w.line(format!("{action};"))?;
      }
    }
  }
  w.line(format!("self->{} = {target_value};", names.state_id_field_name()))?;
  w.line(format!("{}({root}, {target_value});", enter_down_to_fn_name(names)))?;
  if tables.uses_do() {
    w.line(format!("{}(self, {});", names.dispatch_fn_name(), event_value(names, "DO")))?;
  }
  w.end_block()?;
  w.blank()?;
  Ok(())
}

/// (ADDED, §4.5/§9) Extension point: nothing in the normal dispatch path
/// reaches this, since a `Behavior`'s transition target is always a
/// `NamedVertex`, never a history pseudostate. A caller that wants to
/// restore a region from history calls this directly.
pub fn emit_enter_history(w: &mut CodeWriter, hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> EmitResult<()> {
  for slot in &tables.histories {
    let slot_var = history_slot_var(names, slot.id.0);
    let default_target =
      hsm.state(slot.parent).and_then(|v| v.initial.as_ref()).map(|i| i.target).unwrap_or(StateId::ROOT);
    let default_value = state_value(hsm, names, default_target);
    let parent_value = state_value(hsm, names, slot.parent);
    let root = state_value(hsm, names, StateId::ROOT);

    w.start_block(format!("void {}({}* self)", history_fn_name(names, slot.id.0), names.mangle_type_name()))?;
    w.start_block(format!("if ({slot_var} != {root})"))?;
    w.line(format!("{}({parent_value}, {slot_var});", enter_down_to_fn_name(names)))?;
    w.line(format!("self->{} = {slot_var};", names.state_id_field_name()))?;
    w.end_block()?;
    w.block("else", |w| {
      w.line(format!("{}({parent_value}, {default_value});", enter_down_to_fn_name(names)))?;
      w.line(format!("self->{} = {default_value};", names.state_id_field_name()))
    })?;
    w.end_block()?;
    w.blank()?;
  }
  Ok(())
}

fn history_fn_name(names: &ResolvedNames, history_id: u32) -> String {
  format!("{}_{}", enter_history_fn_name(names), history_id)
}

/// Global runtime slots backing the history pseudostates, initialized to
/// `ROOT` ("unset"); updated by [`emit_exit_up_to`], consulted by
/// [`emit_enter_history`].
pub fn history_slot_declarations(hsm: &Hsm, tables: &IndexTables, names: &ResolvedNames) -> Vec<String> {
  tables
    .histories
    .iter()
    .map(|slot| {
      format!(
        "static {} {} = {};",
        state_enum_name(names),
        history_slot_var(names, slot.id.0),
        state_value(hsm, names, StateId::ROOT)
      )
    })
    .collect()
}
