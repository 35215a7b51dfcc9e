//! §4.6 Driver: orchestrates the collection pass and every emit phase into
//! one generated source text.

use crate::{
  collaborators::{Expander, NameMangler},
  collect,
  config::RenderConfig,
  error::EmitResult,
  journal::Journal,
  types::Hsm,
};

use super::{
  behavior,
  names::{self, ResolvedNames},
  runtime_protocol,
  structural::{self, event_enum_name, state_enum_name},
  writer::CodeWriter,
};

pub fn generate(
  hsm: &Hsm,
  mangler: &dyn NameMangler,
  expander: &dyn Expander,
  config: &RenderConfig,
  journal: &mut Journal,
) -> EmitResult<String> {
  let tables = collect::build(hsm, journal)?;
  let names = names::resolve(hsm, &tables.events, mangler)?;
  let type_name = names.mangle_type_name();

  let mut w = CodeWriter::new();

  w.line(format!(
    "/* Generated by tablegen-core ({:?} / {:?}). Not thread-safe: callers must serialize start()/dispatch_event(). */",
    config.algorithm(),
    config.transpiler()
  ))?;
  w.blank()?;

  structural::emit_state_enum(&mut w, hsm, &names)?;
  structural::emit_event_enum(&mut w, &tables, &names)?;
  structural::emit_history_enums(&mut w, hsm, &tables, &names)?;
  structural::emit_guard_action_id_types(&mut w, &names)?;
  structural::emit_transition_row_type(&mut w, &names)?;

  let has_vars = !hsm.variable_decls.is_empty() || !config.variable_decls().is_empty();
  if has_vars {
    w.start_block(format!("typedef struct {type_name}Vars"))?;
    for decl in hsm.variable_decls.iter().chain(config.variable_decls().iter()) {
      w.line(format!("{decl};"))?;
    }
    w.end_block_with(format!("}} {type_name}Vars;"))?;
    w.blank()?;
  }

  w.start_block(format!("typedef struct {type_name}"))?;
  w.line(format!("{} {};", state_enum_name(&names), names.state_id_field_name()))?;
  if has_vars {
    w.line(format!("{type_name}Vars vars;"))?;
  }
  w.end_block_with(format!("}} {type_name};"))?;
  w.blank()?;

  structural::emit_static_tables(&mut w, hsm, &tables, &names)?;

  for decl in runtime_protocol::history_slot_declarations(hsm, &tables, &names) {
    w.line(decl)?;
  }
  if !tables.histories.is_empty() {
    w.blank()?;
  }

  runtime_protocol::emit_lookup_helpers(&mut w, hsm, &tables, &names)?;
  runtime_protocol::emit_state_lifecycle_dispatch(&mut w, hsm, &names, expander)?;
  runtime_protocol::emit_exit_up_to(&mut w, hsm, &tables, &names)?;
  runtime_protocol::emit_enter_down_to(&mut w, hsm, &tables, &names)?;
  behavior::emit_evaluate_guard(&mut w, hsm, &tables.guard_behaviors, &names, expander)?;
  behavior::emit_execute_action(&mut w, hsm, &tables.action_behaviors, &names, expander)?;
  runtime_protocol::emit_perform_transition(&mut w, &tables, &names)?;
  runtime_protocol::emit_dispatch_event(&mut w, &tables, &names)?;
  runtime_protocol::emit_start(&mut w, hsm, &tables, &names, expander)?;
  runtime_protocol::emit_enter_history(&mut w, hsm, &tables, &names)?;

  if config.emits_to_string_helpers() {
    emit_to_string_helpers(&mut w, hsm, &tables, &names)?;
  }

  if journal.has_errors() {
    return Err(crate::error::EmitError::Text("collection pass reported one or more errors".to_string()));
  }

  Ok(w.finish())
}

fn emit_to_string_helpers(
  w: &mut CodeWriter,
  hsm: &Hsm,
  tables: &crate::types::IndexTables,
  names: &ResolvedNames,
) -> EmitResult<()> {
  let state_ty = state_enum_name(names);
  w.start_block(format!("static const char* {}_state_id_to_string({state_ty} id)", names.mangle_type_name()))?;
  w.start_block("switch (id)")?;
  for (i, vertex) in hsm.states.iter().enumerate() {
    w.line(format!(
      "case {}: return \"{}\";",
      structural::state_value(hsm, names, crate::types::StateId(i as u32)),
      vertex.name
    ))?;
  }
  w.line("default: return \"ROOT\";")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;

  let event_ty = event_enum_name(names);
  w.start_block(format!("static const char* {}_event_id_to_string({event_ty} id)", names.mangle_type_name()))?;
  w.start_block("switch (id)")?;
  for event in &tables.events {
    w.line(format!("case {}: return \"{event}\";", structural::event_value(names, event)))?;
  }
  w.line("default: return \"?\";")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    collaborators::{IdentityExpander, PassthroughMangler},
    types::{Behavior, InitialPseudostate, NamedVertex, StateId},
  };

  fn flat_two_state_hsm() -> Hsm {
    let a = NamedVertex::new("A", None, 1).with_behaviors(vec![Behavior::transition(&["GO"], StateId(1))]);
    let b = NamedVertex::new("B", None, 1);
    Hsm::new(vec![a, b], vec!["GO".into()], vec![])
      .with_root_initial(InitialPseudostate { action_text: None, target: StateId(0) })
  }

  #[test]
  fn generates_nonempty_deterministic_output() {
    let hsm = flat_two_state_hsm();
    let mangler = PassthroughMangler;
    let expander = IdentityExpander;
    let config = RenderConfig::default();

    let mut j1 = Journal::new();
    let out1 = generate(&hsm, &mangler, &expander, &config, &mut j1).unwrap();
    let mut j2 = Journal::new();
    let out2 = generate(&hsm, &mangler, &expander, &config, &mut j2).unwrap();

    assert_eq!(out1, out2);
    assert!(out1.contains("StateMachineState"));
    assert!(out1.contains("dispatch_event"));
    assert!(out1.contains("start"));
  }

  #[test]
  fn includes_vars_struct_only_when_declared() {
    let hsm = flat_two_state_hsm();
    let mangler = PassthroughMangler;
    let expander = IdentityExpander;

    let without_vars = generate(&hsm, &mangler, &expander, &RenderConfig::default(), &mut Journal::new()).unwrap();
    assert!(!without_vars.contains("Vars"));

    let with_vars = generate(
      &hsm,
      &mangler,
      &expander,
      &RenderConfig::default().with_variable_decl("int counter"),
      &mut Journal::new(),
    )
    .unwrap();
    assert!(with_vars.contains("Vars"));
    assert!(with_vars.contains("int counter;"));
  }
}
