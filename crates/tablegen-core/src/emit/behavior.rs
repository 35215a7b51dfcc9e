//! §4.4 Behavior Table Emitter: `EvaluateGuard`/`ExecuteAction` dispatch
//! blocks keyed by guard/action index, with bodies supplied by the Expander.

use crate::{
  collaborators::Expander,
  error::EmitResult,
  types::{Behavior, BehaviorRef, Hsm},
};

use super::{
  names::ResolvedNames,
  structural::{action_id_type_name, guard_id_type_name},
  writer::CodeWriter,
};

fn resolve<'a>(hsm: &'a Hsm, r: &BehaviorRef) -> Option<&'a Behavior> {
  hsm.state(r.owner).and_then(|v| v.behaviors.get(r.index))
}

pub fn evaluate_guard_fn_name(names: &ResolvedNames) -> String {
  format!("{}_EvaluateGuard", names.mangle_type_name())
}

pub fn execute_action_fn_name(names: &ResolvedNames) -> String {
  format!("{}_ExecuteAction", names.mangle_type_name())
}

pub fn emit_evaluate_guard(
  w: &mut CodeWriter,
  hsm: &Hsm,
  guard_behaviors: &[BehaviorRef],
  names: &ResolvedNames,
  expander: &dyn Expander,
) -> EmitResult<()> {
  w.start_block(format!(
    "static int {}({} guard_index)",
    evaluate_guard_fn_name(names),
    guard_id_type_name(names)
  ))?;
  w.start_block("switch (guard_index)")?;
  w.line("case 0: return 1;")?;
  for (idx, r) in guard_behaviors.iter().enumerate().skip(1) {
    let Some(behavior) = resolve(hsm, r) else { continue };
    w.line(format!("case {idx}: return {};", expander.expand_guard(behavior)))?;
  }
  w.line("default: return 0;")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}

pub fn emit_execute_action(
  w: &mut CodeWriter,
  hsm: &Hsm,
  action_behaviors: &[BehaviorRef],
  names: &ResolvedNames,
  expander: &dyn Expander,
) -> EmitResult<()> {
  w.start_block(format!(
    "static void {}({} action_index)",
    execute_action_fn_name(names),
    action_id_type_name(names)
  ))?;
  w.start_block("switch (action_index)")?;
  w.line("case 0: break;")?;
  for (idx, r) in action_behaviors.iter().enumerate().skip(1) {
    let Some(behavior) = resolve(hsm, r) else { continue };
    let body = expander.expand_action(behavior);
    if !body.is_empty() {
      w.line(format!("case {idx}: {{ {body}; break; }}"))?;
    } else {
      w.line(format!("case {idx}: break;"))?;
    }
  }
  w.line("default: break;")?;
  w.end_block()?;
  w.end_block()?;
  w.blank()?;
  Ok(())
}
