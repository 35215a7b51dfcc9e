//! Thin CLI front-end: reads a JSON-described HSM (with names already
//! mangled and guard/action bodies already expanded, per the out-of-scope
//! Name Mangler/Expander) and writes the generated source to a file or
//! stdout.

use std::{
  fs,
  io::{self, Write as _},
  path::PathBuf,
  process::ExitCode,
};

use clap::Parser;
use serde::Deserialize;
use tablegen_core::{
  collaborators::{Expander, IdentityExpander, NameMangler},
  config::RenderConfig,
  journal::Journal,
  types::{Behavior, HistoryKind, HistoryPseudostate, Hsm, InitialPseudostate, NamedVertex, StateId},
  Driver,
};

#[derive(Parser, Debug)]
#[command(name = "tablegen", about = "Flattens a JSON-described HSM into a flat-table C99 state machine")]
struct Args {
  /// Path to the JSON-described HSM. `-` reads from stdin.
  input: PathBuf,

  /// Output path for the generated source. `-` (the default) writes to stdout.
  #[arg(short, long, default_value = "-")]
  output: String,

  /// Skip emitting the `*_state_id_to_string`/`*_event_id_to_string` helpers.
  #[arg(long)]
  no_to_string_helpers: bool,
}

#[derive(Debug, Deserialize)]
struct HsmDoc {
  type_name: String,
  states: Vec<StateDoc>,
  events: Vec<String>,
  #[serde(default)]
  variable_decls: Vec<String>,
  root_initial: Option<InitialDoc>,
  #[serde(default)]
  has_orthogonal_regions: bool,
}

#[derive(Debug, Deserialize)]
struct StateDoc {
  name: String,
  parent: Option<u32>,
  depth: u32,
  #[serde(default)]
  behaviors: Vec<BehaviorDoc>,
  initial: Option<InitialDoc>,
  history: Option<HistoryDoc>,
}

#[derive(Debug, Deserialize)]
struct BehaviorDoc {
  triggers: Vec<String>,
  guard: Option<String>,
  action: Option<String>,
  target: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct InitialDoc {
  action: Option<String>,
  target: u32,
}

#[derive(Debug, Deserialize)]
struct HistoryDoc {
  #[serde(default)]
  deep: bool,
  id: u32,
}

struct JsonMangler {
  type_name: String,
}

impl NameMangler for JsonMangler {
  fn mangle_type_name(&self) -> Result<String, String> {
    Ok(self.type_name.clone())
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

fn main() -> ExitCode {
  let args = Args::parse();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(msg) => {
      eprintln!("tablegen: {msg}");
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<(), String> {
  let input_text = if args.input.as_os_str() == "-" {
    io::read_to_string(io::stdin()).map_err(|e| format!("reading stdin: {e}"))?
  } else {
    fs::read_to_string(&args.input).map_err(|e| format!("reading {}: {e}", args.input.display()))?
  };

  let doc: HsmDoc = serde_json::from_str(&input_text).map_err(|e| format!("parsing input JSON: {e}"))?;
  let hsm = hsm_from_doc(&doc);

  let mangler = JsonMangler { type_name: doc.type_name.clone() };
  let expander = IdentityExpander;
  let mut config = RenderConfig::default();
  for decl in &doc.variable_decls {
    config = config.with_variable_decl(decl.clone());
  }
  if args.no_to_string_helpers {
    config = config.without_to_string_helpers();
  }

  let mut driver = Driver::new(config);
  driver.bind_hsm(&hsm).bind_mangler(&mangler as &dyn NameMangler).bind_expander(&expander as &dyn Expander);

  let mut journal = Journal::new();
  let generated = driver.generate(&mut journal).map_err(|e| e.to_string())?;

  for report in journal.reports() {
    eprintln!("tablegen: {report}");
  }

  if args.output == "-" {
    io::stdout().write_all(generated.as_bytes()).map_err(|e| format!("writing stdout: {e}"))?;
  } else {
    fs::write(&args.output, generated).map_err(|e| format!("writing {}: {e}", args.output))?;
  }

  Ok(())
}

fn hsm_from_doc(doc: &HsmDoc) -> Hsm {
  let states = doc
    .states
    .iter()
    .map(|s| {
      let mut vertex = NamedVertex::new(&s.name, s.parent.map(StateId), s.depth).with_behaviors(
        s.behaviors
          .iter()
          .map(|b| {
            let mut behavior = match b.target {
              Some(t) => Behavior::transition(&triggers(&b.triggers), StateId(t)),
              None => Behavior::lifecycle(b.triggers.first().map(String::as_str).unwrap_or("enter")),
            };
            if let (Some(guard), Some(t)) = (&b.guard, b.target) {
              behavior = Behavior::guarded_transition(&triggers(&b.triggers), guard, StateId(t));
            }
            if let Some(action) = &b.action {
              behavior = behavior.with_action(action);
            }
            behavior
          })
          .collect(),
      );
      if let Some(init) = &s.initial {
        vertex = vertex.with_initial(InitialPseudostate { action_text: init.action.clone(), target: StateId(init.target) });
      }
      if let Some(history) = &s.history {
        vertex = vertex.with_history(HistoryPseudostate {
          kind: if history.deep { HistoryKind::Deep } else { HistoryKind::Shallow },
          id: tablegen_core::types::HistoryId(history.id),
        });
      }
      vertex
    })
    .collect();

  let mut hsm = Hsm::new(states, doc.events.clone(), doc.variable_decls.clone());
  hsm.has_orthogonal_regions = doc.has_orthogonal_regions;
  if let Some(initial) = &doc.root_initial {
    hsm = hsm.with_root_initial(InitialPseudostate { action_text: initial.action.clone(), target: StateId(initial.target) });
  }
  hsm
}

fn triggers(names: &[String]) -> Vec<&str> {
  names.iter().map(String::as_str).collect()
}
