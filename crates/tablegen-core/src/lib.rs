//! `tablegen-core` compiles a resolved hierarchical-state-machine (HSM) graph
//! into a single flat transition table plus a dispatcher, and renders both as
//! target source text.
//!
//! The pipeline, leaves first:
//!
//! 1. [`collect::index_builders`] assigns dense ids to states, events and
//!    history pseudostates.
//! 2. [`collect::transitions`] walks the graph once, expanding inherited
//!    transitions into a flat, ordered [`types::TransitionEntry`] list.
//! 3. [`emit`] renders the resulting [`types::IndexTables`] as C99 source text:
//!    structural tables, guard/action dispatch blocks, the LCA-based runtime
//!    protocol, and the surrounding struct/enum declarations.
//!
//! Diagram parsing, identifier mangling and guard/action text expansion are
//! external collaborators (see [`collaborators`]); this crate only consumes
//! their output.

pub mod collaborators;
pub mod collect;
pub mod config;
pub mod emit;
pub mod error;
pub mod journal;
pub mod types;

pub use collaborators::{Expander, NameMangler};
pub use config::{Algorithm, RenderConfig, Transpiler};
pub use error::{EmitError, EmitResult};
pub use journal::{Journal, Report, ReportSeverity};
pub use types::{
  Behavior, HistoryKind, HistoryPseudostate, Hsm, InitialPseudostate, NamedVertex, StateId,
};

/// Stateful front end for one emission. Mirrors the bind-then-build shape the
/// rest of the workspace uses for its own compilation drivers: nothing is
/// generated until an HSM, a mangler and an expander have all been bound.
pub struct Driver<'a> {
  hsm: Option<&'a Hsm>,
  mangler: Option<&'a dyn NameMangler>,
  expander: Option<&'a dyn Expander>,
  config: RenderConfig,
}

impl<'a> Driver<'a> {
  pub fn new(config: RenderConfig) -> Self {
    Self { hsm: None, mangler: None, expander: None, config }
  }

  pub fn bind_hsm(&mut self, hsm: &'a Hsm) -> &mut Self {
    self.hsm = Some(hsm);
    self
  }

  pub fn bind_mangler(&mut self, mangler: &'a dyn NameMangler) -> &mut Self {
    self.mangler = Some(mangler);
    self
  }

  pub fn bind_expander(&mut self, expander: &'a dyn Expander) -> &mut Self {
    self.expander = Some(expander);
    self
  }

  /// Runs the full pipeline and returns the generated source text.
  ///
  /// Fails with [`EmitError::NullStateMachine`] if called before an HSM,
  /// mangler and expander have all been bound (§7 of the design doc this
  /// crate implements).
  pub fn generate(&self, journal: &mut Journal) -> EmitResult<String> {
    let hsm = self.hsm.ok_or(EmitError::NullStateMachine)?;
    let mangler = self.mangler.ok_or(EmitError::NullStateMachine)?;
    let expander = self.expander.ok_or(EmitError::NullStateMachine)?;

    emit::driver::generate(hsm, mangler, expander, &self.config, journal)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::collaborators::{IdentityExpander, PassthroughMangler};

  #[test]
  fn generate_before_binding_fails() {
    let config = RenderConfig::default();
    let driver = Driver::new(config);
    let mut journal = Journal::new();
    assert!(matches!(driver.generate(&mut journal), Err(EmitError::NullStateMachine)));
  }

  #[test]
  fn generate_with_missing_initial_state_fails() {
    let hsm = Hsm::new(vec![NamedVertex::new("A", None, 1)], vec!["GO".into()], vec![]);
    let mangler = PassthroughMangler;
    let expander = IdentityExpander;
    let config = RenderConfig::default();
    let mut driver = Driver::new(config);
    driver.bind_hsm(&hsm).bind_mangler(&mangler).bind_expander(&expander);
    let mut journal = Journal::new();
    assert!(matches!(driver.generate(&mut journal), Err(EmitError::MissingInitialState)));
  }
}
