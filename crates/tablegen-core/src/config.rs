//! Render configuration recognized by the Driver (§6 "Configuration
//! recognized"). A small fluent builder, the same shape the rest of the
//! workspace uses for its own compile-time configuration types.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
  /// The flat-transition-table dispatcher this crate implements.
  Table1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpiler {
  /// The only supported sink today; other targets are future work (§6).
  C99,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
  algorithm: Algorithm,
  transpiler: Transpiler,
  /// Spliced one-per-line into the generated `Vars` sub-struct (§4.6, §6).
  variable_decls: Vec<String>,
  /// Emit `state_id_to_string`/`event_id_to_string` helpers (§4.6, §6).
  emit_to_string_helpers: bool,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      algorithm: Algorithm::Table1,
      transpiler: Transpiler::C99,
      variable_decls: Vec::new(),
      emit_to_string_helpers: true,
    }
  }
}

impl RenderConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
    self.algorithm = algorithm;
    self
  }

  pub fn with_transpiler(mut self, transpiler: Transpiler) -> Self {
    self.transpiler = transpiler;
    self
  }

  pub fn with_variable_decl(mut self, decl: impl Into<String>) -> Self {
    self.variable_decls.push(decl.into());
    self
  }

  pub fn without_to_string_helpers(mut self) -> Self {
    self.emit_to_string_helpers = false;
    self
  }

  pub fn algorithm(&self) -> Algorithm {
    self.algorithm
  }

  pub fn transpiler(&self) -> Transpiler {
    self.transpiler
  }

  pub fn variable_decls(&self) -> &[String] {
    &self.variable_decls
  }

  pub fn emits_to_string_helpers(&self) -> bool {
    self.emit_to_string_helpers
  }
}
