//! The emitter's error taxonomy (§7). Hand-rolled rather than derive-macro
//! generated, matching the rest of the workspace's core error type: a small
//! closed set of named variants plus a catch-all `Text` arm for messages that
//! don't warrant their own variant.

use core::fmt;
use std::error::Error as StdError;

use crate::types::StateId;

#[derive(Debug, Clone)]
pub enum EmitError {
  /// The HSM's root has no initial pseudostate, or (defensively) its target
  /// does not resolve to a real state.
  MissingInitialState,

  /// `Driver::generate` was called before an HSM, mangler and expander were
  /// all bound.
  NullStateMachine,

  /// The HSM declares orthogonal (parallel) regions. Unsupported — an
  /// explicit Non-goal, not a silent downgrade.
  TableOverflowRisk,

  /// The Name Mangler rejected a name while mangling `state`. Wraps the
  /// mangler's own message.
  NameMangling { state: String, reason: String },

  /// Catch-all for anything else worth surfacing as a hard failure (I/O on
  /// the CLI side, formatter errors bubbled up from the writer, etc.).
  Text(String),
}

impl fmt::Display for EmitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingInitialState => {
        write!(f, "HSM root has no initial pseudostate, or its target is not a valid state")
      }
      Self::NullStateMachine => write!(f, "generate() called before an HSM/mangler/expander were bound"),
      Self::TableOverflowRisk => write!(f, "orthogonal (parallel) regions are not supported by this emitter"),
      Self::NameMangling { state, reason } => write!(f, "name mangling failed for state `{state}`: {reason}"),
      Self::Text(msg) => write!(f, "{msg}"),
    }
  }
}

impl StdError for EmitError {}

impl From<fmt::Error> for EmitError {
  fn from(e: fmt::Error) -> Self {
    Self::Text(e.to_string())
  }
}

pub type EmitResult<T> = Result<T, EmitError>;

/// Helper used by the collector/emitters to name the offending state by its
/// original (pre-mangled) name in diagnostics, per §7's requirement.
pub fn state_name<'a>(hsm: &'a crate::types::Hsm, id: StateId) -> &'a str {
  hsm.state(id).map(|s| s.name.as_str()).unwrap_or("ROOT")
}
