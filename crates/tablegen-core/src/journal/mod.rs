//! The emission session's diagnostics log (§1.1, §5). Distinct from a logging
//! backend: nothing here writes to stderr by itself, it just accumulates
//! [`Report`]s the caller can inspect, print, or forward to whatever logging
//! the host application already uses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportSeverity {
  Hint,
  Warning,
  Error,
}

#[derive(Debug, Clone)]
pub struct Report {
  pub severity: ReportSeverity,
  pub message: String,
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{:?}] {}", self.severity, self.message)
  }
}

/// Accumulates [`Report`]s raised while walking the HSM. One `Journal` is
/// created per `generate()` call; it is never shared across emissions.
#[derive(Debug, Default)]
pub struct Journal {
  reports: Vec<Report>,
}

impl Journal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn report(&mut self, severity: ReportSeverity, message: impl Into<String>) {
    self.reports.push(Report { severity, message: message.into() });
  }

  pub fn hint(&mut self, message: impl Into<String>) {
    self.report(ReportSeverity::Hint, message);
  }

  pub fn warn(&mut self, message: impl Into<String>) {
    self.report(ReportSeverity::Warning, message);
  }

  pub fn reports(&self) -> &[Report] {
    &self.reports
  }

  pub fn has_errors(&self) -> bool {
    self.reports.iter().any(|r| r.severity == ReportSeverity::Error)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accumulates_in_order() {
    let mut j = Journal::new();
    j.hint("a");
    j.warn("b");
    assert_eq!(j.reports().len(), 2);
    assert_eq!(j.reports()[0].severity, ReportSeverity::Hint);
    assert_eq!(j.reports()[1].severity, ReportSeverity::Warning);
    assert!(!j.has_errors());
  }
}
