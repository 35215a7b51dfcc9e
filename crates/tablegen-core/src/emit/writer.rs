//! Indented-writer abstraction (§9 "a minimal indented-writer abstraction
//! rather than ad-hoc string concatenation"). Every emit pass writes through
//! this instead of hand-tracking indentation with `"  ".repeat(depth)`.

use core::fmt::{self, Write as _};

pub struct CodeWriter {
  buf: String,
  indent: usize,
  at_line_start: bool,
}

impl CodeWriter {
  pub fn new() -> Self {
    Self { buf: String::new(), indent: 0, at_line_start: true }
  }

  /// Writes one line at the current indent, appending a newline.
  pub fn line(&mut self, text: impl AsRef<str>) -> fmt::Result {
    self.write_indent_if_needed()?;
    self.buf.push_str(text.as_ref());
    self.buf.push('\n');
    self.at_line_start = true;
    Ok(())
  }

  /// Writes an empty line.
  pub fn blank(&mut self) -> fmt::Result {
    self.buf.push('\n');
    self.at_line_start = true;
    Ok(())
  }

  /// Writes `header` followed by ` {`, increases indent, and returns a guard
  /// that writes the matching `}` (and decreases indent) on drop. Matches the
  /// brace-block shape every generated C99 function/struct/switch needs.
  pub fn start_block(&mut self, header: impl AsRef<str>) -> fmt::Result {
    self.write_indent_if_needed()?;
    self.buf.push_str(header.as_ref());
    self.buf.push_str(" {\n");
    self.at_line_start = true;
    self.indent += 1;
    Ok(())
  }

  pub fn end_block(&mut self) -> fmt::Result {
    self.end_block_with("}")
  }

  /// Like `end_block`, but with a custom closing line (e.g. `} Foo;` for a
  /// C typedef) instead of a bare `}`.
  pub fn end_block_with(&mut self, closing: impl AsRef<str>) -> fmt::Result {
    self.indent = self.indent.saturating_sub(1);
    self.write_indent_if_needed()?;
    self.buf.push_str(closing.as_ref());
    self.buf.push('\n');
    self.at_line_start = true;
    Ok(())
  }

  /// Runs `body`, wrapping it in `start_block`/`end_block`.
  pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
    self.start_block(header)?;
    body(self)?;
    self.end_block()
  }

  fn write_indent_if_needed(&mut self) -> fmt::Result {
    if self.at_line_start {
      for _ in 0..self.indent {
        self.buf.push_str("  ");
      }
      self.at_line_start = false;
    }
    Ok(())
  }

  pub fn finish(self) -> String {
    self.buf
  }
}

impl Default for CodeWriter {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Write for CodeWriter {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    for (i, part) in s.split('\n').enumerate() {
      if i > 0 {
        self.buf.push('\n');
        self.at_line_start = true;
      }
      if !part.is_empty() {
        self.write_indent_if_needed()?;
        self.buf.push_str(part);
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn indents_nested_blocks() {
    let mut w = CodeWriter::new();
    w.block("void f()", |w| {
      w.line("int x = 0;")?;
      w.block("if (x)", |w| w.line("return;"))
    })
    .unwrap();
    let out = w.finish();
    assert_eq!(out, "void f() {\n  int x = 0;\n  if (x) {\n    return;\n  }\n}\n");
  }

  #[test]
  fn write_macro_respects_indent() {
    let mut w = CodeWriter::new();
    w.start_block("struct S").unwrap();
    write!(w, "int {};\n", "field").unwrap();
    w.end_block().unwrap();
    assert_eq!(w.finish(), "struct S {\n  int field;\n}\n");
  }
}
