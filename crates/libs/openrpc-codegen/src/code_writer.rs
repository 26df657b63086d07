//! Indentation-aware text writer used by the emitters.
//!
//! Indentation is held in an `Rc<Cell<usize>>` so an [`IndentGuard`] can be
//! alive while the writer is still borrowed mutably:
//!
//! ```
//! use openrpc_codegen::code_writer::CodeWriter;
//!
//! let mut out = String::new();
//! let mut w = CodeWriter::new(&mut out, "    ");
//! w.block_colon("class Foo", |w| w.writeln("pass")).unwrap();
//! assert_eq!(out, "class Foo:\n    pass\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    indent: String,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    pub fn new(writer: W, indent: impl Into<String>) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            indent: indent.into(),
            at_line_start: true,
        }
    }

    /// Write text, indenting first when at the start of a line.
    ///
    /// Embedded newlines are honoured so every line of a multi-line string is indented.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            if !line.is_empty() {
                if self.at_line_start {
                    for _ in 0..self.indent_level.get() {
                        self.writer.write_str(&self.indent)?;
                    }
                    self.at_line_start = false;
                }
                self.writer.write_str(line)?;
            }
            if lines.peek().is_some() {
                self.writer.write_char('\n')?;
                self.at_line_start = true;
            }
        }
        Ok(())
    }

    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    pub fn blank_line(&mut self) -> fmt::Result {
        if !self.at_line_start {
            self.writer.write_char('\n')?;
        }
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Indent until the returned guard is dropped
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// `header {` body `}`
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.writeln(&format!("{header} {{"))?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln("}")
    }

    /// `header:` followed by an indented body
    pub fn block_colon<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.writeln(&format!("{header}:"))?;
        let _indent = self.indent();
        body(self)
    }

    /// Prefix every line of `text` with `prefix`
    pub fn doc_comment(&mut self, prefix: &str, text: &str) -> fmt::Result {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.writeln(prefix.trim_end())?;
            } else {
                self.writeln(&format!("{prefix} {line}"))?;
            }
        }
        Ok(())
    }

    pub fn write_separated<I, F>(&mut self, items: I, separator: &str, mut write_item: F) -> fmt::Result
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item) -> fmt::Result,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.write(separator)?;
            }
            write_item(self, item)?;
        }
        Ok(())
    }

    #[doc(hidden)]
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.write(&args.to_string())
    }

    #[doc(hidden)]
    pub fn writeln_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.writeln(&args.to_string())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Restores the previous indentation level on drop.
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.indent_level
            .set(self.indent_level.get().saturating_sub(1));
    }
}

/// `write!` for a [`CodeWriter`]
#[macro_export]
macro_rules! cw_write {
    ($writer:expr, $($arg:tt)*) => {
        $writer.write_fmt(format_args!($($arg)*))
    };
}

/// `writeln!` for a [`CodeWriter`]
#[macro_export]
macro_rules! cw_writeln {
    ($writer:expr, $($arg:tt)*) => {
        $writer.writeln_fmt(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_indentation() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");

        w.block("class Foo", |w| {
            w.writeln("x = 1;")?;
            w.block("bar()", |w| w.writeln("return x;"))
        })
        .unwrap();

        assert_eq!(out, "class Foo {\n  x = 1;\n  bar() {\n    return x;\n  }\n}\n");
    }

    #[test]
    fn test_block_colon_and_blank_lines() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "    ");

        w.block_colon("def f()", |w| {
            w.writeln("a = 1")?;
            w.blank_line()?;
            w.writeln("return a")
        })
        .unwrap();
        w.writeln("done").unwrap();

        assert_eq!(out, "def f():\n    a = 1\n\n    return a\ndone\n");
    }

    #[test]
    fn test_multiline_write_is_indented() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "    ");
        let _indent = w.indent();

        w.writeln("first\nsecond").unwrap();

        assert_eq!(out, "    first\n    second\n");
    }

    #[test]
    fn test_doc_comment_and_separated() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");

        w.doc_comment(" *", "Line one\n\nLine two").unwrap();
        w.write_separated(["a", "b", "c"], ", ", |w, item| w.write(item))
            .unwrap();

        assert_eq!(out, " * Line one\n *\n * Line two\na, b, c");
    }

    #[test]
    fn test_macros() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");

        cw_write!(w, "let {} = ", "x").unwrap();
        cw_writeln!(w, "{};", 42).unwrap();

        assert_eq!(out, "let x = 42;\n");
    }
}
