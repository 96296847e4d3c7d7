//! Diagnostics sink.
//!
//! Phases push errors and warnings here; the driver renders them once
//! the phase finishes. A diagnostic prints as
//!
//! ```text
//! <file>:<line>:<col>: <severity>: <message>
//! <offending source line, tabs expanded>
//!     ^^^^^
//! ```

use core::fmt;
use std::io;

use span::{SourceMap, Span};

mod color;
pub use color::{set_color, Color};

const TAB_SIZE: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

pub trait Error {
    fn get_span(&self) -> Span;

    fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    fn severity(&self) -> Severity {
        Severity::Error
    }
}

pub struct ErrorManager {
    errors: Vec<Box<dyn Error>>,
    warnings: Vec<Box<dyn Error>>,
}

impl ErrorManager {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn emit_error(&mut self, err: impl Error + 'static) {
        debug_assert!(err.severity() == Severity::Error);
        self.errors.push(Box::new(err));
    }

    pub fn emit_warning(&mut self, warn: impl Error + 'static) {
        debug_assert!(warn.severity() == Severity::Warning);
        self.warnings.push(Box::new(warn));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn n_errors(&self) -> usize {
        self.errors.len()
    }

    pub fn n_warnings(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors(&self) -> &[Box<dyn Error>] {
        &self.errors
    }

    pub fn print_errors(&self, sources: &SourceMap, out: &mut dyn io::Write) -> io::Result<()> {
        self.print(&self.errors, Severity::Error, sources, out)
    }

    pub fn print_warnings(&self, sources: &SourceMap, out: &mut dyn io::Write) -> io::Result<()> {
        self.print(&self.warnings, Severity::Warning, sources, out)
    }

    fn print(
        &self,
        diags: &[Box<dyn Error>],
        severity: Severity,
        sources: &SourceMap,
        out: &mut dyn io::Write,
    ) -> io::Result<()> {
        let mut buf = String::new();
        for diag in diags {
            render(&**diag, severity, sources, &mut buf).unwrap();
            out.write_all(buf.as_bytes())?;
            buf.clear();
        }
        Ok(())
    }
}

impl Default for ErrorManager {
    fn default() -> Self {
        Self::new()
    }
}

fn render(
    diag: &dyn Error,
    severity: Severity,
    sources: &SourceMap,
    out: &mut String,
) -> fmt::Result {
    use fmt::Write;

    let span = diag.get_span();
    let severity_color = match severity {
        Severity::Error => Color::BoldRed,
        Severity::Warning => Color::BoldBlue,
    };

    match sources.get(span.fileid) {
        Some(file) => {
            let pos = span.file_position(&file.contents);
            write!(
                out,
                "{}{}:{pos}: {}{severity}: {}",
                set_color(Color::Bold),
                file.filename(),
                set_color(severity_color),
                set_color(Color::Bold),
            )?;
            diag.write_msg(out)?;
            writeln!(out, "{}", set_color(Color::Normal))?;
            excerpt(&file.contents, span, out)?;
        }
        None => {
            /* Dummy span: message only. */
            write!(
                out,
                "{}{severity}: {}",
                set_color(severity_color),
                set_color(Color::Bold),
            )?;
            diag.write_msg(out)?;
            writeln!(out, "{}", set_color(Color::Normal))?;
        }
    }
    Ok(())
}

/// Prints the source lines the span covers, each followed by a caret
/// line underlining the spanned columns.
fn excerpt(src: &str, span: Span, out: &mut String) -> fmt::Result {
    use fmt::Write;

    let pos = span.file_position(src);

    for (n, line) in src.lines().enumerate() {
        let line_number = n + 1;
        if line_number < pos.from_line {
            continue;
        }
        if line_number > pos.to_line {
            break;
        }

        let expanded = expand_tabs(line);
        writeln!(out, "{expanded}")?;

        let first = expanded.chars().position(|c| c != ' ').unwrap_or(0) + 1;
        let from = if line_number == pos.from_line { pos.from_col } else { first };
        let to = if line_number == pos.to_line {
            pos.to_col
        } else {
            expanded.chars().count()
        };

        for i in 1..=to {
            out.push(if i < from { ' ' } else { '^' });
        }
        out.push('\n');
    }
    Ok(())
}

fn expand_tabs(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut pos = 0;

    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - pos % TAB_SIZE;
            result.extend(core::iter::repeat_n(' ', pad));
            pos += pad;
        } else {
            result.push(c);
            pos += 1;
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    struct Dummy(Span);

    impl Error for Dummy {
        fn get_span(&self) -> Span {
            self.0
        }

        fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result {
            write!(out, "something went wrong")
        }
    }

    #[test]
    fn renders_location_and_caret() {
        let mut sources = SourceMap::default();
        let contents: Rc<str> = "local x: u8;\nx = y;\n".into();
        let id = sources.add_file_anon(contents).id;

        let mut em = ErrorManager::new();
        em.emit_error(Dummy(Span::new(17, 1, id))); // the 'y'
        assert!(em.has_errors());

        let mut out = Vec::new();
        em.print_errors(&sources, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("<anon>:2:5"));
        assert!(text.contains("something went wrong"));
        assert!(text.contains("    ^"));
    }

    #[test]
    fn tabs_expand_to_eight_columns() {
        assert_eq!(expand_tabs("\ta"), "        a");
        assert_eq!(expand_tabs("ab\tc"), "ab      c");
    }
}
