use std::fmt;

use crate::span::Span;

/// A configuration error with an optional location in the source.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Render the diagnostic to stderr using ariadne.
    ///
    /// Diagnostics without a location (CLI flags, defaults) fall back to a
    /// plain `error: ...` line.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        if self.span.is_dummy() || self.span.end > source.len() {
            self.render_plain();
            return;
        }

        let mut report = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.range()))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if report
            .finish()
            .eprint((filename, Source::from(source)))
            .is_err()
        {
            self.render_plain();
        }
    }

    /// Render the diagnostic to stderr without source context.
    pub fn render_plain(&self) {
        eprintln!("{}", self);
        for note in &self.notes {
            eprintln!("  note: {}", note);
        }
        if let Some(help) = &self.help {
            eprintln!("  help: {}", help);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

/// Render a list of diagnostics.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    for diag in diagnostics {
        diag.render(filename, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let d = Diagnostic::error("batch must be at least 1".to_string(), Span::new(10, 15));
        assert_eq!(d.message, "batch must be at least 1");
        assert_eq!(d.span.start, 10);
        assert_eq!(d.span.end, 15);
        assert!(d.notes.is_empty());
        assert!(d.help.is_none());
    }

    #[test]
    fn test_with_note_and_help() {
        let d = Diagnostic::error("bad value".to_string(), Span::dummy())
            .with_note("first note".to_string())
            .with_note("second note".to_string())
            .with_help("use a positive integer".to_string());
        assert_eq!(d.notes.len(), 2);
        assert_eq!(d.help.as_deref(), Some("use a positive integer"));
    }

    #[test]
    fn test_display_prefixes_error() {
        let e = Diagnostic::error("oops".to_string(), Span::dummy());
        assert_eq!(e.to_string(), "error: oops");
    }
}
