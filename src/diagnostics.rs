//! Optional, presentation-only rendering of a fatal [`Error`] as an annotated
//! source excerpt. Has no effect on pipeline control flow: stages always
//! return `Result<T, Error>` regardless of whether a driver renders it.

use std::fmt::Write;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::error::Error;

/// Builder for rendering one fatal error against its source text.
pub struct DiagnosticsPrinter<'e, 's> {
    error: &'e Error,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> DiagnosticsPrinter<'e, 's> {
    pub fn new(error: &'e Error, source: &'s str) -> Self {
        Self {
            error,
            source,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let message = self.error.to_string();
        let range = adjust_range(self.error.span().range(), self.source.len());

        let mut snippet = Snippet::source(self.source)
            .line_start(1)
            .annotation(annotate_snippets::AnnotationKind::Primary.span(range).label(&message));

        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let group = Level::ERROR.primary_title(&message).element(snippet);
        write!(w, "{}", renderer.render(&[group]))
    }
}

fn adjust_range(range: std::ops::Range<usize>, limit: usize) -> std::ops::Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}

impl Error {
    /// Shorthand for `(line, col)` of this error's span, given the source it
    /// occurred in. The driver pairs this with its own filename for display.
    pub fn line_col(&self, source: &str) -> (u32, u32) {
        self.span().line_col(source)
    }

    pub fn printer<'e, 's>(&'e self, source: &'s str) -> DiagnosticsPrinter<'e, 's> {
        DiagnosticsPrinter::new(self, source)
    }
}
