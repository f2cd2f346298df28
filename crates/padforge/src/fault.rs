//! Evaluation faults.
//!
//! Every way an evaluation can fail is reported as a [`Fault`]: a
//! [`FaultKind`], a message, labeled source spans, optional help and the
//! chain of script functions that were active. Faults implement
//! [`miette::Diagnostic`] and render as text with [`Fault::report`]:
//!
//! ```text
//! runtime: division by zero
//!    ╭─[TI_WSON_10.fps:3:18]
//!  3 │     let pitch = 1 / 0;
//!    ·                 ──┬──
//!    ·                   ╰── division by zero
//!    ╰────
//!
//! Traceback (most recent call last):
//!   TI_WSON_10.fps:9:12, in footprint
//!   TI_WSON_10.fps:3:17, in pads
//! ```

use std::fmt::{self, Write};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource};
use thiserror::Error;

use padforge_core::record::Record;
use padforge_parser::{
    Span,
    error::{Diagnostic as SyntaxDiagnostic, ParseError},
};

/// The category of a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The script could not be read or is too large
    Load,
    /// Lexing, parsing or validation failed
    Syntax,
    /// `footprint` is missing, not a function, or takes parameters
    EntryPoint,
    /// A script operation failed while running
    Runtime,
    /// The entry point returned something that is not a nesting of elements
    Shape,
    /// The wall-clock or operation budget ran out
    Timeout,
    /// The evaluator itself failed
    Internal,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Syntax => "syntax",
            Self::EntryPoint => "entry point",
            Self::Runtime => "runtime",
            Self::Shape => "shape",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One script function on the call stack when a fault was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    function: String,
    span: Option<Span>,
}

impl Frame {
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Location inside the function that was executing
    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

#[derive(Debug, Clone)]
struct FaultLabel {
    span: Span,
    message: Option<String>,
    primary: bool,
}

/// A failed evaluation.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    labels: Vec<FaultLabel>,
    help: Option<String>,
    /// Innermost frame first
    traceback: Vec<Frame>,
    /// Location in the function currently being unwound
    site: Option<Span>,
    related: Vec<Fault>,
    code: Option<NamedSource<String>>,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            traceback: Vec::new(),
            site: None,
            related: Vec::new(),
            code: None,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Runtime, message)
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Shape, message)
    }

    pub fn entry_point(message: impl Into<String>) -> Self {
        Self::new(FaultKind::EntryPoint, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Internal, message)
    }

    /// Converts compile diagnostics into a syntax fault. The first diagnostic
    /// leads; the rest are attached as related faults.
    pub fn syntax(err: ParseError) -> Self {
        let mut diagnostics = err.into_diagnostics().into_iter().map(Self::from_diagnostic);
        let Some(mut fault) = diagnostics.next() else {
            return Self::new(FaultKind::Syntax, "invalid script");
        };
        fault.related = diagnostics.collect();
        fault
    }

    fn from_diagnostic(diagnostic: SyntaxDiagnostic) -> Self {
        let mut fault = Self::new(FaultKind::Syntax, diagnostic.to_string());
        fault.labels = diagnostic
            .labels()
            .iter()
            .map(|label| FaultLabel {
                span: label.span(),
                message: Some(label.message().to_string()),
                primary: label.is_primary(),
            })
            .collect();
        fault.help = diagnostic.help().map(str::to_string);
        fault
    }

    /// Points the fault at `span` unless it already has a primary location.
    pub fn at(mut self, span: Span) -> Self {
        if self.span().is_none() {
            self.labels.push(FaultLabel {
                span,
                message: None,
                primary: true,
            });
        }
        self
    }

    /// Points the fault at `span` with a label, unless it already has a
    /// primary location.
    pub fn at_labeled(mut self, span: Span, label: impl Into<String>) -> Self {
        if self.span().is_none() {
            self.labels.push(FaultLabel {
                span,
                message: Some(label.into()),
                primary: true,
            });
        }
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Records that the fault unwound out of `function`, which was called
    /// from `call_site` in its caller.
    pub fn leave_function(mut self, function: &str, call_site: Span) -> Self {
        let location = self.site.or_else(|| self.span());
        self.traceback.push(Frame {
            function: function.to_string(),
            span: location,
        });
        self.site = Some(call_site);
        self
    }

    /// Attaches the script text so the report can show source snippets.
    pub fn with_source(mut self, name: &str, text: &str) -> Self {
        self.code = Some(NamedSource::new(name, text.to_string()));
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary source location
    pub fn span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.primary)
            .map(|label| label.span)
    }

    /// Returns the call stack, outermost function first
    pub fn traceback(&self) -> impl Iterator<Item = &Frame> {
        self.traceback.iter().rev()
    }

    /// Returns the faults reported together with this one
    pub fn related_faults(&self) -> &[Fault] {
        &self.related
    }

    /// Renders the fault as plain text: header, source snippet, help and
    /// traceback.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        if handler.render_report(&mut out, self).is_err() {
            out = format!("{self}\n");
        }

        if !self.traceback.is_empty() {
            out.push_str("\nTraceback (most recent call last):\n");
            for frame in self.traceback() {
                // Writing to a String cannot fail
                let _ = writeln!(out, "  {}, in {}", self.location(frame.span), frame.function);
            }
        }
        out
    }

    /// Converts the fault into the record that replaces all output.
    pub fn to_record(&self) -> Record {
        Record::error(self.report())
    }

    fn location(&self, span: Option<Span>) -> String {
        let Some(source) = &self.code else {
            return "<unknown>".to_string();
        };
        match span {
            Some(span) => {
                let (line, column) = line_column(source.inner(), span.start());
                format!("{}:{line}:{column}", source.name())
            }
            None => source.name().to_string(),
        }
    }
}

/// One-based line and column of byte `offset` in `text`. Columns count
/// bytes, as the report header does.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text.as_bytes()[..offset.min(text.len())];
    let line = before.iter().filter(|byte| **byte == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |index| index + 1);
    (line, before.len() - line_start + 1)
}

impl Diagnostic for Fault {
    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.code
            .as_ref()
            .map(|code| code as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.code.is_none() || self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().map(|label| {
            let span = miette::SourceSpan::new(label.span.start().into(), label.span.len());
            if label.primary {
                LabeledSpan::new_primary_with_span(label.message.clone(), span)
            } else {
                LabeledSpan::new_with_span(label.message.clone(), span)
            }
        })))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            return None;
        }
        Some(Box::new(
            self.related.iter().map(|fault| fault as &dyn Diagnostic),
        ))
    }
}
