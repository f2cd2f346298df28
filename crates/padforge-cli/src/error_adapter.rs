//! Error adapter for rendering CLI failures through miette.
//!
//! Script faults already implement [`miette::Diagnostic`] and carry their own
//! source snippet. [`ErrorAdapter`] gives host errors (configuration, I/O,
//! JSON output) the same rendering, with a stable code and a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan};

use padforge::PadforgeError;

/// Adapter for [`PadforgeError`], which has no source location.
pub struct ErrorAdapter<'a>(pub &'a PadforgeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PadforgeError::Io(_) => "padforge::io",
            PadforgeError::Json(_) => "padforge::json",
            PadforgeError::Config(_) => "padforge::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            PadforgeError::Config(_) => Some(Box::new(
                "configuration files hold a `[limits]` and an `[output]` table",
            )),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Renders any diagnostic with miette's graphical handler.
pub fn render(diagnostic: &dyn MietteDiagnostic) -> String {
    let mut out = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut out, diagnostic)
        .is_err()
    {
        out = diagnostic.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_codes() {
        let err = PadforgeError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().map(|c| c.to_string()).as_deref(), Some("padforge::io"));
        assert!(adapter.help().is_none());

        let err = PadforgeError::Config("bad".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("padforge::config")
        );
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_render_includes_message() {
        let err = PadforgeError::Config("unknown limit".to_string());
        let report = render(&ErrorAdapter(&err));
        assert!(report.contains("Configuration error: unknown limit"), "{report}");
        assert!(report.contains("padforge::config"), "{report}");
    }
}
