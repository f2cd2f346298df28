use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so a phase can report every problem it finds
/// instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fails with every collected diagnostic, in emission order.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_empty_collector_succeeds() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_errors_keep_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("duplicate parameter `n`")
                .with_code(ErrorCode::E201)
                .with_label(Span::new(8..9), "duplicate"),
        );
        collector.emit(
            Diagnostic::error("duplicate parameter `n`")
                .with_code(ErrorCode::E201)
                .with_label(Span::new(11..12), "duplicate"),
        );

        let err = collector.finish().expect_err("an error was emitted");
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E201));
    }
}
