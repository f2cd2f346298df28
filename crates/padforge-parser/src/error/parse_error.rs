use std::fmt;

use crate::error::Diagnostic;

/// Failure to compile a script: one or more diagnostics.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_display_single() {
        let err = ParseError::from(Diagnostic::error("unexpected token").with_code(ErrorCode::E100));
        assert_eq!(err.to_string(), "error[E100]: unexpected token");
    }

    #[test]
    fn test_display_counts_the_rest() {
        let err = ParseError::new(vec![
            Diagnostic::error("unterminated string literal"),
            Diagnostic::error("unexpected character"),
            Diagnostic::error("unexpected character"),
        ]);
        assert_eq!(err.to_string(), "error: unterminated string literal (+2 more)");
    }
}
