//! Error codes of the script compiler.
//!
//! Codes are grouped by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Validation errors

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// A string literal was opened but never closed on the same line.
    E001,

    /// A character that cannot start any token.
    E002,

    /// An unrecognized escape sequence in a string literal.
    ///
    /// Valid escapes are `\n`, `\r`, `\t`, `\\`, `\'`, `\"`, `\0` and `\u{...}`.
    E003,

    /// A malformed `\u{XXXX}` escape.
    E004,

    /// A unicode escape outside the valid codepoint ranges.
    E005,

    /// A number literal that does not fit its type.
    E006,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// The parser found a token it did not expect at this position.
    E100,

    /// The script ended before a construct was complete.
    E101,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Two functions share a name.
    E200,

    /// A function declares the same parameter twice.
    E201,

    /// A top-level constant shares its name with another top-level item.
    E202,

    /// Brackets, parentheses and blocks are nested deeper than allowed.
    E203,

    /// The left side of an assignment is not a variable, field or index.
    E204,

    /// A call passes a positional argument after a keyword argument.
    E205,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
        }
    }

    /// Returns a short description used as the default label text
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "invalid unicode codepoint",
            ErrorCode::E006 => "number literal out of range",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "duplicate function",
            ErrorCode::E201 => "duplicate parameter",
            ErrorCode::E202 => "duplicate top-level name",
            ErrorCode::E203 => "nesting too deep",
            ErrorCode::E204 => "invalid assignment target",
            ErrorCode::E205 => "positional argument after keyword argument",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_description() {
        assert_eq!(ErrorCode::E006.to_string(), "E006");
        assert_eq!(ErrorCode::E203.as_str(), "E203");
        assert_eq!(ErrorCode::E204.description(), "invalid assignment target");
    }
}
