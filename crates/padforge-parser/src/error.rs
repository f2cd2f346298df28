//! Diagnostics produced while compiling a footprint script.
//!
//! A [`Diagnostic`] carries an optional [`ErrorCode`], labeled
//! source spans and help text. Every phase (lexing, parsing, validation)
//! reports through it, and one or more diagnostics are returned together as a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use padforge_parser::error::{Diagnostic, ErrorCode};
//! # use padforge_parser::Span;
//! let diag = Diagnostic::error("function `pads` is defined multiple times")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(120..124), "duplicate definition")
//!     .with_secondary_label(Span::new(3..7), "first defined here")
//!     .with_help("rename one of the functions");
//! assert_eq!(diag.to_string(), "error[E200]: function `pads` is defined multiple times");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
