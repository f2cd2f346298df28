//! # Padforge Parser
//!
//! Front end of the footprint script language: source text goes through
//! tokenization, a nesting check, parsing and validation, and comes out as a
//! [`ast::Script`].
//!
//! ## Usage
//!
//! ```
//! # use padforge_parser::{parse, ParserConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         fn footprint() {
//!             return [Reference(), Smd(1, (1.0, 1.0))];
//!         }
//!     "#;
//!
//!     let script = parse(source, &ParserConfig::default())?;
//!     assert!(script.function("footprint").is_some());
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod error;
mod lexer;
mod parser;
#[cfg(test)]
mod parser_tests;
mod span;
mod tokens;
mod validate;

pub use span::{Span, Spanned};

use log::{debug, trace};

use error::ParseError;

/// Default bracket nesting limit of [`ParserConfig`].
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Default expression tree depth limit of [`ParserConfig`].
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 256;

/// Limits applied while compiling a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    max_nesting: usize,
    max_expression_depth: usize,
}

impl ParserConfig {
    pub fn new(max_nesting: usize, max_expression_depth: usize) -> Self {
        Self {
            max_nesting,
            max_expression_depth,
        }
    }

    /// Maximum depth of nested brackets, parentheses and blocks
    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    /// Maximum depth of a single expression tree, counting operator chains
    pub fn max_expression_depth(&self) -> usize {
        self.max_expression_depth
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING, DEFAULT_MAX_EXPRESSION_DEPTH)
    }
}

/// Parse script source text into a validated syntax tree.
///
/// The pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens, reporting every lexical error
/// 2. **Check nesting** - Reject bracket nesting beyond the configured limit
/// 3. **Parse** - Build the syntax tree from tokens
/// 4. **Validate** - Check names, parameters, assignment targets, arguments
///    and expression depth
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic of the first failing
/// phase.
pub fn parse(source: &str, config: &ParserConfig) -> Result<ast::Script, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;
    trace!(token_count = tokens.len(); "Tokenized script");

    // Step 2: Check nesting
    validate::check_nesting(&tokens, config.max_nesting())?;

    // Step 3: Parse
    let script = parser::build_script(&tokens)?;
    debug!(items = script.items.len(); "Parsed script");

    // Step 4: Validate
    validate::validate_script(&script, config.max_expression_depth())?;
    Ok(script)
}
