//! Token definitions for footprint scripts.

use std::fmt;

use crate::span::Span;

/// A lexical token of the footprint script language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    // Keywords
    Fn,
    Let,
    Return,
    If,
    Else,
    For,
    In,
    True,
    False,
    None,
    And,
    Or,
    Not,

    // Literals and names
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    Identifier(&'a str),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equals,
    EqualsEquals,
    BangEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Semicolon,

    // Trivia
    LineComment(&'a str),
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns true for whitespace, newlines and comments
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::LineComment(_))
    }

    /// Returns true for tokens that open a nesting level
    pub fn is_opening(&self) -> bool {
        matches!(self, Self::LeftParen | Self::LeftBracket | Self::LeftBrace)
    }

    /// Returns true for tokens that close a nesting level
    pub fn is_closing(&self) -> bool {
        matches!(self, Self::RightParen | Self::RightBracket | Self::RightBrace)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fn => write!(f, "fn"),
            Self::Let => write!(f, "let"),
            Self::Return => write!(f, "return"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::For => write!(f, "for"),
            Self::In => write!(f, "in"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::None => write!(f, "none"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Not => write!(f, "not"),
            Self::IntLiteral(value) => write!(f, "{value}"),
            Self::FloatLiteral(value) => write!(f, "{value:?}"),
            Self::StringLiteral(value) => write!(f, "{value:?}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Equals => write!(f, "="),
            Self::EqualsEquals => write!(f, "=="),
            Self::BangEquals => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEquals => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEquals => write!(f, ">="),
            Self::PlusEquals => write!(f, "+="),
            Self::MinusEquals => write!(f, "-="),
            Self::StarEquals => write!(f, "*="),
            Self::SlashEquals => write!(f, "/="),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Semicolon => write!(f, ";"),
            Self::LineComment(text) => write!(f, "//{text}"),
            Self::Whitespace => write!(f, " "),
            Self::Newline => writeln!(f),
        }
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, span: Span) -> Self {
        Self { token, span }
    }
}
