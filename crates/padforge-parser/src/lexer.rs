//! Lexical analyzer for footprint scripts.
//!
//! [`tokenize`] turns source text into [`PositionedToken`]s, keeping
//! whitespace and comments as trivia tokens so spans stay exact. Lexing
//! recovers after each error and reports every problem in one pass.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors through `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a `\u{XXXX}` escape after the backslash.
fn string_escape_unicode(input: &mut Input<'_>, escape_start: usize) -> IResult<char> {
    preceded(
        'u',
        cut_err(
            delimited('{', take_while(1..=6, |c: char| c.is_ascii_hexdigit()), '}')
                .context(LexerDiagnostic {
                    code: ErrorCode::E004,
                    message: "invalid unicode escape",
                    help: Some("use format `\\u{XXXX}` with 1-6 hex digits"),
                    start: escape_start,
                })
                .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
                .context(LexerDiagnostic {
                    code: ErrorCode::E005,
                    message: "invalid unicode codepoint",
                    help: Some("valid range: `0x0000`-`0xD7FF` or `0xE000`-`0x10FFFF`"),
                    start: escape_start,
                }),
        ),
    )
    .parse_next(input)
}

fn string_escape_char(input: &mut Input<'_>) -> IResult<char> {
    alt((
        'n'.value('\n'),
        'r'.value('\r'),
        't'.value('\t'),
        '\\'.value('\\'),
        '\''.value('\''),
        '"'.value('"'),
        '0'.value('\0'),
    ))
    .parse_next(input)
}

/// Parse an escape sequence starting with a backslash.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\n`, `\\r`, `\\t`, `\\\\`, `\\'`, `\\\"`, `\\0`, `\\u{}`"),
            start: escape_start,
        },
    )))
}

/// Parse a double-quoted string literal on a single line.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let string_char = none_of(['"', '\\', '\n', '\r']);
    let string_content = repeat(0.., alt((string_escape, string_char))).fold(
        String::new,
        |mut acc, ch| {
            acc.push(ch);
            acc
        },
    );

    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse an integer or float literal.
///
/// A literal with a fraction or an exponent is a float; anything else is an
/// integer and must fit in an `i64`.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    let text = terminated(
        (
            digit1,
            opt(('.', digit1)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        )
            .take(),
        peek(not(one_of(is_identifier_char))),
    )
    .parse_next(input)?;

    let token = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().map(Token::FloatLiteral)
    } else {
        text.parse::<i64>().ok().map(Token::IntLiteral)
    };

    token.ok_or_else(|| {
        ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            LexerDiagnostic {
                code: ErrorCode::E006,
                message: "number literal out of range",
                help: Some("integers must fit in 64 bits; write large values as floats"),
                start: start_pos,
            },
        ))
    })
}

/// Parse a line comment starting with `//`
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((
            literal("return"),
            literal("false"),
            literal("none"),
            literal("true"),
            literal("else"),
            literal("let"),
            literal("for"),
            literal("and"),
            literal("not"),
            literal("fn"),
            literal("if"),
            literal("in"),
            literal("or"),
        )),
        peek(not(one_of(is_identifier_char))),
    )
    .map(|keyword: &str| match keyword {
        "return" => Token::Return,
        "false" => Token::False,
        "none" => Token::None,
        "true" => Token::True,
        "else" => Token::Else,
        "let" => Token::Let,
        "for" => Token::For,
        "and" => Token::And,
        "not" => Token::Not,
        "fn" => Token::Fn,
        "if" => Token::If,
        "in" => Token::In,
        _ => Token::Or,
    })
    .parse_next(input)
}

/// Parse identifiers: a letter or underscore followed by letters, digits or underscores
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_identifier_char),
    )
        .take()
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse two-character operators (must run before single characters)
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("==").value(Token::EqualsEquals),
        literal("!=").value(Token::BangEquals),
        literal("<=").value(Token::LessEquals),
        literal(">=").value(Token::GreaterEquals),
        literal("+=").value(Token::PlusEquals),
        literal("-=").value(Token::MinusEquals),
        literal("*=").value(Token::StarEquals),
        literal("/=").value(Token::SlashEquals),
    ))
    .parse_next(input)
}

fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        alt((
            '+'.value(Token::Plus),
            '-'.value(Token::Minus),
            '*'.value(Token::Star),
            '/'.value(Token::Slash),
            '%'.value(Token::Percent),
            '='.value(Token::Equals),
            '<'.value(Token::Less),
            '>'.value(Token::Greater),
        )),
        alt((
            '('.value(Token::LeftParen),
            ')'.value(Token::RightParen),
            '['.value(Token::LeftBracket),
            ']'.value(Token::RightBracket),
            '{'.value(Token::LeftBrace),
            '}'.value(Token::RightBrace),
            ','.value(Token::Comma),
            '.'.value(Token::Dot),
            ';'.value(Token::Semicolon),
        )),
    ))
    .parse_next(input)
}

/// Parse whitespace other than newlines
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,        // Must come before single char '/'
        string_literal,      // Must come before any single char
        number_literal,      // Must come before identifier
        multi_char_operator, // Must come before single char operators
        keyword,             // Must come before identifier
        identifier,
        single_char_token,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let in_string = input.starts_with('"');
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));
                    Self::recover(&mut input, in_string);
                }
            }
        }
    }

    /// Skips past the offending input.
    ///
    /// A broken string literal skips to the end of its line so the rest of
    /// it is not lexed as code.
    fn recover(input: &mut Input<'a>, in_string: bool) {
        let rest: &str = **input;
        let skip = if in_string {
            rest.find('\n').unwrap_or(rest.len())
        } else {
            rest.chars().next().map_or(0, char::len_utf8)
        };
        let _ = input.next_slice(skip);
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Converts a winnow error into a diagnostic, falling back to E002
    /// when no lexer context was attached.
    fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenizes `input`, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens, trivia included
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located = LocatingSlice::new(input);
        positioned_token(&mut located)
            .unwrap_or_else(|_| panic!("failed to lex `{input}`"))
            .token
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("input should lex")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .expect_err("input should fail to lex")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(single_token("fn"), Token::Fn);
        assert_eq!(single_token("let"), Token::Let);
        assert_eq!(single_token("return"), Token::Return);
        assert_eq!(single_token("if"), Token::If);
        assert_eq!(single_token("else"), Token::Else);
        assert_eq!(single_token("for"), Token::For);
        assert_eq!(single_token("in"), Token::In);
        assert_eq!(single_token("true"), Token::True);
        assert_eq!(single_token("false"), Token::False);
        assert_eq!(single_token("none"), Token::None);
        assert_eq!(single_token("and"), Token::And);
        assert_eq!(single_token("or"), Token::Or);
        assert_eq!(single_token("not"), Token::Not);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        assert_eq!(single_token("index"), Token::Identifier("index"));
        assert_eq!(single_token("format"), Token::Identifier("format"));
        assert_eq!(single_token("notch"), Token::Identifier("notch"));
        assert_eq!(single_token("fn_pads"), Token::Identifier("fn_pads"));
        assert_eq!(single_token("letter"), Token::Identifier("letter"));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(single_token("FCrtYd"), Token::Identifier("FCrtYd"));
        assert_eq!(single_token("_tmp"), Token::Identifier("_tmp"));
        assert_eq!(single_token("pad2"), Token::Identifier("pad2"));
    }

    #[test]
    fn test_numbers_keep_int_and_float_apart() {
        assert_eq!(single_token("14"), Token::IntLiteral(14));
        assert_eq!(single_token("0"), Token::IntLiteral(0));
        assert_eq!(single_token("0.65"), Token::FloatLiteral(0.65));
        assert_eq!(single_token("10.0"), Token::FloatLiteral(10.0));
        assert_eq!(single_token("1e3"), Token::FloatLiteral(1000.0));
        assert_eq!(single_token("2.5E-1"), Token::FloatLiteral(0.25));
    }

    #[test]
    fn test_number_followed_by_field_access() {
        assert_eq!(
            significant("1.x"),
            vec![Token::IntLiteral(1), Token::Dot, Token::Identifier("x")]
        );
    }

    #[test]
    fn test_integer_out_of_range() {
        assert_eq!(error_codes("let n = 99999999999999999999;"), vec![ErrorCode::E006]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            significant("+ - * / % = == != < <= > >= += -= *= /="),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Percent,
                Token::Equals,
                Token::EqualsEquals,
                Token::BangEquals,
                Token::Less,
                Token::LessEquals,
                Token::Greater,
                Token::GreaterEquals,
                Token::PlusEquals,
                Token::MinusEquals,
                Token::StarEquals,
                Token::SlashEquals,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            significant("( ) [ ] { } , . ;"),
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBracket,
                Token::RightBracket,
                Token::LeftBrace,
                Token::RightBrace,
                Token::Comma,
                Token::Dot,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            single_token("\"F.Mask\""),
            Token::StringLiteral("F.Mask".to_string())
        );
        assert_eq!(single_token("\"\""), Token::StringLiteral(String::new()));
        assert_eq!(
            single_token(r#""a\"b\n\u{2126}""#),
            Token::StringLiteral("a\"b\n\u{2126}".to_string())
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let tokens = tokenize("let x = 1; // pitch\n").expect("input should lex");
        let comment = tokens
            .iter()
            .find(|t| matches!(t.token, Token::LineComment(_)))
            .expect("comment token");
        assert_eq!(comment.token, Token::LineComment(" pitch"));
        assert!(comment.token.is_trivia());
        assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::Newline));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("let pitch").expect("input should lex");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span, Span::new(0..3));
        assert_eq!(tokens[1].span, Span::new(3..4));
        assert_eq!(tokens[2].span, Span::new(4..9));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("let name = \"TSSOP\n").expect_err("unterminated string");
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.primary_span().map(|s| s.start()), Some(11));
    }

    #[test]
    fn test_invalid_escapes() {
        assert_eq!(error_codes(r#""bad \q""#), vec![ErrorCode::E003]);
        assert_eq!(error_codes(r#""bad \u{}""#), vec![ErrorCode::E004]);
        assert_eq!(error_codes(r#""bad \u{D800}""#), vec![ErrorCode::E005]);
    }

    #[test]
    fn test_unexpected_characters_are_all_reported() {
        assert_eq!(
            error_codes("let a = 1 $ 2 @ 3;"),
            vec![ErrorCode::E002, ErrorCode::E002]
        );
        assert_eq!(error_codes("!"), vec![ErrorCode::E002]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,16}".prop_filter("avoid keywords", |s| {
            !matches!(
                s.as_str(),
                "fn" | "let"
                    | "return"
                    | "if"
                    | "else"
                    | "for"
                    | "in"
                    | "true"
                    | "false"
                    | "none"
                    | "and"
                    | "or"
                    | "not"
            )
        })
    }

    fn check_identifier_roundtrip(name: &str) -> Result<(), TestCaseError> {
        let source = format!("let {name} = 1;");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(tokens.iter().any(|t| t.token == Token::Identifier(name)));
        Ok(())
    }

    fn check_int_literal(value: i64) -> Result<(), TestCaseError> {
        let source = value.unsigned_abs().to_string();
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(
            &tokens[0].token,
            &Token::IntLiteral(i64::try_from(value.unsigned_abs()).unwrap_or(i64::MAX))
        );
        Ok(())
    }

    fn check_float_literal(integer: u32, fraction: u32) -> Result<(), TestCaseError> {
        let source = format!("{integer}.{fraction}");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tokens.len(), 1);
        prop_assert!(matches!(tokens[0].token, Token::FloatLiteral(_)));
        Ok(())
    }

    proptest! {
        #[test]
        fn identifier_roundtrip(name in identifier_strategy()) {
            check_identifier_roundtrip(&name)?;
        }

        #[test]
        fn int_literal(value in 0i64..i64::MAX) {
            check_int_literal(value)?;
        }

        #[test]
        fn float_literal(integer in 0u32..10000, fraction in 0u32..10000) {
            check_float_literal(integer, fraction)?;
        }
    }
}
