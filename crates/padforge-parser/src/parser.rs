//! Parser for footprint script tokens.
//!
//! This module transforms the token stream from the [`lexer`](super::lexer)
//! into the syntax tree defined in [`ast`](super::ast). The public entry point
//! is [`build_script`].
//!
//! Trivia (whitespace, newlines, comments) is skipped in front of every
//! significant token. Operator precedence, from loosest to tightest:
//! `or`, `and`, `not`, comparisons, `+ -`, `* / %`, unary `-`, postfix
//! (`.field`, `.method(..)`, calls, indexing). Comparisons do not chain.

use winnow::{
    Parser as _,
    combinator::repeat,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    ast::{
        Argument, AssignOp, BinaryOp, Block, Expr, ExprKind, FunctionDef, Item, Script, Stmt,
        StmtKind, UnaryOp,
    },
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
}

type Input<'src> = ScriptTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type ScriptTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Creates a Cut error pointing at the next significant token.
///
/// Leading trivia is consumed so the reported position is the offending
/// token itself.
fn expected<'src>(input: &mut Input<'src>, label: &'static str) -> ErrMode<ContextError<Context>> {
    skip_trivia(input);
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    e.push(Context::StartOffset(input.eof_offset()));
    ErrMode::Cut(e)
}

/// Parse whitespace and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

fn skip_trivia(input: &mut Input<'_>) {
    // `repeat(0..)` cannot fail
    let _: IResult<()> = ws_comments0.parse_next(input);
}

/// Returns the next significant token without consuming input
fn peek_token<'src>(input: &mut Input<'src>) -> Option<&'src Token<'src>> {
    let checkpoint = input.checkpoint();
    skip_trivia(input);
    let token = input.next_token().map(|t| &t.token);
    input.reset(&checkpoint);
    token
}

/// Consumes the next significant token when `accept` maps it to a value.
///
/// On rejection nothing is consumed, trivia included.
fn next_if<'src, T>(
    input: &mut Input<'src>,
    accept: impl FnOnce(&'src Token<'src>) -> Option<T>,
) -> Option<(T, Span)> {
    let checkpoint = input.checkpoint();
    skip_trivia(input);
    let accepted = input
        .next_token()
        .and_then(|t| accept(&t.token).map(|value| (value, t.span)));
    if accepted.is_none() {
        input.reset(&checkpoint);
    }
    accepted
}

/// Consumes `expected` if it is the next significant token
fn eat(input: &mut Input<'_>, expected: Token<'static>) -> Option<Span> {
    next_if(input, |token| (*token == expected).then_some(())).map(|((), span)| span)
}

/// Parse a required punctuation or keyword token
fn symbol<'src>(input: &mut Input<'src>, token: Token<'static>, label: &'static str) -> IResult<Span> {
    eat(input, token).ok_or_else(|| expected(input, label))
}

/// Parse an identifier with span preservation
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    next_if(input, |token| match token {
        Token::Identifier(name) => Some(name.to_string()),
        _ => None,
    })
    .map(|(name, span)| Spanned::new(name, span))
    .ok_or_else(|| expected(input, "identifier"))
}

/// Parse a comma-separated sequence closed by `close`.
///
/// A trailing comma is allowed. Returns the items, the closing token span and
/// whether the last item was followed by a comma.
fn comma_list<'src, T>(
    input: &mut Input<'src>,
    close: Token<'static>,
    close_label: &'static str,
    mut item: impl FnMut(&mut Input<'src>) -> IResult<T>,
) -> IResult<(Vec<T>, Span, bool)> {
    let mut items = Vec::new();
    let mut trailing_comma = false;

    loop {
        if let Some(span) = eat(input, close.clone()) {
            return Ok((items, span, trailing_comma));
        }
        items.push(item(input)?);
        if eat(input, Token::Comma).is_some() {
            trailing_comma = true;
            continue;
        }
        let span = symbol(input, close, close_label)?;
        return Ok((items, span, false));
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Parse an expression
pub(crate) fn expression<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    binary_chain(input, and_expression, |token| {
        matches!(token, Token::Or).then_some(BinaryOp::Or)
    })
}

fn and_expression<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    binary_chain(input, not_expression, |token| {
        matches!(token, Token::And).then_some(BinaryOp::And)
    })
}

/// Parse a left-associative chain of `operand (op operand)*`
fn binary_chain<'src>(
    input: &mut Input<'src>,
    operand: fn(&mut Input<'src>) -> IResult<Expr>,
    operator: fn(&Token<'_>) -> Option<BinaryOp>,
) -> IResult<Expr> {
    let mut left = operand(input)?;

    while let Some((op, _)) = next_if(input, |token| operator(token)) {
        let right = operand(input)?;
        let span = left.span().union(right.span());
        left = Spanned::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        );
    }

    Ok(left)
}

/// Parse prefix operators iteratively, then wrap the operand
fn prefixed<'src>(
    input: &mut Input<'src>,
    prefix: Token<'static>,
    op: UnaryOp,
    operand: fn(&mut Input<'src>) -> IResult<Expr>,
) -> IResult<Expr> {
    let mut prefixes = Vec::new();
    while let Some(span) = eat(input, prefix.clone()) {
        prefixes.push(span);
    }

    let mut expr = operand(input)?;
    for span in prefixes.into_iter().rev() {
        let span = span.union(expr.span());
        expr = Spanned::new(
            ExprKind::Unary {
                op,
                operand: Box::new(expr),
            },
            span,
        );
    }
    Ok(expr)
}

fn not_expression<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    prefixed(input, Token::Not, UnaryOp::Not, comparison)
}

fn comparison_operator(token: &Token<'_>) -> Option<BinaryOp> {
    match token {
        Token::EqualsEquals => Some(BinaryOp::Eq),
        Token::BangEquals => Some(BinaryOp::Ne),
        Token::Less => Some(BinaryOp::Lt),
        Token::LessEquals => Some(BinaryOp::Le),
        Token::Greater => Some(BinaryOp::Gt),
        Token::GreaterEquals => Some(BinaryOp::Ge),
        _ => None,
    }
}

/// Parse at most one comparison; `a < b < c` is rejected
fn comparison<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    let left = additive(input)?;
    let Some((op, _)) = next_if(input, comparison_operator) else {
        return Ok(left);
    };
    let right = additive(input)?;
    let span = left.span().union(right.span());
    Ok(Spanned::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

fn additive<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    binary_chain(input, multiplicative, |token| match token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        _ => None,
    })
}

fn multiplicative<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    binary_chain(input, negation, |token| match token {
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::Percent => Some(BinaryOp::Mod),
        _ => None,
    })
}

fn negation<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    prefixed(input, Token::Minus, UnaryOp::Neg, postfix)
}

/// Parse a primary expression followed by field access, method calls,
/// calls and indexing
fn postfix<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    let mut expr = primary(input)?;

    loop {
        if eat(input, Token::Dot).is_some() {
            let name = identifier(input)?;
            if eat(input, Token::LeftParen).is_some() {
                let (args, close) = arguments(input)?;
                let span = expr.span().union(close);
                expr = Spanned::new(
                    ExprKind::MethodCall {
                        receiver: Box::new(expr),
                        method: name,
                        args,
                    },
                    span,
                );
            } else {
                let span = expr.span().union(name.span());
                expr = Spanned::new(
                    ExprKind::Field {
                        object: Box::new(expr),
                        field: name,
                    },
                    span,
                );
            }
        } else if eat(input, Token::LeftParen).is_some() {
            let (args, close) = arguments(input)?;
            let span = expr.span().union(close);
            expr = Spanned::new(
                ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                },
                span,
            );
        } else if eat(input, Token::LeftBracket).is_some() {
            let index = expression(input)?;
            let close = symbol(input, Token::RightBracket, "`]`")?;
            let span = expr.span().union(close);
            expr = Spanned::new(
                ExprKind::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            );
        } else {
            return Ok(expr);
        }
    }
}

/// Parse call arguments after the opening parenthesis
fn arguments<'src>(input: &mut Input<'src>) -> IResult<(Vec<Argument>, Span)> {
    let (args, close, _) = comma_list(input, Token::RightParen, "`)`", argument)?;
    Ok((args, close))
}

/// Parse `name = value` or a positional value
fn argument<'src>(input: &mut Input<'src>) -> IResult<Argument> {
    let checkpoint = input.checkpoint();
    if let Some((name, span)) = next_if(input, |token| match token {
        Token::Identifier(name) => Some(name.to_string()),
        _ => None,
    }) {
        if eat(input, Token::Equals).is_some() {
            let value = expression(input)?;
            return Ok(Argument {
                name: Some(Spanned::new(name, span)),
                value,
            });
        }
        input.reset(&checkpoint);
    }

    Ok(Argument {
        name: None,
        value: expression(input)?,
    })
}

fn primary<'src>(input: &mut Input<'src>) -> IResult<Expr> {
    skip_trivia(input);
    let checkpoint = input.checkpoint();
    let Some(token) = input.next_token() else {
        return Err(expected(input, "expression"));
    };
    let span = token.span;

    let kind = match &token.token {
        Token::IntLiteral(value) => ExprKind::Int(*value),
        Token::FloatLiteral(value) => ExprKind::Float(*value),
        Token::StringLiteral(value) => ExprKind::Str(value.clone()),
        Token::True => ExprKind::Bool(true),
        Token::False => ExprKind::Bool(false),
        Token::None => ExprKind::None,
        Token::Identifier(name) => ExprKind::Name(name.to_string()),
        Token::LeftBracket => {
            let (items, close, _) =
                comma_list(input, Token::RightBracket, "`]`", expression)?;
            return Ok(Spanned::new(ExprKind::List(items), span.union(close)));
        }
        Token::LeftParen => return parenthesized(input, span),
        _ => {
            input.reset(&checkpoint);
            return Err(expected(input, "expression"));
        }
    };

    Ok(Spanned::new(kind, span))
}

/// Parse a grouped expression or a tuple after `(`.
///
/// `()` is the empty tuple and `(a,)` a one-element tuple.
fn parenthesized<'src>(input: &mut Input<'src>, open: Span) -> IResult<Expr> {
    let (mut items, close, trailing_comma) =
        comma_list(input, Token::RightParen, "`)`", expression)?;
    let span = open.union(close);

    if items.len() == 1 && !trailing_comma {
        if let Some(inner) = items.pop() {
            return Ok(Spanned::new(inner.into_inner(), span));
        }
    }
    Ok(Spanned::new(ExprKind::Tuple(items), span))
}

// ============================================================================
// Statements
// ============================================================================

fn block<'src>(input: &mut Input<'src>) -> IResult<Block> {
    let open = symbol(input, Token::LeftBrace, "`{`")?;
    let mut statements = Vec::new();

    loop {
        if let Some(close) = eat(input, Token::RightBrace) {
            return Ok(Block {
                statements,
                span: open.union(close),
            });
        }
        if peek_token(input).is_none() {
            return Err(expected(input, "`}`"));
        }
        statements.push(statement(input)?);
    }
}

fn statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    match peek_token(input) {
        Some(Token::Let) => cut_err(input, let_statement),
        Some(Token::Return) => cut_err(input, return_statement),
        Some(Token::If) => cut_err(input, if_statement),
        Some(Token::For) => cut_err(input, for_statement),
        _ => cut_err(input, expression_statement),
    }
}

/// Parse `let name = value;`
fn let_binding<'src>(input: &mut Input<'src>) -> IResult<(Spanned<String>, Expr, Span)> {
    let start = symbol(input, Token::Let, "`let`")?;
    let name = identifier(input)?;
    symbol(input, Token::Equals, "`=`")?;
    let value = expression(input)?;
    let end = symbol(input, Token::Semicolon, "`;`")?;
    Ok((name, value, start.union(end)))
}

fn let_statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    let (name, value, span) = let_binding(input)?;
    Ok(Spanned::new(StmtKind::Let { name, value }, span))
}

fn return_statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    let start = symbol(input, Token::Return, "`return`")?;
    if let Some(end) = eat(input, Token::Semicolon) {
        return Ok(Spanned::new(StmtKind::Return(None), start.union(end)));
    }
    let value = expression(input)?;
    let end = symbol(input, Token::Semicolon, "`;`")?;
    Ok(Spanned::new(StmtKind::Return(Some(value)), start.union(end)))
}

/// Parse an `if` / `else if` / `else` chain without recursion
fn if_statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    let start = symbol(input, Token::If, "`if`")?;
    let condition = expression(input)?;
    let body = block(input)?;
    let mut end = body.span;
    let mut branches = vec![(condition, body)];
    let mut otherwise = None;

    while eat(input, Token::Else).is_some() {
        if eat(input, Token::If).is_some() {
            let condition = expression(input)?;
            let body = block(input)?;
            end = body.span;
            branches.push((condition, body));
        } else {
            let body = block(input)?;
            end = body.span;
            otherwise = Some(body);
            break;
        }
    }

    Ok(Spanned::new(
        StmtKind::If {
            branches,
            otherwise,
        },
        start.union(end),
    ))
}

fn for_statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    let start = symbol(input, Token::For, "`for`")?;
    let var = identifier(input)?;
    symbol(input, Token::In, "`in`")?;
    let iterable = expression(input)?;
    let body = block(input)?;
    let span = start.union(body.span);
    Ok(Spanned::new(
        StmtKind::For {
            var,
            iterable,
            body,
        },
        span,
    ))
}

fn assign_operator(token: &Token<'_>) -> Option<AssignOp> {
    match token {
        Token::Equals => Some(AssignOp::Assign),
        Token::PlusEquals => Some(AssignOp::Add),
        Token::MinusEquals => Some(AssignOp::Sub),
        Token::StarEquals => Some(AssignOp::Mul),
        Token::SlashEquals => Some(AssignOp::Div),
        _ => None,
    }
}

/// Parse an expression statement or an assignment
fn expression_statement<'src>(input: &mut Input<'src>) -> IResult<Stmt> {
    let target = expression(input)?;

    if let Some((op, _)) = next_if(input, assign_operator) {
        let value = expression(input)?;
        let end = symbol(input, Token::Semicolon, "`;`")?;
        let span = target.span().union(end);
        return Ok(Spanned::new(StmtKind::Assign { target, op, value }, span));
    }

    let end = symbol(input, Token::Semicolon, "`;`")?;
    let span = target.span().union(end);
    Ok(Spanned::new(StmtKind::Expr(target), span))
}

// ============================================================================
// Items
// ============================================================================

/// Parse `fn name(params) { body }`
fn function_definition<'src>(input: &mut Input<'src>) -> IResult<FunctionDef> {
    let start = symbol(input, Token::Fn, "`fn`")?;
    let name = identifier(input)?;
    symbol(input, Token::LeftParen, "`(`")?;
    let (params, _, _) = comma_list(input, Token::RightParen, "`)`", identifier)?;
    let body = block(input)?;
    let span = start.union(body.span);
    Ok(FunctionDef {
        name,
        params,
        body,
        span,
    })
}

fn item<'src>(input: &mut Input<'src>) -> IResult<Item> {
    match peek_token(input) {
        Some(Token::Fn) => cut_err(input, function_definition).map(Item::Function),
        Some(Token::Let) => cut_err(input, let_binding).map(|(name, value, _)| Item::Let { name, value }),
        _ => Err(expected(input, "top-level `fn` or `let`")),
    }
}

fn script<'src>(input: &mut Input<'src>) -> IResult<Script> {
    let mut items = Vec::new();
    while peek_token(input).is_some() {
        items.push(item(input)?);
    }
    skip_trivia(input);
    Ok(Script { items })
}

// ============================================================================
// Error conversion
// ============================================================================

/// Returns the span of the first significant token at or after `offset`,
/// or the last significant token when the input is exhausted
fn offending_span(tokens: &[PositionedToken], offset: usize) -> Span {
    tokens
        .get(offset..)
        .and_then(|rest| rest.iter().find(|t| !t.token.is_trivia()))
        .or_else(|| tokens.iter().rev().find(|t| !t.token.is_trivia()))
        .map(|t| t.span)
        .unwrap_or_default()
}

/// Utility function to convert winnow errors to our custom error format
///
/// Extracts position information from error context (StartOffset) and
/// calculates precise error spans using the token array.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let end_offset = tokens.len().saturating_sub(current_remaining);

    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            // The innermost StartOffset is the most precise one
            let start_offset = e
                .context()
                .find_map(|ctx| match ctx {
                    Context::StartOffset(n) => Some(tokens.len().saturating_sub(*n)),
                    Context::Label(_) => None,
                })
                .unwrap_or(end_offset);

            let message = e
                .context()
                .find_map(|ctx| match ctx {
                    Context::Label(label) => Some(format!("expected {label}")),
                    Context::StartOffset(_) => None,
                })
                .unwrap_or_else(|| "unexpected token or end of input".to_string());

            let found = tokens
                .get(start_offset..)
                .and_then(|rest| rest.iter().find(|t| !t.token.is_trivia()))
                .map_or_else(|| "end of input".to_string(), |t| format!("`{}`", t.token));

            Diagnostic::error(format!("unexpected token: {message}"))
                .with_code(ErrorCode::E100)
                .with_label(offending_span(tokens, start_offset), format!("found {found}"))
                .with_help("check syntax and token positioning")
        }
        ErrMode::Incomplete(_) => Diagnostic::error("incomplete input, more tokens expected")
            .with_code(ErrorCode::E101)
            .with_label(offending_span(tokens, end_offset), "incomplete")
            .with_help("ensure input is complete"),
    }
}

/// Build a script syntax tree from tokens
pub fn build_script<'src>(tokens: &'src [PositionedToken<'src>]) -> Result<Script, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match script.parse_next(&mut token_slice) {
        Ok(script) => Ok(script),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
