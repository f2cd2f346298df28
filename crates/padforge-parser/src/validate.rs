//! Checks that run around parsing: bracket nesting on the token stream, and
//! name and assignment rules on the syntax tree.

use std::collections::HashMap;

use log::trace;

use crate::{
    ast::{Argument, Block, Expr, ExprKind, FunctionDef, Item, Script, StmtKind},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::PositionedToken,
};

/// Rejects token streams whose brackets nest deeper than `max_depth`.
///
/// Runs before parsing so the recursive-descent parser never sees input that
/// could exhaust its stack. Unbalanced brackets are left for the parser to
/// report.
pub fn check_nesting(tokens: &[PositionedToken<'_>], max_depth: usize) -> Result<(), Diagnostic> {
    let mut depth = 0usize;
    let mut deepest = 0usize;

    for token in tokens {
        if token.token.is_opening() {
            depth += 1;
            deepest = deepest.max(depth);
            if depth > max_depth {
                return Err(Diagnostic::error(format!(
                    "brackets are nested deeper than the limit of {max_depth}"
                ))
                .with_code(ErrorCode::E203)
                .with_label(token.span, "too deep")
                .with_help("split the expression into named helper values"));
            }
        } else if token.token.is_closing() {
            depth = depth.saturating_sub(1);
        }
    }

    trace!(deepest, max_depth; "Nesting checked");
    Ok(())
}

/// Validates top-level names, parameters, assignment targets, call argument
/// order and expression depth, reporting every problem found.
pub fn validate_script(script: &Script, max_expression_depth: usize) -> Result<(), ParseError> {
    let mut validator = Validator {
        diagnostics: DiagnosticCollector::default(),
        max_expression_depth,
    };
    validator.check_top_level(script);
    for function in script.functions() {
        validator.check_function(function);
    }
    for item in &script.items {
        if let Item::Let { value, .. } = item {
            validator.check_expr(value);
        }
    }
    validator.diagnostics.finish()
}

struct Validator {
    diagnostics: DiagnosticCollector,
    max_expression_depth: usize,
}

impl Validator {
    fn check_top_level(&mut self, script: &Script) {
        let mut seen: HashMap<&str, (Span, bool)> = HashMap::new();

        for item in &script.items {
            let name = item.name();
            let is_function = matches!(item, Item::Function(_));

            let Some(&(first_span, first_is_function)) = seen.get(name.inner().as_str()) else {
                seen.insert(name.inner(), (name.span(), is_function));
                continue;
            };

            let (message, code) = if is_function && first_is_function {
                (format!("duplicate function `{}`", name.inner()), ErrorCode::E200)
            } else {
                (
                    format!("`{}` is defined more than once at top level", name.inner()),
                    ErrorCode::E202,
                )
            };
            self.diagnostics.emit(
                Diagnostic::error(message)
                    .with_code(code)
                    .with_label(name.span(), "duplicate definition")
                    .with_secondary_label(first_span, "first defined here")
                    .with_help("rename one of the definitions"),
            );
        }
    }

    fn check_function(&mut self, function: &FunctionDef) {
        let mut params: HashMap<&str, Span> = HashMap::new();
        for param in &function.params {
            if let Some(&first) = params.get(param.inner().as_str()) {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "parameter `{}` is declared twice in `{}`",
                        param.inner(),
                        function.name.inner()
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(param.span(), "duplicate parameter")
                    .with_secondary_label(first, "first declared here"),
                );
            } else {
                params.insert(param.inner(), param.span());
            }
        }

        self.check_block(&function.body);
    }

    fn check_block(&mut self, block: &Block) {
        for statement in &block.statements {
            match statement.inner() {
                StmtKind::Let { value, .. } | StmtKind::Expr(value) => self.check_expr(value),
                StmtKind::Assign { target, value, .. } => {
                    if !target.inner().is_place() {
                        self.diagnostics.emit(
                            Diagnostic::error("cannot assign to this expression")
                                .with_code(ErrorCode::E204)
                                .with_label(target.span(), "not a variable, field or index")
                                .with_help("assign to a variable, `value.field` or `list[index]`"),
                        );
                    }
                    self.check_expr(target);
                    self.check_expr(value);
                }
                StmtKind::Return(value) => {
                    if let Some(value) = value {
                        self.check_expr(value);
                    }
                }
                StmtKind::If {
                    branches,
                    otherwise,
                } => {
                    for (condition, body) in branches {
                        self.check_expr(condition);
                        self.check_block(body);
                    }
                    if let Some(body) = otherwise {
                        self.check_block(body);
                    }
                }
                StmtKind::For { iterable, body, .. } => {
                    self.check_expr(iterable);
                    self.check_block(body);
                }
            }
        }
    }

    fn check_expr(&mut self, root: &Expr) {
        // Operator chains are deep on the left; walk them with a worklist
        let mut pending = vec![(root, 1usize)];
        let mut too_deep = false;

        while let Some((expr, depth)) = pending.pop() {
            if depth > self.max_expression_depth && !too_deep {
                too_deep = true;
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "expression is nested deeper than the limit of {}",
                        self.max_expression_depth
                    ))
                    .with_code(ErrorCode::E203)
                    .with_label(root.span(), "expression too deep")
                    .with_help("split the expression into named helper values"),
                );
            }

            let child = depth + 1;
            match expr.inner() {
                ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Str(_)
                | ExprKind::Bool(_)
                | ExprKind::None
                | ExprKind::Name(_) => {}
                ExprKind::List(items) | ExprKind::Tuple(items) => {
                    pending.extend(items.iter().map(|item| (item, child)));
                }
                ExprKind::Unary { operand, .. } => pending.push((operand, child)),
                ExprKind::Binary { left, right, .. } => {
                    pending.push((right, child));
                    pending.push((left, child));
                }
                ExprKind::Call { callee, args } => {
                    self.check_arguments(args);
                    pending.push((callee, child));
                    pending.extend(args.iter().map(|arg| (&arg.value, child)));
                }
                ExprKind::MethodCall { receiver, args, .. } => {
                    self.check_arguments(args);
                    pending.push((receiver, child));
                    pending.extend(args.iter().map(|arg| (&arg.value, child)));
                }
                ExprKind::Field { object, .. } => pending.push((object, child)),
                ExprKind::Index { object, index } => {
                    pending.push((index, child));
                    pending.push((object, child));
                }
            }
        }
    }

    fn check_arguments(&mut self, args: &[Argument]) {
        let mut keyword: Option<Span> = None;
        for arg in args {
            match (&arg.name, keyword) {
                (Some(name), None) => keyword = Some(name.span()),
                (None, Some(first_keyword)) => self.diagnostics.emit(
                    Diagnostic::error("positional argument follows a keyword argument")
                        .with_code(ErrorCode::E205)
                        .with_label(arg.value.span(), "positional argument")
                        .with_secondary_label(first_keyword, "first keyword argument")
                        .with_help("move positional arguments before keyword arguments"),
                ),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_script};

    fn validate(source: &str) -> Result<(), ParseError> {
        let tokens = tokenize(source).expect("tokenize");
        let script = build_script(&tokens).expect("parse");
        validate_script(&script, 10_000)
    }

    fn codes(source: &str) -> Vec<ErrorCode> {
        validate(source)
            .expect_err("validation should fail")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_valid_script() {
        let source = r#"
            let PITCH = 0.65;
            fn pads(n) { return dual(Smd(1, (1.55, 0.25)), 5.6, PITCH, n); }
            fn footprint() {
                let name = Name("TSSOP");
                name.y = 3.5;
                let lines = [];
                lines[0] = 1;
                return [name] + pads(14);
            }
        "#;
        assert!(validate(source).is_ok());
    }

    #[test]
    fn test_duplicate_function() {
        let err = validate("fn a() { } fn a() { }").expect_err("duplicate");
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(14..15)));
    }

    #[test]
    fn test_constant_clashes() {
        assert_eq!(codes("let a = 1; fn a() { }"), vec![ErrorCode::E202]);
        assert_eq!(codes("let a = 1; let a = 2;"), vec![ErrorCode::E202]);
    }

    #[test]
    fn test_duplicate_parameter() {
        assert_eq!(codes("fn f(n, m, n) { }"), vec![ErrorCode::E201]);
    }

    #[test]
    fn test_invalid_assignment_targets() {
        assert_eq!(
            codes("fn f() { Smd(1, (1, 1)).x = 2; 1 = 2; }"),
            vec![ErrorCode::E204, ErrorCode::E204]
        );
    }

    #[test]
    fn test_positional_after_keyword() {
        assert_eq!(
            codes("fn f() { return Line((0, 0), w=0.2, (1, 1)); }"),
            vec![ErrorCode::E205]
        );
    }

    #[test]
    fn test_problems_are_collected() {
        assert_eq!(
            codes("fn f(a, a) { } fn f() { 1 = 2; }"),
            vec![ErrorCode::E200, ErrorCode::E201, ErrorCode::E204]
        );
    }

    #[test]
    fn test_nesting_limit() {
        let within = tokenize("[[[1]]]").expect("tokenize");
        assert!(check_nesting(&within, 3).is_ok());

        let too_deep = tokenize("[[[[1]]]]").expect("tokenize");
        let diag = check_nesting(&too_deep, 3).expect_err("too deep");
        assert_eq!(diag.code(), Some(ErrorCode::E203));
        assert_eq!(diag.primary_span(), Some(Span::new(3..4)));
    }

    #[test]
    fn test_long_operator_chain_is_walked() {
        let source = format!("fn f() {{ return 1{}; }}", " + 1".repeat(5000));
        assert!(validate(&source).is_ok());
    }

    #[test]
    fn test_expression_depth_limit() {
        let source = format!("fn f() {{ return 1{}; }}", " + 1".repeat(20));
        let tokens = tokenize(&source).expect("tokenize");
        let script = build_script(&tokens).expect("parse");

        assert!(validate_script(&script, 21).is_ok());
        let err = validate_script(&script, 8).expect_err("too deep");
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E203));
    }
}
