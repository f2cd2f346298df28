use padforge_parser::{
    DEFAULT_MAX_EXPRESSION_DEPTH, DEFAULT_MAX_NESTING, ParserConfig,
    ast::{ExprKind, StmtKind},
    error::{ErrorCode, ParseError},
    parse,
};

fn codes(err: &ParseError) -> Vec<ErrorCode> {
    err.diagnostics().iter().filter_map(|d| d.code()).collect()
}

#[test]
fn parses_footprint_with_helpers() {
    let source = r#"
        let SPAN = 5.6;

        fn pads(count, name) {
            return dual(Smd(1, (1.55, 0.25)), SPAN, 0.65, count, name);
        }

        fn footprint() {
            return [Reference(), pads(14, none)];
        }
    "#;

    let script = parse(source, &ParserConfig::default()).expect("script should parse");
    let pads = script.function("pads").expect("pads defined");
    assert_eq!(pads.params.len(), 2);

    let footprint = script.function("footprint").expect("footprint defined");
    let StmtKind::Return(Some(value)) = footprint.body.statements[0].inner() else {
        panic!("expected return statement");
    };
    assert!(matches!(value.inner(), ExprKind::List(items) if items.len() == 2));
}

#[test]
fn lexer_errors_are_all_reported() {
    let err = parse("fn footprint() { return $ + \"open; }\n@", &ParserConfig::default())
        .expect_err("lexing fails");
    assert_eq!(
        codes(&err),
        vec![ErrorCode::E002, ErrorCode::E001, ErrorCode::E002]
    );
}

#[test]
fn nesting_limit_is_configurable() {
    let source = "fn footprint() { return [[[[1]]]]; }";
    assert!(parse(source, &ParserConfig::default()).is_ok());

    let err = parse(source, &ParserConfig::new(3, DEFAULT_MAX_EXPRESSION_DEPTH))
        .expect_err("too deep");
    assert_eq!(codes(&err), vec![ErrorCode::E203]);
}

#[test]
fn expression_depth_limit_is_configurable() {
    let source = format!("fn footprint() {{ return 0{}; }}", " + 1".repeat(300));
    let err = parse(&source, &ParserConfig::default()).expect_err("too deep");
    assert_eq!(codes(&err), vec![ErrorCode::E203]);

    assert!(parse(&source, &ParserConfig::new(DEFAULT_MAX_NESTING, 400)).is_ok());
}

#[test]
fn deeply_nested_input_is_rejected_before_parsing() {
    let source = format!(
        "fn footprint() {{ return {}1{}; }}",
        "(".repeat(100_000),
        ")".repeat(100_000)
    );
    let err = parse(&source, &ParserConfig::default()).expect_err("too deep");
    assert_eq!(codes(&err), vec![ErrorCode::E203]);
}

#[test]
fn validation_runs_after_parsing() {
    let err = parse("fn footprint() { } fn footprint() { }", &ParserConfig::default())
        .expect_err("duplicate entry point");
    assert_eq!(codes(&err), vec![ErrorCode::E200]);
    assert!(err.to_string().contains("duplicate function `footprint`"));
}

#[test]
fn syntax_error_has_single_diagnostic() {
    let err = parse("fn footprint() { return 1 }", &ParserConfig::default())
        .expect_err("missing semicolon");
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(codes(&err), vec![ErrorCode::E100]);
    assert_eq!(err.diagnostics()[0].help(), Some("check syntax and token positioning"));
}
