//! Whole-script tests for the parser.
//!
//! These tests run complete footprint scripts through the lexer and parser and
//! check the resulting tree shape and error reporting.

use crate::{
    ast::{AssignOp, ExprKind, Item, Script, StmtKind},
    lexer, parser,
};

/// Helper function to parse a source string and return the tree or a message
fn parse_source(source: &str) -> Result<Script, String> {
    let tokens = lexer::tokenize(source).map_err(|err| format!("Lexer error: {err}"))?;
    parser::build_script(&tokens).map_err(|err| format!("Parser error: {err}"))
}

/// Helper function to parse a source string and assert success
fn assert_parses(source: &str) -> Script {
    match parse_source(source) {
        Ok(script) => script,
        Err(e) => panic!("Expected parsing to succeed, but got error: {e}"),
    }
}

/// Helper function to parse a source string and assert failure
fn assert_parse_fails(source: &str) {
    if parse_source(source).is_ok() {
        panic!("Expected parsing to fail, but it succeeded: {source}");
    }
}

const TSSOP: &str = r#"
// TI TSSOP-14 with exposed pad
let PITCH = 0.65;

fn footprint() {
    let name = Name("TI_TSSOP_14_EP");
    name.y = 3.5;
    let reference = Reference();
    reference.y = -3.5;

    let fab = FFab(4.5, 5, corner=0.4);
    let smd = Smd(1, (1.55, 0.25));
    let pads = dual(smd, 5.6, PITCH, 14);

    let ep = Smd(15, (3.4, 5));
    ep.layers.remove("F.Mask");

    let lines = [
        Line((-2.25, 2.6), (2.25, 2.6)),
        Line((-3.5, -2.6), (2.25, -2.6)),
    ];
    return [name, reference, fab, ep] + pads + [lines];
}
"#;

#[test]
fn test_full_footprint_script() {
    let script = assert_parses(TSSOP);
    assert_eq!(script.items.len(), 2);
    assert!(matches!(&script.items[0], Item::Let { name, .. } if name.inner() == "PITCH"));

    let footprint = script.function("footprint").expect("footprint defined");
    assert!(footprint.params.is_empty());
    assert_eq!(footprint.body.statements.len(), 11);
    assert!(matches!(
        footprint.body.statements.last().map(|s| s.inner()),
        Some(StmtKind::Return(Some(_)))
    ));
}

#[test]
fn test_field_assignment_statement() {
    let script = assert_parses("fn f() { name.y += 3.5; }");
    let function = script.function("f").expect("f defined");
    let StmtKind::Assign { target, op, .. } = function.body.statements[0].inner() else {
        panic!("expected assignment");
    };
    assert_eq!(*op, AssignOp::Add);
    assert!(matches!(target.inner(), ExprKind::Field { field, .. } if field.inner() == "y"));
}

#[test]
fn test_control_flow() {
    let script = assert_parses(
        r#"
        fn pads(n) {
            let out = [];
            for i in range(n) {
                if i % 2 == 0 {
                    out.append(Smd(i + 1, (1, 1)));
                } else if i == 3 {
                    continue_here(i);
                } else {
                    out.append(Pad(i + 1, 1.7, 1.0));
                }
            }
            return out;
        }
        "#,
    );
    let function = script.function("pads").expect("pads defined");
    let StmtKind::For { var, body, .. } = function.body.statements[1].inner() else {
        panic!("expected for loop");
    };
    assert_eq!(var.inner(), "i");
    let StmtKind::If {
        branches,
        otherwise,
    } = body.statements[0].inner()
    else {
        panic!("expected if statement");
    };
    assert_eq!(branches.len(), 2);
    assert!(otherwise.is_some());
}

#[test]
fn test_long_else_if_chain() {
    let mut source = String::from("fn f(x) { if x == 0 { return 0; }");
    for i in 1..2000 {
        source.push_str(&format!(" else if x == {i} {{ return {i}; }}"));
    }
    source.push_str(" }");

    let script = assert_parses(&source);
    let function = script.function("f").expect("f defined");
    let StmtKind::If { branches, .. } = function.body.statements[0].inner() else {
        panic!("expected if statement");
    };
    assert_eq!(branches.len(), 2000);
}

#[test]
fn test_bare_return() {
    let script = assert_parses("fn f() { return; }");
    let function = script.function("f").expect("f defined");
    assert_eq!(
        *function.body.statements[0].inner(),
        StmtKind::Return(None)
    );
}

#[test]
fn test_trailing_commas() {
    assert_parses("fn f(a, b,) { return [1, 2,] + [(1, 2,)]; }");
}

#[test]
fn test_comments_everywhere() {
    assert_parses("// header\nfn f() { }");
    assert_parses("fn f( // params\n a // first\n) { // body\n return a; // done\n}");
}

#[test]
fn test_syntax_errors() {
    assert_parse_fails("fn footprint() { return [1, 2; }");
    assert_parse_fails("fn footprint() { let = 3; }");
    assert_parse_fails("fn footprint( { }");
    assert_parse_fails("fn footprint() { if { } }");
    assert_parse_fails("fn footprint() { for in x { } }");
    assert_parse_fails("let x = 1");
    assert_parse_fails("footprint()");
    assert_parse_fails("fn footprint() { x = ; }");
    assert_parse_fails("fn footprint() { Smd(1,, 2); }");
}

#[test]
fn test_error_display_includes_code() {
    let err = parse_source("fn footprint() { return 1 }").expect_err("missing semicolon");
    assert!(err.contains("E100"), "{err}");
    assert!(err.contains("expected `;`"), "{err}");
}
