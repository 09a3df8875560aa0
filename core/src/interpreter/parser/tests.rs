//! Preprocessor tests - verify line cleaning, classification and partitioning
//!
//! These tests do NOT execute anything - that's covered by the executor tests.

use crate::interpreter::parser::{clean_line, parse_line, preprocess};
use crate::interpreter::types::Stmt;

/* ===================== Line Cleaning ===================== */

#[test]
fn test_clean_line_strips_comments_and_whitespace() {
    assert_eq!(clean_line("   create stream a carrying 1   # note"), "create stream a carrying 1");
    assert_eq!(clean_line("# only a comment"), "");
    assert_eq!(clean_line("\t \t"), "");
}

/* ===================== Statement Forms ===================== */

#[test]
fn test_parse_markers() {
    assert_eq!(parse_line("river begins its journey"), Stmt::ProgramStart);
    assert_eq!(parse_line("river meets ocean"), Stmt::ProgramEnd);
    assert_eq!(parse_line("otherwise:"), Stmt::Otherwise);
    assert_eq!(parse_line("end waterfall"), Stmt::EndWaterfall);
    assert_eq!(parse_line("river bend"), Stmt::RiverBend);
    assert_eq!(parse_line("rejoin main river"), Stmt::Rejoin);
}

#[test]
fn test_parse_waterfall_keeps_inner_colons() {
    assert_eq!(
        parse_line("if waterfall does x equal \"a:b\"?:"),
        Stmt::Waterfall {
            test: "does x equal \"a:b\"?".to_string()
        }
    );
}

#[test]
fn test_parse_flow_until() {
    assert_eq!(
        parse_line("flow until does n equal 0?:"),
        Stmt::FlowUntil {
            test: "does n equal 0?".to_string()
        }
    );
}

#[test]
fn test_parse_stream_statements() {
    assert_eq!(
        parse_line("create stream total carrying merge 1 and 2"),
        Stmt::CreateStream {
            name: "total".to_string(),
            expr: "merge 1 and 2".to_string()
        }
    );
    assert_eq!(
        parse_line("direct stream total to carry 7"),
        Stmt::DirectStream {
            name: "total".to_string(),
            expr: "7".to_string()
        }
    );
    assert_eq!(
        parse_line("deposit sediment: \"hello\""),
        Stmt::Deposit {
            expr: "\"hello\"".to_string()
        }
    );
}

#[test]
fn test_parse_return_takes_text_after_first_colon() {
    assert_eq!(
        parse_line("return to main river: merge \"a:\" and 1"),
        Stmt::Return {
            expr: Some(" merge \"a:\" and 1".to_string())
        }
    );
    assert_eq!(parse_line("return to main river"), Stmt::Return { expr: None });
}

#[test]
fn test_parse_tributary_header() {
    assert_eq!(
        parse_line("tributary double flowing from current"),
        Stmt::TributaryHeader {
            name: "double".to_string()
        }
    );
}

#[test]
fn test_incomplete_forms_are_unrecognized() {
    assert_eq!(parse_line("create stream x carrying"), Stmt::Unrecognized);
    assert_eq!(parse_line("if waterfall 1"), Stmt::Unrecognized);
    assert_eq!(parse_line("create stream two words carrying 1"), Stmt::Unrecognized);
    assert_eq!(parse_line("the river is calm"), Stmt::Unrecognized);
}

/* ===================== Partitioning ===================== */

#[test]
fn test_preprocess_partitions_tributaries() {
    let source = r#"
        # doubling helper
        tributary double flowing from current
            return to main river: combine current and 2
        rejoin main river

        river begins its journey
        deposit sediment: converge with double carrying 21
        river meets ocean
    "#;

    let program = preprocess(source);

    let main: Vec<&str> = program.main.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        main,
        vec![
            "river begins its journey",
            "deposit sediment: converge with double carrying 21",
            "river meets ocean"
        ]
    );

    let body = &program.tributaries["double"];
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].text, "return to main river: combine current and 2");
    assert!(program.notes.is_empty());
}

#[test]
fn test_new_definition_closes_previous_one() {
    let source = r#"
tributary a flowing from current
    deposit sediment: 1
tributary b flowing from current
    deposit sediment: 2
rejoin main river
"#;
    let program = preprocess(source);

    assert_eq!(program.tributaries["a"].len(), 1);
    assert_eq!(program.tributaries["b"].len(), 1);
    assert!(program.main.is_empty());
}

#[test]
fn test_unclosed_definition_is_registered() {
    let program = preprocess("tributary tail flowing from current\ndeposit sediment: current");
    assert_eq!(program.tributaries["tail"].len(), 1);
}

#[test]
fn test_stray_rejoin_stays_in_main() {
    let program = preprocess("rejoin main river\n");
    assert_eq!(program.main.len(), 1);
    assert_eq!(program.main[0].stmt, Stmt::Rejoin);
}

#[test]
fn test_headers_never_reach_statement_sequences() {
    let source = r#"
tributary a flowing from current
    deposit sediment: 1
tributary b flowing from current
rejoin main river
deposit sediment: 2
tributary c flowing from current
"#;
    let program = preprocess(source);

    let headers = program
        .main
        .iter()
        .chain(program.tributaries.values().flat_map(|body| body.iter()))
        .filter(|line| matches!(line.stmt, Stmt::TributaryHeader { .. }))
        .count();
    assert_eq!(headers, 0);
    assert_eq!(program.tributaries.len(), 3);
}
