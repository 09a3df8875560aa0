use super::helpers::*;
use crate::interpreter::executor::RunStatus;
use crate::interpreter::trace::{Diagnostic, TraceEvent};
use maplit::btreemap;

#[test]
fn test_deposit_records_outputs_in_order() {
    let source = r#"
deposit sediment: 1
deposit sediment: "two"
deposit sediment: merge 1 and 2
"#;
    let report = run(source);

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.outputs, vec![int(1), text("two"), int(3)]);
    assert_eq!(report.steps, 3);
}

#[test]
fn test_statements_after_program_end_do_not_run() {
    let source = r#"
river begins its journey
    deposit sediment: 1
river meets ocean
deposit sediment: 2
"#;
    let report = run(source);

    assert!(report.completed());
    assert_eq!(report.outputs, ints(&[1]));
}

#[test]
fn test_end_marker_without_start_does_not_stop() {
    let report = run("deposit sediment: 1\nriver meets ocean\ndeposit sediment: 2\n");

    assert_eq!(report.outputs, ints(&[1, 2]));
}

#[test]
fn test_unrecognized_lines_are_visited_but_ignored() {
    let report = run("the river sings\n# only a comment\ndeposit sediment: 7\n");

    assert_eq!(report.outputs, ints(&[7]));
    // blank and comment-only lines are dropped during preprocessing
    assert_eq!(report.steps, 2);
}

#[test]
fn test_return_at_top_level_is_ignored() {
    let report = run("return to main river: 5\ndeposit sediment: 1\n");

    assert_eq!(report.outputs, ints(&[1]));
}

#[test]
fn test_divide_by_zero_substitutes_zero_and_continues() {
    let report = run("create stream q carrying divide 1 by 0\ndeposit sediment: \"after\"\n");

    assert!(report.completed());
    assert_eq!(report.globals, btreemap! { "q".to_string() => int(0) });
    assert_eq!(report.outputs, texts(&["after"]));
    assert_eq!(report.trace.diagnostics().collect::<Vec<_>>(), vec![&Diagnostic::DivideByZero]);
}

#[test]
fn test_unknown_expression_is_reported() {
    let report = run("deposit sediment: the sea is wide\n");

    assert_eq!(report.outputs, ints(&[0]));
    assert!(report
        .trace
        .lines()
        .iter()
        .any(|line| line == "RIVER ERROR: Unknown expression 'the sea is wide'"));
}

#[test]
fn test_trace_indents_by_block_depth() {
    let source = r#"
river begins its journey
    if waterfall 1:
        deposit sediment: 5
    end waterfall
river meets ocean
"#;
    let report = run(source);

    let lines = report.trace.lines();
    assert_eq!(
        lines,
        vec![
            "[Line 0] river begins its journey",
            "  [Line 1] if waterfall 1:",
            "  Waterfall check: 1 -> flows",
            "    [Line 2] deposit sediment: 5",
            "    Output: 5",
            "    [Line 3] end waterfall",
            "  [Line 4] river meets ocean",
        ]
    );
}

#[test]
fn test_line_events_carry_main_sequence_index() {
    let source = r#"
tributary noop flowing from current
rejoin main river
deposit sediment: 1
"#;
    let report = run(source);

    let first = &report.trace.entries()[0];
    assert_eq!(
        first.event,
        TraceEvent::Line {
            index: 0,
            text: "deposit sediment: 1".to_string()
        }
    );
}

#[test]
fn test_same_source_runs_identically() {
    let source = r#"
create stream a carrying 3
direct stream a to carry combine a and a
deposit sediment: a
"#;

    assert_eq!(run(source), run(source));
}
