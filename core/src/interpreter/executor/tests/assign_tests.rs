use super::helpers::*;
use maplit::btreemap;

#[test]
fn test_create_and_direct_at_top_level_bind_globals() {
    let source = r#"
create stream a carrying 1
direct stream a to carry 2
direct stream fresh to carry 3
"#;
    let report = run(source);

    assert_eq!(
        report.globals,
        btreemap! {
            "a".to_string() => int(2),
            "fresh".to_string() => int(3),
        }
    );
}

#[test]
fn test_streams_can_change_type() {
    let report = run("create stream a carrying 1\ndirect stream a to carry \"dry\"\n");

    assert_eq!(report.globals["a"], text("dry"));
}

#[test]
fn test_tributary_scoping_rules() {
    let source = r#"
create stream shared carrying 1
create stream shadow carrying "global"
tributary work flowing from current
    create stream shadow carrying "local"
    direct stream shadow to carry "still local"
    direct stream shared to carry merge shared and current
    direct stream fresh to carry shadow
    direct stream current to carry 0
    return to main river: shadow
rejoin main river
create stream got carrying converge with work carrying 10
"#;
    let report = run(source);

    assert!(report.completed());
    assert_eq!(
        report.globals,
        btreemap! {
            "shared".to_string() => int(11),
            "shadow".to_string() => text("global"),
            "fresh".to_string() => text("still local"),
            "got".to_string() => text("still local"),
        }
    );
}

#[test]
fn test_locals_are_visible_before_globals() {
    let source = r#"
create stream current carrying 100
tributary echo flowing from current
    return to main river: current
rejoin main river
deposit sediment: converge with echo carrying 5
deposit sediment: current
"#;
    let report = run(source);

    assert_eq!(report.outputs, ints(&[5, 100]));
}

#[test]
fn test_caller_locals_are_not_visible_to_callee() {
    let source = r#"
tributary peek flowing from current
    return to main river: secret
rejoin main river
tributary hide flowing from current
    create stream secret carrying 7
    return to main river: converge with peek carrying 0
rejoin main river
create stream r carrying converge with hide carrying 0
"#;
    let report = run(source);

    assert_eq!(report.globals["r"], int(0));
    assert_eq!(report.trace.diagnostics().count(), 1);
}
