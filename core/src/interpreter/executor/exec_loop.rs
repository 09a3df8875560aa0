//! Core execution loops
//!
//! ## Function Organization
//! 1. run_main() - Top-level executor over the non-tributary statements
//! 2. run_tributary() - Function executor over one tributary body
//! 3. run_sequence() - The stepping loop both of them drive

use super::flow::FlowState;
use super::statements::execute_statement;
use super::Interpreter;
use crate::interpreter::trace::TraceEvent;
use crate::interpreter::types::{FrameKind, Halt, Line, Step, Value};

/* ===================== Public API ===================== */

/// Run the top-level statements until they are exhausted, the program-end
/// marker closes the outermost block, or the step budget runs out
pub fn run_main(interp: &mut Interpreter, main: &[Line]) -> Result<(), Halt> {
    run_sequence(interp, main, &FrameKind::Main).map(|_| ())
}

/// Run one tributary body in the call frame already pushed for it
///
/// Returns the value of the `return to main river` statement that ended the
/// body, or `None` if the body ran out of statements.
pub fn run_tributary(
    interp: &mut Interpreter,
    name: &str,
    body: &[Line],
) -> Result<Option<Value>, Halt> {
    let kind = FrameKind::Tributary {
        name: name.to_string(),
    };
    run_sequence(interp, body, &kind)
}

/* ===================== Stepping Loop ===================== */

fn run_sequence(
    interp: &mut Interpreter,
    body: &[Line],
    kind: &FrameKind,
) -> Result<Option<Value>, Halt> {
    let mut flow = FlowState::new();

    while let Some(line) = body.get(flow.pc) {
        interp.tick(kind)?;
        trace_line(interp, kind, flow.pc, line);

        if flow.is_skipping() {
            flow.scan(&line.stmt, &mut interp.depth);
            continue;
        }

        match execute_statement(interp, kind, &mut flow, body, &line.stmt)? {
            Step::Continue => {}
            Step::Return(value) => return Ok(Some(value)),
            Step::Done => break,
        }
    }

    Ok(None)
}

fn trace_line(interp: &mut Interpreter, kind: &FrameKind, index: usize, line: &Line) {
    let event = match kind {
        FrameKind::Main => TraceEvent::Line {
            index,
            text: line.text.clone(),
        },
        FrameKind::Tributary { name } => TraceEvent::TributaryLine {
            tributary: name.clone(),
            text: line.text.clone(),
        },
    };
    interp.log_flow(event);
}
