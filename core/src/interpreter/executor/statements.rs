//! Statement execution handlers
//!
//! Each statement form has a handler that evaluates what it needs, updates
//! the interpreter and moves the [`FlowState`] to the next statement.

use super::flow::FlowState;
use super::Interpreter;
use crate::interpreter::expressions::evaluate;
use crate::interpreter::trace::TraceEvent;
use crate::interpreter::types::{FrameKind, Halt, Line, Stmt, Step, Value};

/* ===================== Dispatch ===================== */

/// Execute one statement of `body` (the one at `flow.pc`)
pub(super) fn execute_statement(
    interp: &mut Interpreter,
    kind: &FrameKind,
    flow: &mut FlowState,
    body: &[Line],
    stmt: &Stmt,
) -> Result<Step, Halt> {
    match stmt {
        Stmt::ProgramStart => {
            if *kind == FrameKind::Main {
                interp.depth += 1;
            }
            flow.advance();
        }

        Stmt::ProgramEnd => {
            if *kind == FrameKind::Main {
                interp.depth -= 1;
                if interp.depth == 0 {
                    return Ok(Step::Done);
                }
            }
            flow.advance();
        }

        Stmt::Waterfall { test } => execute_waterfall(interp, flow, test)?,

        Stmt::Otherwise => flow.otherwise(&mut interp.depth),

        Stmt::EndWaterfall => flow.end_waterfall(&mut interp.depth),

        Stmt::FlowUntil { test } => execute_flow_until(interp, flow, body, test)?,

        Stmt::RiverBend => execute_river_bend(interp, flow, body)?,

        Stmt::CreateStream { name, expr } => {
            let value = evaluate(expr, interp)?;
            interp.declare(kind, name, value);
            flow.advance();
        }

        Stmt::DirectStream { name, expr } => {
            let value = evaluate(expr, interp)?;
            interp.assign(kind, name, value);
            flow.advance();
        }

        Stmt::Deposit { expr } => {
            let value = evaluate(expr, interp)?;
            interp.log_flow(TraceEvent::Output {
                value: value.clone(),
            });
            tracing::debug!(%value, "sediment deposited");
            interp.outputs.push(value);
            flow.advance();
        }

        Stmt::Return { expr } => match kind {
            FrameKind::Tributary { name } => {
                let value = match expr {
                    Some(expr) => evaluate(expr, interp)?,
                    None => Value::default(),
                };
                interp.log_flow(TraceEvent::Returning {
                    tributary: name.clone(),
                    value: value.clone(),
                });
                return Ok(Step::Return(value));
            }
            FrameKind::Main => flow.advance(),
        },

        Stmt::TributaryHeader { .. } | Stmt::Rejoin | Stmt::Unrecognized => flow.advance(),
    }

    Ok(Step::Continue)
}

/* ===================== Statement Handlers ===================== */

/// Execute `if waterfall COND:`
fn execute_waterfall(
    interp: &mut Interpreter,
    flow: &mut FlowState,
    test: &str,
) -> Result<(), Halt> {
    let flows = evaluate(test, interp)?.is_truthy();
    interp.log_flow(TraceEvent::WaterfallCheck {
        test: test.to_string(),
        flows,
    });

    if flows {
        flow.enter_then_arm(&mut interp.depth);
    } else {
        flow.skip_then_arm();
    }
    Ok(())
}

/// Execute `flow until COND:`
///
/// The loop runs while the condition is false.
fn execute_flow_until(
    interp: &mut Interpreter,
    flow: &mut FlowState,
    body: &[Line],
    test: &str,
) -> Result<(), Halt> {
    let value = evaluate(test, interp)?;
    let met = value.is_truthy();
    interp.log_flow(TraceEvent::LoopCondition {
        test: test.to_string(),
        value,
    });

    if met {
        interp.log_flow(TraceEvent::LoopSkipped);
        flow.skip_flow(body);
    } else {
        flow.enter_flow(&mut interp.depth);
    }
    Ok(())
}

/// Execute `river bend`
///
/// Re-checks the innermost pending loop: leaves it once the condition holds,
/// otherwise jumps back to its header.
fn execute_river_bend(
    interp: &mut Interpreter,
    flow: &mut FlowState,
    body: &[Line],
) -> Result<(), Halt> {
    interp.depth -= 1;

    let Some(header) = flow.resume_marker() else {
        flow.advance();
        return Ok(());
    };
    let Some(Stmt::FlowUntil { test }) = body.get(header).map(|line| &line.stmt) else {
        flow.advance();
        return Ok(());
    };

    let value = evaluate(test, interp)?;
    let met = value.is_truthy();
    interp.log_flow(TraceEvent::LoopCheck {
        test: test.clone(),
        value,
    });

    if met {
        flow.exit_flow();
        interp.log_flow(TraceEvent::LoopExited);
    } else {
        flow.jump_to(header);
        interp.log_flow(TraceEvent::LoopContinues { index: header });
    }
    Ok(())
}
