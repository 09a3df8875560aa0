//! Branch and loop bookkeeping shared by the top-level and tributary loops
//!
//! Branch skipping keeps an explicit skip context with its own nesting count,
//! so a skipped region may contain whole waterfalls of its own. Every open
//! arm is tracked on a stack to know whether `otherwise:` ends a true arm or
//! opens an else arm. Loop headers waiting to be re-checked at their
//! `river bend` are kept on a resume stack, one per executing sequence.

use crate::interpreter::types::{Line, Stmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arm {
    Then,
    Else,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipTarget {
    /// Condition was false: resume at `otherwise:` or `end waterfall`
    ElseOrEnd,
    /// True arm finished: pass over the else arm up to `end waterfall`
    End,
}

#[derive(Debug, Clone, Copy)]
struct Skip {
    target: SkipTarget,
    /// Waterfalls opened inside the skipped region and not yet closed
    nested: usize,
}

/// Execution position and block bookkeeping of one statement sequence
#[derive(Debug, Default)]
pub(super) struct FlowState {
    /// Index of the next statement to visit
    pub pc: usize,
    arms: Vec<Arm>,
    skip: Option<Skip>,
    resume: Vec<usize>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.pc += 1;
    }

    pub fn is_skipping(&self) -> bool {
        self.skip.is_some()
    }

    /* ===================== Waterfalls ===================== */

    /// Condition held: run the true arm
    pub fn enter_then_arm(&mut self, depth: &mut isize) {
        *depth += 1;
        self.arms.push(Arm::Then);
        self.pc += 1;
    }

    /// Condition failed: skip to the matching `otherwise:` or `end waterfall`
    pub fn skip_then_arm(&mut self) {
        self.skip = Some(Skip {
            target: SkipTarget::ElseOrEnd,
            nested: 0,
        });
        self.pc += 1;
    }

    /// `otherwise:` reached while executing
    ///
    /// Inside an open arm this ends it and skips the else arm. With no open
    /// waterfall it opens an else arm directly.
    pub fn otherwise(&mut self, depth: &mut isize) {
        if self.arms.is_empty() {
            *depth += 1;
            self.arms.push(Arm::Else);
        } else {
            self.skip = Some(Skip {
                target: SkipTarget::End,
                nested: 0,
            });
        }
        self.pc += 1;
    }

    /// `end waterfall` reached while executing
    pub fn end_waterfall(&mut self, depth: &mut isize) {
        *depth -= 1;
        self.arms.pop();
        self.pc += 1;
    }

    /// Visit a statement while skipping: nothing runs, only markers count
    pub fn scan(&mut self, stmt: &Stmt, depth: &mut isize) {
        self.pc += 1;
        let Some(skip) = self.skip.as_mut() else {
            return;
        };

        match stmt {
            Stmt::Waterfall { .. } => skip.nested += 1,
            Stmt::EndWaterfall if skip.nested > 0 => skip.nested -= 1,
            Stmt::EndWaterfall => {
                let target = skip.target;
                self.skip = None;
                if target == SkipTarget::End {
                    *depth -= 1;
                    self.arms.pop();
                }
            }
            Stmt::Otherwise if skip.nested == 0 && skip.target == SkipTarget::ElseOrEnd => {
                self.skip = None;
                *depth += 1;
                self.arms.push(Arm::Else);
            }
            _ => {}
        }
    }

    /* ===================== Flows ===================== */

    /// Condition false at the header: enter the body
    ///
    /// The header is remembered for its `river bend` unless it already is
    /// the innermost pending loop (re-entry after a jump back).
    pub fn enter_flow(&mut self, depth: &mut isize) {
        if self.resume.last() != Some(&self.pc) {
            self.resume.push(self.pc);
        }
        *depth += 1;
        self.pc += 1;
    }

    /// Condition true at the header: continue after the matching `river bend`
    pub fn skip_flow(&mut self, body: &[Line]) {
        if self.resume.last() == Some(&self.pc) {
            self.resume.pop();
        }
        self.pc = past_matching_bend(body, self.pc);
    }

    /// Header of the innermost pending loop
    pub fn resume_marker(&self) -> Option<usize> {
        self.resume.last().copied()
    }

    /// Condition true at the bend: leave the loop
    pub fn exit_flow(&mut self) {
        self.resume.pop();
        self.pc += 1;
    }

    /// Condition still false at the bend: back to the header
    pub fn jump_to(&mut self, header: usize) {
        self.pc = header;
    }

    #[cfg(test)]
    pub fn pending_flows(&self) -> usize {
        self.resume.len()
    }
}

/// Index just past the `river bend` closing the loop whose header is at `header`
fn past_matching_bend(body: &[Line], header: usize) -> usize {
    let mut nested = 1usize;
    let mut index = header + 1;
    while index < body.len() && nested > 0 {
        match body[index].stmt {
            Stmt::FlowUntil { .. } => nested += 1,
            Stmt::RiverBend => nested -= 1,
            _ => {}
        }
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::preprocess;

    #[test]
    fn test_skip_passes_over_nested_waterfalls() {
        let program = preprocess(concat!(
            "if waterfall 0:\n",
            "if waterfall 1:\n",
            "end waterfall\n",
            "otherwise:\n",
            "deposit sediment: 1\n",
            "end waterfall\n",
        ));
        let mut flow = FlowState::new();
        let mut depth = 0isize;

        flow.skip_then_arm();
        // inner header, inner end, outer otherwise
        for line in &program.main[1..4] {
            flow.scan(&line.stmt, &mut depth);
        }

        assert!(!flow.is_skipping());
        assert_eq!(flow.pc, 4);
        assert_eq!(depth, 1);
    }

    #[test]
    fn test_skip_flow_lands_after_matching_bend() {
        let program = preprocess(concat!(
            "flow until 1:\n",
            "flow until 0:\n",
            "river bend\n",
            "deposit sediment: 1\n",
            "river bend\n",
            "deposit sediment: 2\n",
        ));
        let mut flow = FlowState::new();
        flow.skip_flow(&program.main);

        assert_eq!(flow.pc, 5);
    }

    #[test]
    fn test_reentering_header_does_not_duplicate_marker() {
        let mut flow = FlowState::new();
        let mut depth = 0isize;

        flow.enter_flow(&mut depth);
        flow.jump_to(0);
        flow.enter_flow(&mut depth);

        assert_eq!(flow.pending_flows(), 1);
        assert_eq!(flow.resume_marker(), Some(0));
    }
}
