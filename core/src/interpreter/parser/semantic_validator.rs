//! Semantic validation for preprocessed River programs
//!
//! The interpreter runs anything it is given: unknown lines are stepped over
//! and unbalanced markers just shift the block depth. This module reports
//! those situations up front without executing the program.

use std::fmt;

use crate::interpreter::types::{Line, PreprocessNote, Program, Stmt};

/* ===================== Warning Types ===================== */

/// Where a statement lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Main { index: usize },
    Tributary { name: String, index: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Main { index } => write!(f, "line {}", index),
            Location::Tributary { name, index } => {
                write!(f, "tributary {}, statement {}", name, index)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// No statement form matched the line; it will be skipped
    Unrecognized { location: Location, text: String },
    /// A tributary definition began before the previous one was rejoined
    ImplicitlyClosed { name: String },
    /// Input ended inside a tributary definition
    Unclosed { name: String },
    /// The same tributary name was defined twice; the last body wins
    Redefined { name: String },
    /// `otherwise:` or `end waterfall` with no open waterfall
    UnmatchedWaterfallMarker { location: Location, text: String },
    /// `if waterfall` never closed by `end waterfall`
    UnclosedWaterfall { location: Location },
    /// `river bend` with no open `flow until`
    UnmatchedRiverBend { location: Location },
    /// `flow until` never closed by `river bend`
    UnclosedFlow { location: Location },
    /// `return to main river` in the top-level sequence does nothing
    ReturnOutsideTributary { location: Location },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::Unrecognized { location, text } => {
                write!(f, "{}: unrecognized statement '{}'", location, text)
            }
            ValidationWarning::ImplicitlyClosed { name } => write!(
                f,
                "tributary '{}' is closed by the next definition instead of 'rejoin main river'",
                name
            ),
            ValidationWarning::Unclosed { name } => {
                write!(f, "tributary '{}' never rejoins the main river", name)
            }
            ValidationWarning::Redefined { name } => {
                write!(f, "tributary '{}' is defined more than once", name)
            }
            ValidationWarning::UnmatchedWaterfallMarker { location, text } => {
                write!(f, "{}: '{}' has no open waterfall", location, text)
            }
            ValidationWarning::UnclosedWaterfall { location } => {
                write!(f, "{}: waterfall is never closed", location)
            }
            ValidationWarning::UnmatchedRiverBend { location } => {
                write!(f, "{}: river bend has no open flow", location)
            }
            ValidationWarning::UnclosedFlow { location } => {
                write!(f, "{}: flow is never closed by a river bend", location)
            }
            ValidationWarning::ReturnOutsideTributary { location } => {
                write!(f, "{}: return outside a tributary has no effect", location)
            }
        }
    }
}

/* ===================== Public API ===================== */

/// Validate a preprocessed program
///
/// Returns every warning found, top-level statements first, then tributaries
/// in name order. An empty result means the program is well formed.
pub fn validate_program(program: &Program) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = program
        .notes
        .iter()
        .map(|note| match note {
            PreprocessNote::ImplicitlyClosed { name } => {
                ValidationWarning::ImplicitlyClosed { name: name.clone() }
            }
            PreprocessNote::Unclosed { name } => ValidationWarning::Unclosed { name: name.clone() },
            PreprocessNote::Redefined { name } => {
                ValidationWarning::Redefined { name: name.clone() }
            }
        })
        .collect();

    check_sequence(&program.main, |index| Location::Main { index }, true, &mut warnings);

    let mut names: Vec<&String> = program.tributaries.keys().collect();
    names.sort();
    for name in names {
        let body = &program.tributaries[name];
        check_sequence(
            body,
            |index| Location::Tributary {
                name: name.clone(),
                index,
            },
            false,
            &mut warnings,
        );
    }

    warnings
}

/* ===================== Rules ===================== */

fn check_sequence(
    lines: &[Line],
    locate: impl Fn(usize) -> Location,
    is_main: bool,
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut waterfalls: Vec<usize> = Vec::new();
    let mut flows: Vec<usize> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        match &line.stmt {
            Stmt::Unrecognized => warnings.push(ValidationWarning::Unrecognized {
                location: locate(index),
                text: line.text.clone(),
            }),
            Stmt::Waterfall { .. } => waterfalls.push(index),
            Stmt::Otherwise if waterfalls.is_empty() => {
                warnings.push(ValidationWarning::UnmatchedWaterfallMarker {
                    location: locate(index),
                    text: line.text.clone(),
                })
            }
            Stmt::EndWaterfall => {
                if waterfalls.pop().is_none() {
                    warnings.push(ValidationWarning::UnmatchedWaterfallMarker {
                        location: locate(index),
                        text: line.text.clone(),
                    });
                }
            }
            Stmt::FlowUntil { .. } => flows.push(index),
            Stmt::RiverBend => {
                if flows.pop().is_none() {
                    warnings.push(ValidationWarning::UnmatchedRiverBend {
                        location: locate(index),
                    });
                }
            }
            Stmt::Return { .. } if is_main => {
                warnings.push(ValidationWarning::ReturnOutsideTributary {
                    location: locate(index),
                })
            }
            _ => {}
        }
    }

    for index in waterfalls {
        warnings.push(ValidationWarning::UnclosedWaterfall {
            location: locate(index),
        });
    }
    for index in flows {
        warnings.push(ValidationWarning::UnclosedFlow {
            location: locate(index),
        });
    }
}
