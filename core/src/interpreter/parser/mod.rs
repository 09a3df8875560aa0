//! Preprocessor - PEST-based statement classification for River programs
//!
//! Turns program text into a [`Program`]: comments and blank lines are dropped,
//! tributary definitions are split out into their own statement sequences, and
//! every remaining line is classified into a [`Stmt`].

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::rc::Rc;

use super::types::{Line, PreprocessNote, Program, Stmt};

pub mod semantic_validator;

#[cfg(test)]
mod tests;

/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "interpreter/parser/river.pest"]
struct RiverParser;

/* ===================== Public API ===================== */

/// Preprocess River source text into top-level statements and tributaries
///
/// Starting a new tributary definition implicitly closes the previous one, and
/// a definition still open at the end of input is registered with the body it
/// accumulated. A `rejoin main river` outside any definition stays in the
/// top-level sequence as an inert statement.
pub fn preprocess(source: &str) -> Program {
    let mut program = Program::default();
    let mut open: Option<(String, Vec<Line>)> = None;

    for raw in source.lines() {
        let text = clean_line(raw);
        if text.is_empty() {
            continue;
        }

        let stmt = parse_line(text);
        match stmt {
            Stmt::TributaryHeader { name } => {
                if let Some((previous, body)) = open.take() {
                    program.notes.push(PreprocessNote::ImplicitlyClosed {
                        name: previous.clone(),
                    });
                    register(&mut program, previous, body);
                }
                open = Some((name, Vec::new()));
                continue;
            }
            Stmt::Rejoin if open.is_some() => {
                if let Some((name, body)) = open.take() {
                    register(&mut program, name, body);
                }
                continue;
            }
            _ => {}
        }

        let line = Line {
            text: text.to_string(),
            stmt,
        };
        match open.as_mut() {
            Some((_, body)) => body.push(line),
            None => program.main.push(line),
        }
    }

    if let Some((name, body)) = open {
        program.notes.push(PreprocessNote::Unclosed { name: name.clone() });
        register(&mut program, name, body);
    }

    tracing::debug!(
        statements = program.main.len(),
        tributaries = program.tributaries.len(),
        "preprocessed program"
    );

    program
}

/// Classify a single cleaned line
///
/// Lines that match no statement form become [`Stmt::Unrecognized`]; the
/// executors step over them.
pub fn parse_line(text: &str) -> Stmt {
    let Ok(mut pairs) = RiverParser::parse(Rule::line, text) else {
        return Stmt::Unrecognized;
    };
    match pairs.next() {
        Some(pair) => build_statement(pair),
        None => Stmt::Unrecognized,
    }
}

/// Remove a trailing `#` comment and surrounding whitespace
pub fn clean_line(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(code, _)| code).trim()
}

/* ===================== Statement Builder ===================== */

fn build_statement(pair: Pair<Rule>) -> Stmt {
    match pair.as_rule() {
        Rule::program_start => Stmt::ProgramStart,
        Rule::program_end => Stmt::ProgramEnd,
        Rule::waterfall => Stmt::Waterfall {
            test: field(&pair, Rule::condition),
        },
        Rule::otherwise => Stmt::Otherwise,
        Rule::end_waterfall => Stmt::EndWaterfall,
        Rule::flow_until => Stmt::FlowUntil {
            test: field(&pair, Rule::condition),
        },
        Rule::river_bend => Stmt::RiverBend,
        Rule::create_stream => Stmt::CreateStream {
            name: field(&pair, Rule::word),
            expr: field(&pair, Rule::rest),
        },
        Rule::direct_stream => Stmt::DirectStream {
            name: field(&pair, Rule::word),
            expr: field(&pair, Rule::rest),
        },
        Rule::deposit => Stmt::Deposit {
            expr: field(&pair, Rule::rest),
        },
        Rule::return_stmt => Stmt::Return {
            expr: find_field(&pair, Rule::tail),
        },
        Rule::tributary => Stmt::TributaryHeader {
            name: field(&pair, Rule::word),
        },
        Rule::rejoin => Stmt::Rejoin,
        _ => Stmt::Unrecognized,
    }
}

fn find_field(pair: &Pair<Rule>, rule: Rule) -> Option<String> {
    pair.clone()
        .into_inner()
        .find(|inner| inner.as_rule() == rule)
        .map(|inner| inner.as_str().to_string())
}

fn field(pair: &Pair<Rule>, rule: Rule) -> String {
    find_field(pair, rule).unwrap_or_default()
}

fn register(program: &mut Program, name: String, body: Vec<Line>) {
    let body: Rc<[Line]> = body.into();
    if program.tributaries.insert(name.clone(), body).is_some() {
        program.notes.push(PreprocessNote::Redefined { name });
    }
}
