//! Expression evaluation
//!
//! River expressions are phrases ("merge a and b", "is x deeper than y?") that
//! are matched against the trimmed text in a fixed priority order, first match
//! wins:
//!
//! 1. `"text"` literal
//! 2. integer literal
//! 3. stream name (local scope first, then global)
//! 4. `converge with F carrying A` (tributary call)
//! 5. `merge`, `separate`, `combine`, `divide`, `remainder of`
//! 6. `does .. equal ..?`, `is .. equal to ..?`, `is .. deeper than ..?`,
//!    `is .. shallower than ..?`
//!
//! Operands are split at the LAST occurrence of the phrase's delimiter, so
//! only an explicitly repeated leading keyword nests on the left.
//!
//! Evaluation never fails on malformed input: problems are reported to the
//! [`Environment`] as diagnostics and the expression yields `0`. The only
//! error that propagates is a [`Halt`] raised inside a tributary call.

use super::trace::Diagnostic;
use super::types::{Halt, Scope, Value};

/// Result of evaluating an expression
pub type EvalResult = Result<Value, Halt>;

/// Everything the evaluator needs from the outside world
///
/// Name resolution always checks [`local_scope`](Environment::local_scope)
/// before [`global_scope`](Environment::global_scope).
pub trait Environment {
    /// Streams of the innermost pending tributary call, if any
    fn local_scope(&self) -> Option<&Scope>;

    /// Program-wide streams
    fn global_scope(&self) -> &Scope;

    /// Invoke a tributary with one argument
    fn call(&mut self, name: &str, argument: Value) -> EvalResult;

    /// Record a non-fatal problem
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Evaluate an expression to a value
pub fn evaluate<E: Environment + ?Sized>(expr: &str, env: &mut E) -> EvalResult {
    let expr = expr.trim();

    if let Some(text) = text_literal(expr) {
        return Ok(Value::Text(text.to_string()));
    }

    if is_integer_literal(expr) {
        return Ok(match expr.parse::<i64>() {
            Ok(n) => Value::Integer(n),
            Err(_) => {
                env.report(Diagnostic::LiteralOutOfRange {
                    literal: expr.to_string(),
                });
                Value::default()
            }
        });
    }

    if let Some(value) = lookup(expr, env) {
        return Ok(value);
    }

    if let Some((name, argument)) = call_phrase(expr) {
        let argument = evaluate(argument, env)?;
        return env.call(name, argument);
    }

    if let Some((left, right)) = split_phrase(expr, "merge ", " and ", "") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        if left.is_text() || right.is_text() {
            return Ok(Value::Text(format!("{}{}", left, right)));
        }
        return Ok(arithmetic(env, expr, "merge", &left, &right, i64::checked_add));
    }

    if let Some((left, right)) = split_phrase(expr, "separate ", " from ", "") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        // "separate a from b" is b - a
        return Ok(arithmetic(env, expr, "separate", &right, &left, i64::checked_sub));
    }

    if let Some((left, right)) = split_phrase(expr, "combine ", " and ", "") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        return Ok(arithmetic(env, expr, "combine", &left, &right, i64::checked_mul));
    }

    if let Some((dividend, divisor)) = split_phrase(expr, "divide ", " by ", "") {
        // The divisor is evaluated first; a zero divisor leaves the dividend unevaluated
        let divisor = evaluate(divisor, env)?;
        if divisor == Value::Integer(0) {
            env.report(Diagnostic::DivideByZero);
            return Ok(Value::default());
        }
        let dividend = evaluate(dividend, env)?;
        return Ok(arithmetic(env, expr, "divide", &dividend, &divisor, floor_div));
    }

    if let Some((dividend, divisor)) = split_phrase(expr, "remainder of ", " divided by ", "") {
        let dividend = evaluate(dividend, env)?;
        let divisor = evaluate(divisor, env)?;
        if divisor == Value::Integer(0) {
            env.report(Diagnostic::ModuloByZero);
            return Ok(Value::default());
        }
        return Ok(arithmetic(env, expr, "take the remainder of", &dividend, &divisor, floor_mod));
    }

    if let Some((left, right)) = split_phrase(expr, "does ", " equal ", "?") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        return Ok(Value::from_bool(left == right));
    }

    if let Some((left, right)) = split_phrase(expr, "is ", " equal to ", "?") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        return Ok(Value::from_bool(left == right));
    }

    if let Some((left, right)) = split_phrase(expr, "is ", " deeper than ", "?") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        return Ok(ordering(env, expr, "deeper than", &left, &right, |l, r| l > r));
    }

    if let Some((left, right)) = split_phrase(expr, "is ", " shallower than ", "?") {
        let left = evaluate(left, env)?;
        let right = evaluate(right, env)?;
        return Ok(ordering(env, expr, "shallower than", &left, &right, |l, r| l < r));
    }

    env.report(Diagnostic::UnknownExpression {
        expr: expr.to_string(),
    });
    Ok(Value::default())
}

/* ===================== Phrase Matching ===================== */

fn text_literal(expr: &str) -> Option<&str> {
    if expr.len() >= 2 && expr.starts_with('"') && expr.ends_with('"') {
        Some(&expr[1..expr.len() - 1])
    } else {
        None
    }
}

fn is_integer_literal(expr: &str) -> bool {
    let digits = expr.strip_prefix('-').unwrap_or(expr);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn lookup<E: Environment + ?Sized>(name: &str, env: &E) -> Option<Value> {
    env.local_scope()
        .and_then(|locals| locals.get(name))
        .or_else(|| env.global_scope().get(name))
        .cloned()
}

/// `converge with NAME carrying ARG` -> (NAME, ARG)
fn call_phrase(expr: &str) -> Option<(&str, &str)> {
    let rest = expr.strip_prefix("converge with ")?;
    let end = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let (name, after) = rest.split_at(end);
    let argument = after.strip_prefix(" carrying ")?;
    Some((name, argument))
}

/// Split `PREFIX left DELIMITER right SUFFIX` at the last delimiter
fn split_phrase<'a>(
    expr: &'a str,
    prefix: &str,
    delimiter: &str,
    suffix: &str,
) -> Option<(&'a str, &'a str)> {
    let body = expr.strip_prefix(prefix)?.strip_suffix(suffix)?;
    let at = body.rfind(delimiter)?;
    Some((&body[..at], &body[at + delimiter.len()..]))
}

/* ===================== Operators ===================== */

fn arithmetic<E: Environment + ?Sized>(
    env: &mut E,
    expr: &str,
    operation: &str,
    left: &Value,
    right: &Value,
    op: fn(i64, i64) -> Option<i64>,
) -> Value {
    let (Some(l), Some(r)) = (left.as_integer(), right.as_integer()) else {
        env.report(Diagnostic::TextArithmetic {
            operation: operation.to_string(),
            expr: expr.to_string(),
        });
        return Value::default();
    };

    match op(l, r) {
        Some(n) => Value::Integer(n),
        None => {
            env.report(Diagnostic::Overflow {
                expr: expr.to_string(),
            });
            Value::default()
        }
    }
}

fn ordering<E: Environment + ?Sized>(
    env: &mut E,
    expr: &str,
    phrase: &str,
    left: &Value,
    right: &Value,
    cmp: fn(i64, i64) -> bool,
) -> Value {
    match (left.as_integer(), right.as_integer()) {
        (Some(l), Some(r)) => Value::from_bool(cmp(l, r)),
        _ => {
            env.report(Diagnostic::TextComparison {
                phrase: phrase.to_string(),
                expr: expr.to_string(),
            });
            Value::default()
        }
    }
}

/// Division rounding toward negative infinity
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

/// Remainder matching [`floor_div`]; takes the sign of the divisor
pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let remainder = a.wrapping_rem(b);
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}
