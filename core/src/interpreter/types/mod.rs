//! Type definitions for the interpreter
//!
//! - Statements and programs (Stmt, Line, Program)
//! - Runtime values (Value, Scope)
//! - Control flow (FrameKind, CallFrame, Step, Halt)

pub mod ast;
pub mod control;
pub mod values;

pub use ast::{Line, PreprocessNote, Program, Stmt};
pub use control::{CallFrame, FrameKind, Halt, Step};
pub use values::{Scope, Value};
