pub mod cli;
pub mod config;
pub mod interpreter;

// Re-export main types
pub use config::Config;
pub use interpreter::{
    run_source, Diagnostic, Halt, Interpreter, RunReport, RunStatus, Trace, TraceEvent, Value,
};
