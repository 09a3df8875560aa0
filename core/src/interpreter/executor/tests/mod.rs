//! Tests for the executor
//!
//! Organized by feature area

mod assign_tests;
mod basic_tests;
mod helpers;
