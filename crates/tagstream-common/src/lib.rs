//! Common utilities for the tagstream crates.
//!
//! This crate provides shared infrastructure used by the lexer, the DOM and
//! the command line tool:
//! - **Errors** - the [`Error`] type and [`Result`] alias returned across crates
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod error;
pub mod warning;

pub use error::{Error, Result};
