//! `loan-schedule` library crate.
//!
//! The binary (`loan`) is a thin wrapper around this library so that:
//!
//! - validation, HTTP and rendering are testable without spawning processes
//! - the CLI and the TUI share one submission pipeline

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
