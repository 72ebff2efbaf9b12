//! Input/output helpers.
//!
//! - schedule exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
