//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loan option enums (`AmortizationType`, `Frequency`)
//! - the request posted to the backend (`LoanRequest`)
//! - the returned schedule (`Installment`, `Schedule`)
//! - client search results (`ClientSummary`, `ClientPage`)

pub mod types;

pub use types::*;
