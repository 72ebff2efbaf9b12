//! Shared "submit" logic used by both CLI and TUI front-ends.
//!
//! validate form -> post request -> decoded schedule
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::api::LoanApiClient;
use crate::domain::{LoanRequest, Schedule};
use crate::error::AppError;
use crate::form::LoanForm;

/// Outputs of one successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub request: LoanRequest,
    pub schedule: Schedule,
}

/// Validate the form and, only if it passes, request the schedule.
pub fn submit(client: &LoanApiClient, form: &LoanForm, today: NaiveDate) -> Result<Submission, AppError> {
    let request = form.validate(today).map_err(|err| {
        tracing::warn!(reason = %err, "loan form rejected");
        AppError::from(err)
    })?;

    let schedule = client.calculate_schedule(&request)?;
    Ok(Submission { request, schedule })
}
