//! HTTP integration with the loan calculation backend.
//!
//! The backend owns the amortization math. This client posts the validated
//! loan parameters and decodes the installment list it sends back. Every
//! transport or status failure collapses into one user-facing message; the
//! cause only goes to the log.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::Config;
use crate::domain::{ClientPage, Installment, LoanRequest, Schedule};
use crate::error::AppError;

pub const CALCULATE_PATH: &str = "/loans/calcular-amortizacao";
pub const CLIENT_SEARCH_PATH: &str = "/clients/search";

pub const CALCULATION_FAILED: &str = "Failed to calculate the amortization plan. Please try again later.";
pub const NO_RESULTS: &str = "No results found. Check the data and try again.";
pub const CLIENT_SEARCH_FAILED: &str = "Failed to search clients. Please try again later.";

/// Longest slice of an error body copied into the log.
const LOGGED_BODY_LIMIT: usize = 512;

pub struct LoanApiClient {
    client: Client,
    base_url: String,
}

impl LoanApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::input(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one calculation request and return the schedule.
    pub fn calculate_schedule(&self, request: &LoanRequest) -> Result<Schedule, AppError> {
        let url = format!("{}{CALCULATE_PATH}", self.base_url);
        tracing::info!(
            %url,
            client_id = %request.client_id,
            installments = request.number_of_installments,
            "submitting amortization request"
        );

        let resp = self.client.post(&url).json(request).send().map_err(|e| {
            tracing::error!(error = %e, "amortization request failed");
            AppError::remote(CALCULATION_FAILED)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::error!(%status, body = %clip(&body), "amortization request rejected");
            return Err(AppError::remote(CALCULATION_FAILED));
        }

        let body = resp.text().map_err(|e| {
            tracing::error!(error = %e, "failed to read amortization response");
            AppError::remote(CALCULATION_FAILED)
        })?;

        let schedule = decode_schedule(&body)?;
        tracing::debug!(installments = schedule.len(), "amortization schedule received");
        Ok(schedule)
    }

    /// Look up clients by (partial) name.
    pub fn search_clients(&self, name: &str, page: u32, size: u32) -> Result<ClientPage, AppError> {
        let url = format!("{}{CLIENT_SEARCH_PATH}", self.base_url);
        tracing::info!(%url, query = name, page, size, "searching clients");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("name", name.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ])
            .send()
            .map_err(|e| {
                tracing::error!(error = %e, "client search failed");
                AppError::remote(CLIENT_SEARCH_FAILED)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::error!(%status, body = %clip(&body), "client search rejected");
            return Err(AppError::remote(CLIENT_SEARCH_FAILED));
        }

        resp.json::<ClientPage>().map_err(|e| {
            tracing::error!(error = %e, "failed to parse client search response");
            AppError::remote(CLIENT_SEARCH_FAILED)
        })
    }
}

/// Decode a 2xx response body into a schedule.
///
/// - invalid JSON, or array entries that are not installments: calculation failure
/// - valid JSON that is not an array: nothing to render
pub fn decode_schedule(body: &str) -> Result<Schedule, AppError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "amortization response is not JSON");
        AppError::remote(CALCULATION_FAILED)
    })?;

    let Value::Array(items) = value else {
        tracing::warn!(body = %clip(body), "amortization response is not a list");
        return Err(AppError::remote(NO_RESULTS));
    };

    let installments = items
        .into_iter()
        .map(serde_json::from_value::<Installment>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!(error = %e, "malformed installment in amortization response");
            AppError::remote(CALCULATION_FAILED)
        })?;

    let schedule = Schedule::new(installments);
    if !schedule.totals_in_range() {
        tracing::error!(installments = schedule.len(), "amortization totals overflow");
        return Err(AppError::remote(CALCULATION_FAILED));
    }
    Ok(schedule)
}

fn clip(body: &str) -> &str {
    match body.char_indices().nth(LOGGED_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn decodes_installment_array_in_order() {
        let body = r#"[
            {"installmentNumber": 1, "installmentDate": "2025-02-01", "installmentAmount": 800,
             "installmentInterest": 50, "installmentTotal": 850},
            {"installmentNumber": 2, "installmentDate": "2025-03-01", "installmentAmount": 840,
             "installmentInterest": 10.5, "installmentTotal": 850.5}
        ]"#;
        let schedule = decode_schedule(body).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.installments[0].installment_number, 1);
        assert_eq!(schedule.installments[1].installment_number, 2);
        assert_eq!(
            schedule.installments[1].installment_date,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(schedule.total_interest(), dec!(60.5));
        assert_eq!(schedule.total_accumulated(), dec!(1700.5));
    }

    #[test]
    fn empty_array_is_an_empty_schedule() {
        let schedule = decode_schedule("[]").unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn non_array_body_means_no_results() {
        for body in ["{}", "null", r#"{"error": "x"}"#, "42"] {
            let err = decode_schedule(body).unwrap_err();
            assert_eq!(err.message(), NO_RESULTS, "body: {body}");
            assert_eq!(err.exit_code(), crate::error::EXIT_REMOTE);
        }
    }

    #[test]
    fn garbage_body_is_a_calculation_failure() {
        assert_eq!(decode_schedule("<html>").unwrap_err().message(), CALCULATION_FAILED);
        assert_eq!(
            decode_schedule(r#"[{"installmentNumber": "one"}]"#).unwrap_err().message(),
            CALCULATION_FAILED
        );
    }

    #[test]
    fn overflowing_totals_are_a_calculation_failure() {
        let body = r#"[
            {"installmentNumber": 1, "installmentDate": "2025-02-01", "installmentAmount": 1,
             "installmentInterest": 5e28, "installmentTotal": 1},
            {"installmentNumber": 2, "installmentDate": "2025-03-01", "installmentAmount": 1,
             "installmentInterest": 5e28, "installmentTotal": 1}
        ]"#;
        let err = decode_schedule(body).unwrap_err();
        assert_eq!(err.message(), CALCULATION_FAILED);
        assert_eq!(err.exit_code(), crate::error::EXIT_REMOTE);
    }

    #[test]
    fn clip_respects_char_boundaries() {
        let long = "é".repeat(LOGGED_BODY_LIMIT + 10);
        assert_eq!(clip(&long).chars().count(), LOGGED_BODY_LIMIT);
        assert_eq!(clip("short"), "short");
    }
}
