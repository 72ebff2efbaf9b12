//! Property-based tests for loan form validation and money formatting
//!
//! Uses proptest to check the pre-flight rules across a wide range of inputs

use chrono::{Duration, NaiveDate};
use loan_schedule::domain::{AmortizationType, Frequency};
use loan_schedule::form::{LoanForm, ValidationError};
use loan_schedule::report::format_brl;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn form(amount: String, date: NaiveDate, rate: String, installments: String) -> LoanForm {
    LoanForm {
        amount,
        date: date.format("%Y-%m-%d").to_string(),
        interest_rate: rate,
        amortization_type: "PRESTACOES_CONSTANTES".to_string(),
        frequency: "QUINZENAL".to_string(),
        number_of_installments: installments,
        client_id: "42".to_string(),
    }
}

proptest! {
    /// Property: a fully valid form always becomes the matching request
    #[test]
    fn valid_form_builds_matching_request(
        amount_cents in 100i64..1_000_000_000i64,
        rate_bp in 1i64..10_000i64,
        installments in 1u32..=600u32,
        days_back in 0i64..3650i64,
    ) {
        let amount = Decimal::new(amount_cents, 2);
        let rate = Decimal::new(rate_bp, 4);
        let date = today() - Duration::days(days_back);

        let request = form(amount.to_string(), date, rate.to_string(), installments.to_string())
            .validate(today())
            .unwrap();

        prop_assert_eq!(request.amount, amount);
        prop_assert_eq!(request.interest_rate, rate);
        prop_assert_eq!(request.number_of_installments, installments);
        prop_assert_eq!(request.date, date);
        prop_assert_eq!(request.amortization_type, AmortizationType::ConstantInstallment);
        prop_assert_eq!(request.frequency, Frequency::Biweekly);
        prop_assert_eq!(request.client_id.as_str(), "42");
    }

    /// Property: any positive amount below 1 is rejected with the amount alert
    #[test]
    fn fractional_amount_is_too_small(amount_cents in 1i64..100i64) {
        let amount = Decimal::new(amount_cents, 2);
        let result = form(amount.to_string(), today(), "0.05".to_string(), "12".to_string())
            .validate(today());
        prop_assert_eq!(result, Err(ValidationError::AmountTooSmall));
    }

    /// Property: negative installment counts never reach the request
    #[test]
    fn negative_installments_are_rejected(installments in -10_000i64..0i64) {
        let result = form("5000".to_string(), today(), "0.05".to_string(), installments.to_string())
            .validate(today());
        prop_assert_eq!(result, Err(ValidationError::InstallmentsTooFew));
    }

    /// Property: dates after today are refused
    #[test]
    fn future_dates_are_rejected(days_ahead in 1i64..3650i64) {
        let date = today() + Duration::days(days_ahead);
        let result = form("5000".to_string(), date, "0.05".to_string(), "12".to_string())
            .validate(today());
        prop_assert_eq!(result, Err(ValidationError::DateInFuture));
    }

    /// Property: formatted money keeps every cent and only the grouping changes
    #[test]
    fn brl_formatting_preserves_cents(cents in 0i64..1_000_000_000_000i64) {
        let formatted = format_brl(Decimal::new(cents, 2));
        prop_assert!(formatted.starts_with("R$ "));

        let (int_part, frac_part) = formatted["R$ ".len()..].split_once(',').unwrap();
        prop_assert_eq!(frac_part.len(), 2);
        prop_assert!(int_part.split('.').skip(1).all(|group| group.len() == 3));

        let digits: String = formatted.chars().filter(char::is_ascii_digit).collect();
        prop_assert_eq!(digits.parse::<i64>().unwrap(), cents);
    }
}
