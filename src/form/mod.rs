//! Loan form state and pre-flight validation.
//!
//! `LoanForm` keeps every field as the raw text the user typed. Nothing is
//! submitted until [`LoanForm::validate`] turns it into a [`LoanRequest`];
//! a failed validation yields the alert text to show and blocks the request.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{AmortizationType, Frequency, LoanRequest};
use crate::error::AppError;

/// Why a form was rejected before submission. `Display` is the alert text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field is empty or unparsable, a numeric field is zero, or the
    /// installment count does not fit in a `u32`.
    #[error("Fill in all fields correctly before submitting.")]
    Incomplete,
    #[error("The loan amount must be greater than or equal to 1.")]
    AmountTooSmall,
    #[error("The number of installments must be greater than or equal to 1.")]
    InstallmentsTooFew,
    #[error("The loan date must be a valid date in YYYY-MM-DD format.")]
    DateInvalid,
    #[error("The loan date cannot be in the future.")]
    DateInFuture,
    #[error("The interest rate must be greater than zero.")]
    RateNotPositive,
    #[error("The amortization type must be CAPITAL_CONSTANTE or PRESTACOES_CONSTANTES.")]
    AmortizationTypeInvalid,
    #[error("The frequency must be one of DIARIO, SEMANAL, QUINZENAL or MENSAL.")]
    FrequencyInvalid,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::input(err.to_string())
    }
}

/// Identifies one input of the loan form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Date,
    InterestRate,
    AmortizationType,
    Frequency,
    Installments,
    Client,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Amount,
        Field::Date,
        Field::InterestRate,
        Field::AmortizationType,
        Field::Frequency,
        Field::Installments,
        Field::Client,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Amount => "Amount",
            Field::Date => "Date",
            Field::InterestRate => "Interest rate",
            Field::AmortizationType => "Amortization type",
            Field::Frequency => "Frequency",
            Field::Installments => "Installments",
            Field::Client => "Client",
        }
    }

    /// Fields picked from a fixed set of options instead of typed.
    pub fn is_choice(self) -> bool {
        matches!(self, Field::AmortizationType | Field::Frequency)
    }
}

/// Raw loan form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanForm {
    pub amount: String,
    pub date: String,
    pub interest_rate: String,
    pub amortization_type: String,
    pub frequency: String,
    pub number_of_installments: String,
    pub client_id: String,
}

impl LoanForm {
    /// Empty form with the loan date pre-filled to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Amount => &self.amount,
            Field::Date => &self.date,
            Field::InterestRate => &self.interest_rate,
            Field::AmortizationType => &self.amortization_type,
            Field::Frequency => &self.frequency,
            Field::Installments => &self.number_of_installments,
            Field::Client => &self.client_id,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Amount => &mut self.amount,
            Field::Date => &mut self.date,
            Field::InterestRate => &mut self.interest_rate,
            Field::AmortizationType => &mut self.amortization_type,
            Field::Frequency => &mut self.frequency,
            Field::Installments => &mut self.number_of_installments,
            Field::Client => &mut self.client_id,
        }
    }

    /// Check the form and build the request to submit.
    ///
    /// The first failing rule wins, in the order the form is read top to bottom
    /// after the blanket "everything filled in" check.
    pub fn validate(&self, today: NaiveDate) -> Result<LoanRequest, ValidationError> {
        let amount = parse_decimal(&self.amount);
        let date = self.date.trim();
        let installments = self.number_of_installments.trim().parse::<i64>().ok();
        let rate = parse_decimal(&self.interest_rate);
        let amortization_type = self.amortization_type.trim();
        let frequency = self.frequency.trim();
        let client_id = self.client_id.trim();

        let (Some(amount), Some(installments), Some(rate)) = (amount, installments, rate) else {
            return Err(ValidationError::Incomplete);
        };
        if amount.is_zero()
            || installments == 0
            || rate.is_zero()
            || date.is_empty()
            || amortization_type.is_empty()
            || frequency.is_empty()
            || client_id.is_empty()
        {
            return Err(ValidationError::Incomplete);
        }

        if amount < Decimal::ONE {
            return Err(ValidationError::AmountTooSmall);
        }

        if installments < 1 {
            return Err(ValidationError::InstallmentsTooFew);
        }
        // Counts past u32 are no more usable than an unparsable one.
        let number_of_installments =
            u32::try_from(installments).map_err(|_| ValidationError::Incomplete)?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ValidationError::DateInvalid)?;
        if date > today {
            return Err(ValidationError::DateInFuture);
        }

        if rate <= Decimal::ZERO {
            return Err(ValidationError::RateNotPositive);
        }

        let amortization_type = AmortizationType::from_str(amortization_type)
            .map_err(|_| ValidationError::AmortizationTypeInvalid)?;
        let frequency = Frequency::from_str(frequency).map_err(|_| ValidationError::FrequencyInvalid)?;

        Ok(LoanRequest {
            amount,
            date,
            interest_rate: rate,
            amortization_type,
            frequency,
            number_of_installments,
            client_id: client_id.to_string(),
        })
    }
}

/// Parse a decimal typed by a person: `1500.50`, or `1500,50` when the comma
/// is the only separator.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        return Decimal::from_str(&trimmed.replace(',', ".")).ok();
    }
    Decimal::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn filled() -> LoanForm {
        LoanForm {
            amount: "10000".to_string(),
            date: "2025-06-01".to_string(),
            interest_rate: "0.05".to_string(),
            amortization_type: "PRESTACOES_CONSTANTES".to_string(),
            frequency: "MENSAL".to_string(),
            number_of_installments: "12".to_string(),
            client_id: "42".to_string(),
        }
    }

    #[test]
    fn valid_form_builds_request() {
        let req = filled().validate(today()).unwrap();
        assert_eq!(req.amount, dec!(10000));
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(req.interest_rate, dec!(0.05));
        assert_eq!(req.amortization_type, AmortizationType::ConstantInstallment);
        assert_eq!(req.frequency, Frequency::Monthly);
        assert_eq!(req.number_of_installments, 12);
        assert_eq!(req.client_id, "42");
    }

    #[test]
    fn new_form_prefills_today() {
        let form = LoanForm::new(today());
        assert_eq!(form.date, "2025-06-15");
        assert!(form.amount.is_empty());
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));
    }

    #[test]
    fn missing_or_zero_fields_are_incomplete() {
        for field in Field::ALL {
            let mut form = filled();
            form.value_mut(field).clear();
            assert_eq!(
                form.validate(today()),
                Err(ValidationError::Incomplete),
                "clearing {} should be rejected",
                field.label()
            );
        }

        let mut form = filled();
        form.amount = "0".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));

        let mut form = filled();
        form.interest_rate = "0.0".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));

        let mut form = filled();
        form.number_of_installments = "twelve".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));
    }

    #[test]
    fn range_checks_run_in_form_order() {
        let mut form = filled();
        form.amount = "0.5".to_string();
        form.number_of_installments = "-1".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::AmountTooSmall));

        form.amount = "100".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::InstallmentsTooFew));

        form.number_of_installments = "3".to_string();
        form.date = "2025-13-40".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::DateInvalid));

        form.date = "2025-06-16".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::DateInFuture));

        form.date = "2025-06-15".to_string();
        form.interest_rate = "-0.1".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::RateNotPositive));

        form.interest_rate = "0.1".to_string();
        form.amortization_type = "SAC".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::AmortizationTypeInvalid));

        form.amortization_type = "capital_constante".to_string();
        form.frequency = "ANUAL".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::FrequencyInvalid));

        form.frequency = "semanal".to_string();
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn oversized_installment_count_is_incomplete() {
        let mut form = filled();
        form.number_of_installments = "5000000000".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));

        form.number_of_installments = u32::MAX.to_string();
        assert_eq!(form.validate(today()).unwrap().number_of_installments, u32::MAX);

        form.number_of_installments = "-3".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::InstallmentsTooFew));
    }

    #[test]
    fn negative_amount_reports_minimum() {
        let mut form = filled();
        form.amount = "-500".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::AmountTooSmall));
    }

    #[test]
    fn comma_decimal_separator_is_accepted() {
        let mut form = filled();
        form.amount = "1500,75".to_string();
        form.interest_rate = " 0,03 ".to_string();
        let req = form.validate(today()).unwrap();
        assert_eq!(req.amount, dec!(1500.75));
        assert_eq!(req.interest_rate, dec!(0.03));

        form.amount = "1,500,75".to_string();
        assert_eq!(form.validate(today()), Err(ValidationError::Incomplete));
    }

    #[test]
    fn validation_error_maps_to_input_exit_code() {
        let err: AppError = ValidationError::RateNotPositive.into();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert_eq!(err.message(), "The interest rate must be greater than zero.");
    }
}
