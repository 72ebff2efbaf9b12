//! Shared domain types.
//!
//! These types mirror the calculation backend's JSON contract so they can be:
//!
//! - built from the loan form and posted as-is
//! - decoded straight from the backend's schedule response
//! - re-exported to JSON/CSV without another mapping layer

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// How the principal is paid down over the installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum AmortizationType {
    /// Same principal portion every period; the total shrinks as interest falls.
    #[serde(rename = "CAPITAL_CONSTANTE")]
    #[value(name = "CAPITAL_CONSTANTE", alias = "constant-principal")]
    ConstantPrincipal,
    /// Same total every period (French/Price table).
    #[serde(rename = "PRESTACOES_CONSTANTES")]
    #[value(name = "PRESTACOES_CONSTANTES", alias = "constant-installment")]
    ConstantInstallment,
}

impl AmortizationType {
    pub const ALL: [AmortizationType; 2] = [
        AmortizationType::ConstantPrincipal,
        AmortizationType::ConstantInstallment,
    ];

    /// Name used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            AmortizationType::ConstantPrincipal => "CAPITAL_CONSTANTE",
            AmortizationType::ConstantInstallment => "PRESTACOES_CONSTANTES",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AmortizationType::ConstantPrincipal => "Constant principal",
            AmortizationType::ConstantInstallment => "Constant installment",
        }
    }

    pub fn next(self) -> Self {
        match self {
            AmortizationType::ConstantPrincipal => AmortizationType::ConstantInstallment,
            AmortizationType::ConstantInstallment => AmortizationType::ConstantPrincipal,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

impl fmt::Display for AmortizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AmortizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        AmortizationType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown amortization type '{trimmed}'"))
    }
}

/// Payment frequency. The backend matches these case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Frequency {
    #[serde(rename = "DIARIO")]
    #[value(name = "DIARIO", alias = "daily")]
    Daily,
    #[serde(rename = "SEMANAL")]
    #[value(name = "SEMANAL", alias = "weekly")]
    Weekly,
    #[serde(rename = "QUINZENAL")]
    #[value(name = "QUINZENAL", alias = "biweekly")]
    Biweekly,
    #[serde(rename = "MENSAL")]
    #[value(name = "MENSAL", alias = "monthly")]
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Frequency::Daily => "DIARIO",
            Frequency::Weekly => "SEMANAL",
            Frequency::Biweekly => "QUINZENAL",
            Frequency::Monthly => "MENSAL",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Frequency::Daily => Frequency::Weekly,
            Frequency::Weekly => Frequency::Biweekly,
            Frequency::Biweekly => Frequency::Monthly,
            Frequency::Monthly => Frequency::Daily,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Frequency::Daily => Frequency::Monthly,
            Frequency::Weekly => Frequency::Daily,
            Frequency::Biweekly => Frequency::Weekly,
            Frequency::Monthly => Frequency::Biweekly,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Frequency::ALL
            .into_iter()
            .find(|f| f.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown frequency '{trimmed}'"))
    }
}

/// Loan parameters posted to the calculation endpoint.
///
/// Only produced by a successful form validation, so every field is known to
/// be present and in range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(serialize_with = "serialize_iso_date")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    pub amortization_type: AmortizationType,
    pub frequency: Frequency,
    pub number_of_installments: u32,
    pub client_id: String,
}

/// One row of the amortization schedule as returned by the backend.
///
/// The backend may send extra fields (status, loan id, ...); they are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub installment_number: u32,
    #[serde(
        deserialize_with = "deserialize_iso_date",
        serialize_with = "serialize_iso_date"
    )]
    pub installment_date: NaiveDate,
    /// Principal portion.
    #[serde(with = "rust_decimal::serde::float")]
    pub installment_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub installment_interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub installment_total: Decimal,
}

/// Ordered installment list for one submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    pub installments: Vec<Installment>,
}

impl Schedule {
    pub fn new(installments: Vec<Installment>) -> Self {
        Self { installments }
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// Column totals saturate at `Decimal::MAX`; decoded schedules are
    /// rejected up front when [`Schedule::totals_in_range`] is false.
    pub fn total_interest(&self) -> Decimal {
        self.checked_total(|i| i.installment_interest).unwrap_or(Decimal::MAX)
    }

    /// Sum of every installment total (principal + interest paid overall).
    pub fn total_accumulated(&self) -> Decimal {
        self.checked_total(|i| i.installment_total).unwrap_or(Decimal::MAX)
    }

    pub fn total_principal(&self) -> Decimal {
        self.checked_total(|i| i.installment_amount).unwrap_or(Decimal::MAX)
    }

    /// False when any column sum leaves the `Decimal` range.
    pub fn totals_in_range(&self) -> bool {
        self.checked_total(|i| i.installment_interest).is_some()
            && self.checked_total(|i| i.installment_total).is_some()
            && self.checked_total(|i| i.installment_amount).is_some()
    }

    fn checked_total(&self, column: impl Fn(&Installment) -> Decimal) -> Option<Decimal> {
        self.installments
            .iter()
            .try_fold(Decimal::ZERO, |acc, inst| acc.checked_add(column(inst)))
    }
}

/// Client as listed by the backend's client search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ClientSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of client search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPage {
    pub content: Vec<ClientSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
}

fn serialize_iso_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

/// Accepts `YYYY-MM-DD` as well as full ISO-8601 timestamps (date part kept).
fn deserialize_iso_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_iso_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid ISO date '{raw}'")))
}

pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10)?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    match trimmed.as_bytes().get(10) {
        None | Some(b'T') | Some(b't') | Some(b' ') => Some(date),
        Some(_) => None,
    }
}
