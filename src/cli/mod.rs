//! Command-line parsing for the loan amortization client.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from validation, HTTP and rendering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{AmortizationType, Frequency};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "loan", version, about = "Loan amortization schedule client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the loan parameters, request the schedule, and print it.
    Calc(CalcArgs),
    /// Search clients by name (to find the id for `--client`).
    Clients(ClientsArgs),
    /// Launch the interactive loan form.
    Tui,
}

/// How `loan calc` prints the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Html,
    Json,
}

/// Loan parameters for `loan calc`.
///
/// Numeric fields are taken as typed and go through the same validation as
/// the interactive form.
#[derive(Debug, Parser, Clone)]
pub struct CalcArgs {
    /// Principal amount (>= 1).
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Loan date (YYYY-MM-DD). Defaults to today.
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// Interest rate per period (> 0).
    #[arg(short = 'r', long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Amortization type.
    #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
    pub amortization_type: Option<AmortizationType>,

    /// Payment frequency.
    #[arg(short = 'f', long, value_enum, ignore_case = true)]
    pub frequency: Option<Frequency>,

    /// Number of installments (>= 1).
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub installments: Option<String>,

    /// Client id.
    #[arg(short = 'c', long)]
    pub client: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Export the schedule to CSV.
    #[arg(long = "export-csv")]
    pub export_csv: Option<PathBuf>,

    /// Export the schedule to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for `loan clients`.
#[derive(Debug, Parser, Clone)]
pub struct ClientsArgs {
    /// Name (or part of it) to search for.
    pub name: String,

    /// Zero-based result page.
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Results per page.
    #[arg(long, default_value_t = 10)]
    pub size: u32,
}
