//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads configuration
//! - installs logging
//! - runs the form -> request -> render pipeline
//! - prints reports and writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::api::LoanApiClient;
use crate::cli::{CalcArgs, ClientsArgs, Command, OutputFormat};
use crate::config::Config;
use crate::error::{AppError, EXIT_REMOTE};
use crate::form::LoanForm;
use crate::logging::{LogTarget, TUI_LOG_FILE};

pub mod pipeline;

/// Entry point for the `loan` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let config = Config::from_env()?;

    match cli.command {
        Command::Calc(args) => {
            crate::logging::init(&config, LogTarget::Stderr)?;
            handle_calc(&config, args)
        }
        Command::Clients(args) => {
            crate::logging::init(&config, LogTarget::Stderr)?;
            handle_clients(&config, args)
        }
        Command::Tui => {
            crate::logging::init(&config, LogTarget::File(TUI_LOG_FILE.into()))?;
            crate::tui::run(&config)
        }
    }
}

fn handle_calc(config: &Config, args: CalcArgs) -> Result<(), AppError> {
    let today = Local::now().date_naive();
    let form = form_from_args(&args, today);
    let client = LoanApiClient::new(config)?;

    let submission = match pipeline::submit(&client, &form, today) {
        Ok(submission) => submission,
        Err(err) => {
            // The HTML fragment replaces the result area, so failures render there too.
            if args.format == OutputFormat::Html && err.exit_code() == EXIT_REMOTE {
                println!("{}", crate::report::render_html_error(err.message()));
            }
            return Err(err);
        }
    };

    match args.format {
        OutputFormat::Table => {
            println!("{}", crate::report::format_request_summary(&submission.request));
            print!("{}", crate::report::format_schedule(&submission.schedule));
        }
        OutputFormat::Html => {
            print!("{}", crate::report::render_html(&submission.schedule));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&submission.schedule.installments)
                .map_err(|e| AppError::input(format!("Failed to encode schedule JSON: {e}")))?;
            println!("{json}");
        }
    }

    if let Some(path) = &args.export_csv {
        crate::io::write_schedule_csv(path, &submission.schedule)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_schedule_json(path, &submission.schedule)?;
    }

    Ok(())
}

fn handle_clients(config: &Config, args: ClientsArgs) -> Result<(), AppError> {
    let client = LoanApiClient::new(config)?;
    let page = client.search_clients(&args.name, args.page, args.size)?;

    if page.content.is_empty() {
        println!("No clients match '{}'.", args.name);
        return Ok(());
    }

    println!("{:>8} {:<32} {:<32} {:<10}", "id", "name", "email", "status");
    for c in &page.content {
        println!(
            "{:>8} {:<32} {:<32} {:<10}",
            c.id,
            c.full_name(),
            c.email,
            c.status.as_deref().unwrap_or("")
        );
    }
    println!("page {} of {}", page.number + 1, page.total_pages.max(1));
    Ok(())
}

/// Map CLI flags onto the raw form, as if typed into it.
pub fn form_from_args(args: &CalcArgs, today: NaiveDate) -> LoanForm {
    let mut form = LoanForm::new(today);
    if let Some(date) = &args.date {
        form.date = date.clone();
    }
    form.amount = args.amount.clone().unwrap_or_default();
    form.interest_rate = args.rate.clone().unwrap_or_default();
    form.amortization_type = args
        .amortization_type
        .map(|t| t.code().to_string())
        .unwrap_or_default();
    form.frequency = args.frequency.map(|f| f.code().to_string()).unwrap_or_default();
    form.number_of_installments = args.installments.clone().unwrap_or_default();
    form.client_id = args.client.clone().unwrap_or_default();
    form
}

/// Rewrite argv so `loan` defaults to `loan tui`.
///
/// Rules:
/// - `loan`         -> `loan tui`
/// - anything else  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    if argv.len() <= 1 {
        argv.push("tui".to_string());
    }
    argv
}
