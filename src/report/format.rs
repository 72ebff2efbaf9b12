//! Plain-text schedule rendering for terminal output.
//!
//! We keep formatting code in one place so output changes stay localized.

use crate::domain::{LoanRequest, Schedule};
use crate::report::money::{format_brl, format_date};

/// Loan parameters echoed above the table.
pub fn format_request_summary(request: &LoanRequest) -> String {
    let mut out = String::new();
    out.push_str("=== loan - Amortization Plan ===\n");
    out.push_str(&format!("Client: {}\n", request.client_id));
    out.push_str(&format!(
        "Amount: {} | Date: {} | Rate: {}\n",
        format_brl(request.amount),
        format_date(request.date),
        request.interest_rate.normalize(),
    ));
    out.push_str(&format!(
        "Type: {} | Frequency: {} | Installments: {}\n",
        request.amortization_type.display_name(),
        request.frequency.display_name(),
        request.number_of_installments,
    ));
    out
}

/// The schedule table followed by the totals.
pub fn format_schedule(schedule: &Schedule) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:<10} {:>16} {:>16} {:>16}\n",
            "number", "date", "principal", "interest", "total"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(format!("{:-<6} {:-<10} {:-<16} {:-<16} {:-<16}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for inst in &schedule.installments {
        out.push_str(
            format!(
                "{:>6} {:<10} {:>16} {:>16} {:>16}\n",
                inst.installment_number,
                format_date(inst.installment_date),
                format_brl(inst.installment_amount),
                format_brl(inst.installment_interest),
                format_brl(inst.installment_total),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!("Total interest:    {}\n", format_brl(schedule.total_interest())));
    out.push_str(&format!("Total accumulated: {}\n", format_brl(schedule.total_accumulated())));
    out
}
