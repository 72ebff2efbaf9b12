//! HTML fragment rendering for the result area of a loan page.

use crate::domain::Schedule;
use crate::report::money::{format_brl, format_date};

pub const HEADING: &str = "Amortization Plan";
pub const COLUMNS: [&str; 5] = ["Number", "Date", "Principal", "Interest", "Total"];
pub const CALCULATING: &str = "Calculating...";

/// Shown while the request is in flight.
pub fn render_html_loading() -> String {
    format!(r#"<p class="text-warning">{CALCULATING}</p>"#)
}

/// Shown in place of the schedule when the calculation fails.
pub fn render_html_error(message: &str) -> String {
    format!(r#"<p class="text-danger">{}</p>"#, escape(message))
}

/// Render the schedule table followed by the interest and accumulated totals.
///
/// Cells only hold formatted numbers and dates, so they are written unescaped.
pub fn render_html(schedule: &Schedule) -> String {
    let mut out = String::new();
    out.push_str(&format!("<h3>{HEADING}</h3>\n"));
    out.push_str("<table class=\"table table-bordered\">\n");

    out.push_str("<thead><tr>");
    for col in COLUMNS {
        out.push_str(&format!("<th>{col}</th>"));
    }
    out.push_str("</tr></thead>\n");

    out.push_str("<tbody>\n");
    for inst in &schedule.installments {
        out.push_str("<tr>");
        for cell in [
            inst.installment_number.to_string(),
            format_date(inst.installment_date),
            format_brl(inst.installment_amount),
            format_brl(inst.installment_interest),
            format_brl(inst.installment_total),
        ] {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n");
    out.push_str("</table>\n");

    out.push_str(&format!(
        "<p><strong>Total Interest:</strong> {}</p>\n",
        format_brl(schedule.total_interest())
    ));
    out.push_str(&format!(
        "<p><strong>Total Accumulated:</strong> {}</p>\n",
        format_brl(schedule.total_accumulated())
    ));

    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Installment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn two_rows() -> Schedule {
        Schedule::new(vec![
            Installment {
                installment_number: 1,
                installment_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                installment_amount: dec!(1000),
                installment_interest: dec!(100),
                installment_total: dec!(1100),
            },
            Installment {
                installment_number: 2,
                installment_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                installment_amount: dec!(1000),
                installment_interest: dec!(50),
                installment_total: dec!(1050),
            },
        ])
    }

    #[test]
    fn renders_rows_and_totals() {
        let html = render_html(&two_rows());
        assert!(html.starts_with("<h3>Amortization Plan</h3>"));
        assert!(html.contains(
            "<thead><tr><th>Number</th><th>Date</th><th>Principal</th><th>Interest</th><th>Total</th></tr></thead>"
        ));
        assert!(html.contains(
            "<tr><td>1</td><td>01/02/2025</td><td>R$ 1.000,00</td><td>R$ 100,00</td><td>R$ 1.100,00</td></tr>"
        ));
        assert!(html.contains("<p><strong>Total Interest:</strong> R$ 150,00</p>"));
        assert!(html.contains("<p><strong>Total Accumulated:</strong> R$ 2.150,00</p>"));

        let first = html.find("<td>01/02/2025</td>").unwrap();
        let second = html.find("<td>01/03/2025</td>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_schedule_renders_zero_totals() {
        let html = render_html(&Schedule::default());
        assert!(html.contains("<tbody>\n</tbody>"));
        assert!(html.contains("<p><strong>Total Interest:</strong> R$ 0,00</p>"));
    }

    #[test]
    fn loading_marker() {
        assert_eq!(render_html_loading(), r#"<p class="text-warning">Calculating...</p>"#);
    }

    #[test]
    fn error_message_is_escaped() {
        assert_eq!(
            render_html_error("bad <input> & \"more\""),
            r#"<p class="text-danger">bad &lt;input&gt; &amp; &quot;more&quot;</p>"#
        );
    }
}
