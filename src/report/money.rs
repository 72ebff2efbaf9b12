//! Brazilian real and date formatting for rendered schedules.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format as `R$ 1.234,56` (half-up to cents, `.` thousands, `,` decimals).
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Format as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn brl_groups_and_rounds() {
        assert_eq!(format_brl(dec!(0)), "R$ 0,00");
        assert_eq!(format_brl(dec!(5.5)), "R$ 5,50");
        assert_eq!(format_brl(dec!(999.999)), "R$ 1.000,00");
        assert_eq!(format_brl(dec!(1234.565)), "R$ 1.234,57");
        assert_eq!(format_brl(dec!(1234567.8)), "R$ 1.234.567,80");
        assert_eq!(format_brl(dec!(100000)), "R$ 100.000,00");
    }

    #[test]
    fn brl_negative_and_negative_zero() {
        assert_eq!(format_brl(dec!(-2500.1)), "-R$ 2.500,10");
        assert_eq!(format_brl(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn date_is_day_first() {
        let d = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert_eq!(format_date(d), "03/02/2025");
    }
}
