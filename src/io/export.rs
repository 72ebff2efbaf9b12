//! Export a schedule to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Schedule;
use crate::error::AppError;

/// Write one CSV row per installment (plain decimals, ISO dates).
pub fn write_schedule_csv(path: &Path, schedule: &Schedule) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_schedule_csv_to(&mut file, schedule)
        .map_err(|e| AppError::input(format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_schedule_csv_to(out: &mut impl Write, schedule: &Schedule) -> std::io::Result<()> {
    writeln!(out, "number,date,principal,interest,total")?;
    for inst in &schedule.installments {
        writeln!(
            out,
            "{},{},{:.2},{:.2},{:.2}",
            inst.installment_number,
            inst.installment_date.format("%Y-%m-%d"),
            inst.installment_amount,
            inst.installment_interest,
            inst.installment_total,
        )?;
    }
    Ok(())
}

/// Write the installments as pretty JSON, in the backend's wire shape.
pub fn write_schedule_json(path: &Path, schedule: &Schedule) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &schedule.installments)
        .map_err(|e| AppError::input(format!("Failed to write export JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Installment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn csv_rows_use_plain_decimals() {
        let schedule = Schedule::new(vec![Installment {
            installment_number: 1,
            installment_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            installment_amount: dec!(1234.5),
            installment_interest: dec!(12),
            installment_total: dec!(1246.5),
        }]);

        let mut buf = Vec::new();
        write_schedule_csv_to(&mut buf, &schedule).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "number,date,principal,interest,total\n1,2025-07-01,1234.50,12.00,1246.50\n"
        );
    }

    #[test]
    fn json_export_round_trips_through_decoder() {
        let schedule = Schedule::new(vec![Installment {
            installment_number: 3,
            installment_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            installment_amount: dec!(300.25),
            installment_interest: dec!(9.75),
            installment_total: dec!(310),
        }]);

        let path = std::env::temp_dir().join(format!("loan-schedule-export-{}.json", std::process::id()));
        write_schedule_json(&path, &schedule).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(body.contains("\"installmentDate\": \"2025-09-01\""));
        let decoded = crate::api::decode_schedule(&body).unwrap();
        assert_eq!(decoded, schedule);
    }
}
