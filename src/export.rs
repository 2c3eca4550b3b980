use csv::Writer;
use std::io::Write;
use std::path::Path;

use crate::error::{RecoverError, Result};
use crate::models::WeeklyReport;

/// Write the per-day rows of a weekly report as CSV
pub fn write_report_csv<W: Write>(report: &WeeklyReport, writer: W) -> std::result::Result<(), csv::Error> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["day", "workout_load", "recovery_load", "ratio"])?;
    for day in &report.days {
        csv.write_record([
            day.day.clone(),
            day.workout_load.to_string(),
            day.recovery_load.to_string(),
            day.ratio.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Export a weekly report to a CSV file
pub fn export_report_csv<P: AsRef<Path>>(report: &WeeklyReport, output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let to_export_error = |reason: String| RecoverError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::create(path).map_err(|e| to_export_error(e.to_string()))?;
    write_report_csv(report, file).map_err(|e| to_export_error(e.to_string()))?;

    tracing::info!(path = %path.display(), days = report.days.len(), "Weekly report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Badge, DayRatio};

    fn report() -> WeeklyReport {
        WeeklyReport {
            efficiency_score: 62,
            days: vec![
                DayRatio {
                    day: "D1".to_string(),
                    workout_load: 81.2,
                    recovery_load: 20.0,
                    ratio: 0.25,
                },
                DayRatio {
                    day: "D2".to_string(),
                    workout_load: 0.0,
                    recovery_load: 10.0,
                    ratio: 10000000.0,
                },
            ],
            expected_next_performance_change_pct: 14,
            badge: Badge::Bronze,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut buffer = Vec::new();
        write_report_csv(&report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "day,workout_load,recovery_load,ratio");
        assert_eq!(lines[1], "D1,81.2,20,0.25");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_report_csv(&report(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("day,"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");
        let err = export_report_csv(&report(), &path).unwrap_err();
        assert!(matches!(err, RecoverError::Export { .. }));
    }
}
