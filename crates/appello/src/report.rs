//! Monthly attendance summary computation.

use crate::types::AnalysisRecord;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human-readable name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[(month - 1) as usize])
    } else {
        None
    }
}

/// Present/absent counts and percentages for one student's month.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub present_count: usize,
    pub total_days: usize,
    pub present_percentage: f64,
    pub absent_percentage: f64,
}

impl ReportSummary {
    /// Summarize a record list. An empty list yields a 0/0 summary,
    /// which the renderer turns into the "no records" placeholder.
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let total_days = records.len();
        let present_count = records.iter().filter(|r| r.status == "Present").count();

        if total_days == 0 {
            return Self {
                present_count: 0,
                total_days: 0,
                present_percentage: 0.0,
                absent_percentage: 0.0,
            };
        }

        let present_percentage = present_count as f64 / total_days as f64 * 100.0;
        Self {
            present_count,
            total_days,
            present_percentage,
            absent_percentage: 100.0 - present_percentage,
        }
    }

    /// Present percentage rounded to one decimal, as fed to the chart.
    pub fn present_label(&self) -> String {
        format!("{:.1}", self.present_percentage)
    }

    pub fn absent_label(&self) -> String {
        format!("{:.1}", self.absent_percentage)
    }
}
