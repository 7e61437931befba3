use chrono::{Duration, Months, NaiveDate};

use crate::errors::{EngineError, Result};
use crate::types::PaymentFrequency;

/// generates the dual-timeline due date sequences for a schedule
pub struct DueDateScheduler;

impl DueDateScheduler {
    /// college due dates for `count` regular installments.
    ///
    /// monthly and quarterly step by calendar months from the FIRST date, so
    /// a month-end start keeps its day-of-month where the target month allows
    /// it and clamps otherwise (Jan 31 -> Feb 28 -> Mar 31). custom frequency
    /// yields `None` placeholders: dates are entered manually downstream, and
    /// that absence is an expected state, not an error.
    pub fn college_due_dates(
        first: NaiveDate,
        count: u32,
        frequency: PaymentFrequency,
    ) -> Result<Vec<Option<NaiveDate>>> {
        let step = match frequency.months_per_step() {
            Some(step) => step,
            None => return Ok(vec![None; count as usize]),
        };

        (0..count)
            .map(|i| {
                first
                    .checked_add_months(Months::new(i * step))
                    .map(Some)
                    .ok_or_else(|| EngineError::InvalidDate {
                        message: format!("due date overflow stepping {} months from {}", i * step, first),
                    })
            })
            .collect()
    }

    /// student due date precedes the college due date by the lead time, in
    /// calendar days, so cash is collected before it is owed
    pub fn student_due_date(college_due_date: NaiveDate, lead_time_days: u32) -> NaiveDate {
        college_due_date - Duration::days(lead_time_days as i64)
    }
}
