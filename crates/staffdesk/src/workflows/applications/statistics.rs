//! Year summaries built from application records.
//!
//! Records are bucketed by `created_date`, so a request filed in December for
//! dates in January counts toward the filing year.

use chrono::Duration;
use serde::Serialize;

use super::domain::{Application, ApplicationStatus, ApplicationType, EmployeeId};
use super::repository::{ApplicationFilter, ApplicationRepository, RepositoryError};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyStatistics {
    pub count_annual_leave: usize,
    pub detail_leave_applications: Vec<String>,
    pub detail_overtime_applications: Vec<String>,
    /// `"<requested>h/<approved>h"` for the whole year.
    pub overtime: String,
    pub count_remote_days: i64,
}

pub(crate) fn yearly_statistics<R>(
    repository: &R,
    employee_id: EmployeeId,
    year: i32,
) -> Result<YearlyStatistics, RepositoryError>
where
    R: ApplicationRepository + ?Sized,
{
    let leave = annual_leave(repository, employee_id, year)?;
    let overtime = overtime(repository, year)?;
    let count_remote_days = remote_days(repository, employee_id, year)?;

    Ok(YearlyStatistics {
        count_annual_leave: leave.len(),
        detail_leave_applications: leave,
        detail_overtime_applications: overtime.details,
        overtime: hours_pair(overtime.requested_hours, overtime.approved_hours),
        count_remote_days,
    })
}

fn annual_leave<R>(
    repository: &R,
    employee_id: EmployeeId,
    year: i32,
) -> Result<Vec<String>, RepositoryError>
where
    R: ApplicationRepository + ?Sized,
{
    let filter = ApplicationFilter::default()
        .employee(employee_id)
        .of_type(ApplicationType::Leave)
        .with_status(ApplicationStatus::Approved)
        .created_in_year(year);

    Ok(repository
        .find_by_condition(&filter)?
        .iter()
        .map(leave_detail)
        .collect())
}

fn leave_detail(record: &Application) -> String {
    let days = total_days(record.duration());
    let label = if days <= 1.0 {
        "1 Day".to_string()
    } else {
        format!("{days} Days")
    };

    format!(
        "{} - {} - {label}",
        record.start_date.format("%Y/%m/%d"),
        record.end_date.format("%Y/%m/%d"),
    )
}

struct OvertimeSummary {
    details: Vec<String>,
    requested_hours: f64,
    approved_hours: f64,
}

/// Overtime records for one month and status.
///
/// This scope is company-wide: it does not narrow on the employee whose
/// statistics are being built. Add `.employee(..)` here to make it per-employee.
pub(crate) fn overtime_filter(year: i32, month: u32, status: ApplicationStatus) -> ApplicationFilter {
    ApplicationFilter::default()
        .of_type(ApplicationType::Overtime)
        .with_status(status)
        .created_in_year(year)
        .created_in_month(month)
}

fn overtime<R>(repository: &R, year: i32) -> Result<OvertimeSummary, RepositoryError>
where
    R: ApplicationRepository + ?Sized,
{
    let mut summary = OvertimeSummary {
        details: Vec::new(),
        requested_hours: 0.0,
        approved_hours: 0.0,
    };

    for month in 1..=12 {
        let requested = repository
            .find_by_condition(&overtime_filter(year, month, ApplicationStatus::Requested))?;
        let approved = repository
            .find_by_condition(&overtime_filter(year, month, ApplicationStatus::Approved))?;

        // A month needs both requested and approved overtime to be reported.
        if requested.is_empty() || approved.is_empty() {
            continue;
        }

        let requested_hours = total_hours(sum_durations(&requested));
        let approved_hours = total_hours(sum_durations(&approved));

        summary.details.push(format!(
            "{year}/{month} {}",
            hours_pair(requested_hours, approved_hours)
        ));
        summary.requested_hours += requested_hours;
        summary.approved_hours += approved_hours;
    }

    Ok(summary)
}

fn remote_days<R>(repository: &R, employee_id: EmployeeId, year: i32) -> Result<i64, RepositoryError>
where
    R: ApplicationRepository + ?Sized,
{
    let filter = ApplicationFilter::default()
        .employee(employee_id)
        .of_type(ApplicationType::Remote)
        .created_in_year(year);

    let records = repository.find_by_condition(&filter)?;
    Ok(sum_durations(&records).num_days())
}

fn sum_durations(records: &[Application]) -> Duration {
    records
        .iter()
        .fold(Duration::zero(), |total, record| total + record.duration())
}

fn total_days(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_DAY
}

fn total_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

fn hours_pair(requested: f64, approved: f64) -> String {
    format!("{}h/{}h", two_decimals(requested), two_decimals(approved))
}

/// Renders `value` with two decimals, rounding half away from zero once the
/// value has been trimmed to 15 significant digits.
fn two_decimals(value: f64) -> String {
    let cents = to_cents(value);
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

fn to_cents(value: f64) -> i128 {
    if !value.is_finite() || value == 0.0 {
        return 0;
    }

    // `d.dddddddddddddde<exp>`: exactly 15 significant digits.
    let scientific = format!("{:.14e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return 0;
    };
    let digits: i128 = mantissa.replace('.', "").parse().unwrap_or(0);
    let exponent: i32 = exponent.parse().unwrap_or(0);

    // value * 100 == digits * 10^(exponent - 12)
    let shift = exponent - 12;
    let magnitude = if shift >= 0 {
        digits.saturating_mul(10_i128.saturating_pow(shift.unsigned_abs()))
    } else if shift < -30 {
        0
    } else {
        let divisor = 10_i128.pow(shift.unsigned_abs());
        let (quotient, remainder) = (digits / divisor, digits % divisor);
        if remainder * 2 >= divisor {
            quotient + 1
        } else {
            quotient
        }
    };

    if value < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}
