use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier; ids grow monotonically so newer records sort higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

/// Kind of request an employee files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationType {
    Leave,
    Holiday,
    Overtime,
    EarlyLeave,
    GoingOut,
    Remote,
}

impl ApplicationType {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationType::Leave => "LEAVE",
            ApplicationType::Holiday => "HOLIDAY",
            ApplicationType::Overtime => "OVERTIME",
            ApplicationType::EarlyLeave => "EARLYLEAVE",
            ApplicationType::GoingOut => "GOINGOUT",
            ApplicationType::Remote => "REMOTE",
        }
    }
}

/// Approval stage of an application. New records always start as `Requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    Requested,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Requested => "REQUESTED",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored application record.
///
/// `created_date` is the aggregation key for yearly statistics; the requested
/// period (`start_date`..`end_date`) is never used to bucket a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub employee_id: EmployeeId,
    pub application_type: ApplicationType,
    pub status: ApplicationStatus,
    pub name: String,
    pub note: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub created_date: NaiveDateTime,
}

impl Application {
    /// Length of the requested period. Negative when the caller swapped the bounds.
    pub fn duration(&self) -> chrono::Duration {
        self.end_date - self.start_date
    }
}

/// Caller-supplied fields for a new application. Carries no status; the
/// service always files new records as `Requested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub title: String,
    #[serde(rename = "emp_id")]
    pub employee_id: EmployeeId,
    pub application_type: ApplicationType,
    #[serde(rename = "started_date")]
    pub start_date: NaiveDateTime,
    #[serde(rename = "ended_date")]
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub note: String,
}
