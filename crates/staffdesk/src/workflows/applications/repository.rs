use chrono::{Datelike, NaiveDateTime};

use super::domain::{Application, ApplicationId, ApplicationStatus, ApplicationType, EmployeeId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Writes issued through `create` and `update` become durable on `save`.
pub trait ApplicationRepository: Send + Sync {
    fn create(&self, record: Application) -> Result<Application, RepositoryError>;
    fn update(&self, record: Application) -> Result<(), RepositoryError>;
    fn find_all(&self) -> Result<Vec<Application>, RepositoryError>;
    fn find_by_condition(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn save(&self) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Inclusive window on the requested period: `start_date >= from` and `end_date <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateWindow {
    /// Both bounds must be present for the window to engage. `NaiveDateTime::MIN`
    /// counts as an unset bound.
    pub fn from_bounds(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Option<Self> {
        let set = |bound: Option<NaiveDateTime>| bound.filter(|value| *value != NaiveDateTime::MIN);
        match (set(from), set(to)) {
            (Some(from), Some(to)) => Some(Self { from, to }),
            _ => None,
        }
    }

    pub fn contains(&self, record: &Application) -> bool {
        record.start_date >= self.from && record.end_date <= self.to
    }
}

/// Predicate object handed to [`ApplicationRepository::find_by_condition`].
///
/// Every `Some` field must match; `None` fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub id: Option<ApplicationId>,
    pub employee_id: Option<EmployeeId>,
    pub application_type: Option<ApplicationType>,
    pub status: Option<ApplicationStatus>,
    pub created_year: Option<i32>,
    pub created_month: Option<u32>,
    pub date_window: Option<DateWindow>,
}

impl ApplicationFilter {
    pub fn by_id(id: ApplicationId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn of_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = Some(application_type);
        self
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_in_year(mut self, year: i32) -> Self {
        self.created_year = Some(year);
        self
    }

    pub fn created_in_month(mut self, month: u32) -> Self {
        self.created_month = Some(month);
        self
    }

    pub fn within(mut self, window: Option<DateWindow>) -> Self {
        self.date_window = window;
        self
    }

    pub fn matches(&self, record: &Application) -> bool {
        self.id.map_or(true, |id| record.id == id)
            && self
                .employee_id
                .map_or(true, |employee| record.employee_id == employee)
            && self
                .application_type
                .map_or(true, |kind| record.application_type == kind)
            && self.status.map_or(true, |status| record.status == status)
            && self
                .created_year
                .map_or(true, |year| record.created_date.year() == year)
            && self
                .created_month
                .map_or(true, |month| record.created_date.month() == month)
            && self
                .date_window
                .as_ref()
                .map_or(true, |window| window.contains(record))
    }
}
