use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Local;
use tracing::{info, warn};

use crate::config::PaginationConfig;

use super::domain::{Application, ApplicationId, ApplicationStatus, EmployeeId, NewApplication};
use super::listing::{self, ApplicationListView, ListingQuery};
use super::repository::{ApplicationFilter, ApplicationRepository, RepositoryError};
use super::statistics::{self, YearlyStatistics};
use super::transition::transition_permitted;

/// Service composing the record store with the transition guard, listing and statistics.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    pagination: PaginationConfig,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// File a new application as `Requested`.
    ///
    /// Returns `false` on any failure; the cause is only visible in the logs.
    pub fn create_application(&self, request: NewApplication) -> bool {
        let record = Application {
            id: ApplicationId(0),
            employee_id: request.employee_id,
            application_type: request.application_type,
            status: ApplicationStatus::Requested,
            name: request.title,
            note: request.note,
            start_date: request.start_date,
            end_date: request.end_date,
            created_date: Local::now().naive_local(),
        };

        let result = self
            .repository
            .create(record)
            .and_then(|stored| self.repository.save().map(|()| stored));

        match result {
            Ok(stored) => {
                info!(
                    application_id = %stored.id,
                    employee_id = stored.employee_id.0,
                    application_type = stored.application_type.label(),
                    "application filed"
                );
                true
            }
            Err(error) => {
                warn!(%error, "application could not be filed");
                false
            }
        }
    }

    /// Move an application to `requested` if the guard allows it, then persist.
    pub fn update_application_status(
        &self,
        application_id: ApplicationId,
        requested: ApplicationStatus,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self
            .repository
            .find_by_condition(&ApplicationFilter::by_id(application_id))?
            .into_iter()
            .next()
            .ok_or(ApplicationServiceError::NotFound(application_id))?;

        let current = record.status;
        if !transition_permitted(current, requested) {
            warn!(%application_id, %current, %requested, "status transition rejected");
            return Err(ApplicationServiceError::Conflict { current, requested });
        }

        record.status = requested;
        self.repository.update(record).map_err(|error| match error {
            RepositoryError::NotFound => ApplicationServiceError::NotFound(application_id),
            other => other.into(),
        })?;
        self.repository.save()?;

        info!(%application_id, from = %current, to = %requested, "status updated");
        Ok(())
    }

    pub fn list_applications(
        &self,
        query: &ListingQuery,
    ) -> Result<ApplicationListView, ApplicationServiceError> {
        let view = listing::list_applications(self.repository.as_ref(), query, self.pagination)?;
        Ok(view)
    }

    pub fn yearly_statistics(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<YearlyStatistics, ApplicationServiceError> {
        let stats = statistics::yearly_statistics(self.repository.as_ref(), employee_id, year)?;
        Ok(stats)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("application cannot move from {current} to {requested}")]
    Conflict {
        current: ApplicationStatus,
        requested: ApplicationStatus,
    },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ApplicationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
