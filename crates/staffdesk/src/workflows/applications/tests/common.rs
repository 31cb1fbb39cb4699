use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::PaginationConfig;
use crate::workflows::applications::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationType, EmployeeId, NewApplication,
};
use crate::workflows::applications::repository::{
    ApplicationFilter, ApplicationRepository, RepositoryError,
};
use crate::workflows::applications::{application_router, ApplicationService};

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn pagination() -> PaginationConfig {
    PaginationConfig {
        default_page: 1,
        page_size: 10,
    }
}

pub(super) fn new_application(application_type: ApplicationType) -> NewApplication {
    NewApplication {
        title: "Dentist appointment".to_string(),
        employee_id: EmployeeId(1),
        application_type,
        start_date: at(2024, 4, 10, 9),
        end_date: at(2024, 4, 10, 12),
        note: "Back after lunch".to_string(),
    }
}

/// Stored record builder; `created_date` defaults to the start of the period.
pub(super) fn record(
    employee: i64,
    application_type: ApplicationType,
    status: ApplicationStatus,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Application {
    Application {
        id: ApplicationId(0),
        employee_id: EmployeeId(employee),
        application_type,
        status,
        name: format!("{} request", application_type.label()),
        note: String::new(),
        start_date: start,
        end_date: end,
        created_date: start,
    }
}

pub(super) fn build_service() -> (ApplicationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ApplicationService::new(repository.clone(), pagination());
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<Application>>,
    saves: AtomicUsize,
}

impl MemoryRepository {
    /// Insert a fully specified record, bypassing the service.
    pub(super) fn seed(&self, record: Application) -> ApplicationId {
        self.create(record).expect("seed succeeds").id
    }

    pub(super) fn get(&self, id: ApplicationId) -> Option<Application> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub(super) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ApplicationRepository for MemoryRepository {
    fn create(&self, mut record: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        record.id = ApplicationId(guard.len() as i64 + 1);
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|stored| stored.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn find_by_condition(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn save(&self) -> Result<(), RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn create(&self, _record: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_condition(
        &self,
        _filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Accepts writes but fails to commit them.
#[derive(Default)]
pub(super) struct UncommittableRepository {
    inner: MemoryRepository,
}

impl ApplicationRepository for UncommittableRepository {
    fn create(&self, record: Application) -> Result<Application, RepositoryError> {
        self.inner.create(record)
    }

    fn update(&self, record: Application) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.find_all()
    }

    fn find_by_condition(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.find_by_condition(filter)
    }

    fn save(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("commit rejected".to_string()))
    }
}

/// Serves only full scans; filtered reads fail.
#[derive(Default)]
pub(super) struct ScanOnlyRepository {
    pub(super) inner: MemoryRepository,
}

impl ApplicationRepository for ScanOnlyRepository {
    fn create(&self, record: Application) -> Result<Application, RepositoryError> {
        self.inner.create(record)
    }

    fn update(&self, record: Application) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.find_all()
    }

    fn find_by_condition(
        &self,
        _filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("filtered reads unsupported".to_string()))
    }

    fn save(&self) -> Result<(), RepositoryError> {
        self.inner.save()
    }
}

/// Finds records but loses them before the update lands.
#[derive(Default)]
pub(super) struct VanishingRepository {
    pub(super) inner: MemoryRepository,
}

impl ApplicationRepository for VanishingRepository {
    fn create(&self, record: Application) -> Result<Application, RepositoryError> {
        self.inner.create(record)
    }

    fn update(&self, _record: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.find_all()
    }

    fn find_by_condition(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.find_by_condition(filter)
    }

    fn save(&self) -> Result<(), RepositoryError> {
        self.inner.save()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn application_router_with_service(
    service: ApplicationService<MemoryRepository>,
) -> axum::Router {
    application_router(Arc::new(service))
}
