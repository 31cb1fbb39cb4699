use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use staffdesk::workflows::applications::{
    Application, ApplicationFilter, ApplicationId, ApplicationRepository, RepositoryError,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreState {
    committed: BTreeMap<ApplicationId, Application>,
    pending: Vec<Application>,
    last_id: i64,
}

/// Record store that stages writes until `save` and serves reads from committed state.
///
/// Clones share one staging buffer, so a `save` from any handle commits every
/// write staged so far, including writes staged by other callers.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryApplicationRepository {
    /// Insert and commit a record with an explicit creation timestamp.
    pub(crate) fn import(
        &self,
        mut record: Application,
        created_date: NaiveDateTime,
    ) -> Result<ApplicationId, RepositoryError> {
        record.created_date = created_date;
        let stored = self.create(record)?;
        self.save()?;
        Ok(stored.id)
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn create(&self, mut record: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.last_id += 1;
        record.id = ApplicationId(guard.last_id);
        guard.pending.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: Application) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let known = guard.committed.contains_key(&record.id)
            || guard.pending.iter().any(|staged| staged.id == record.id);
        if !known {
            return Err(RepositoryError::NotFound);
        }
        guard.pending.push(record);
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.committed.values().cloned().collect())
    }

    fn find_by_condition(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .committed
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn save(&self) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let pending = std::mem::take(&mut guard.pending);
        for record in pending {
            guard.committed.insert(record.id, record);
        }
        Ok(())
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}
