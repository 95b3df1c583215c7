//! In-memory fakes of the port traits shared by the unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use domohub_domain::environment::Environment;
use domohub_domain::error::{DomoHubError, IntegrityError, NotFoundError};
use domohub_domain::gateway::GatewayEndpoint;
use domohub_domain::id::{EnvironmentId, GatewayId};
use domohub_domain::record::{Domotic, Record};
use domohub_domain::time::Timestamp;

use crate::ports::{
    ClientFactory, DomoticRepository, EnvironmentRepository, PreferenceStore, Repository,
    exactly_one,
};

/// `Repository` over a `Vec`, keeping insertion order like the store does.
pub struct InMemoryRepository<T> {
    rows: Mutex<Vec<T>>,
    lookups: AtomicUsize,
    yield_on_lookup: AtomicBool,
    stall: AtomicBool,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
            yield_on_lookup: AtomicBool::new(false),
            stall: AtomicBool::new(false),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    /// Number of `find_by_id` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make `find_by_id` yield once before answering.
    pub fn yield_on_lookup(&self) {
        self.yield_on_lookup.store(true, Ordering::SeqCst);
    }

    /// Make `find_by_id` never answer.
    pub fn stall_lookups(&self) {
        self.stall.store(true, Ordering::SeqCst);
    }

    /// Push a row bypassing the uniqueness check.
    pub fn insert_raw(&self, record: T) {
        self.rows.lock().unwrap().push(record);
    }

    pub fn rows(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn add(&self, record: T) -> impl Future<Output = Result<T::Id, DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let id = record.id();
        let result = if rows.iter().any(|r| r.id() == id) {
            Err(IntegrityError::DuplicateId {
                entity: T::KIND,
                id: id.to_string(),
            }
            .into())
        } else {
            rows.push(record);
            Ok(id)
        };
        async { result }
    }

    fn add_all(
        &self,
        records: Vec<T>,
    ) -> impl Future<Output = Result<Vec<T::Id>, DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let ids: Vec<_> = records.iter().map(Record::id).collect();
        let duplicate = ids
            .iter()
            .enumerate()
            .find(|&(i, id)| rows.iter().any(|r| r.id() == *id) || ids[..i].contains(id))
            .map(|(_, id)| id.to_string());
        let result = match duplicate {
            Some(id) => Err(IntegrityError::DuplicateId {
                entity: T::KIND,
                id,
            }
            .into()),
            None => {
                rows.extend(records);
                Ok(ids)
            }
        };
        async { result }
    }

    fn update(&self, record: T) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let id = record.id();
        let result = match rows.iter_mut().find(|r| r.id() == id) {
            Some(row) => {
                *row = record;
                Ok(())
            }
            None => Err(NotFoundError {
                entity: T::KIND,
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }

    fn delete(&self, id: T::Id) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        self.rows.lock().unwrap().retain(|r| r.id() != id);
        async { Ok(()) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        self.rows.lock().unwrap().clear();
        async { Ok(()) }
    }

    fn find_by_id(&self, id: T::Id) -> impl Future<Output = Result<T, DomoHubError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let matching: Vec<T> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.id() == id)
            .cloned()
            .collect();
        let stall = self.stall.load(Ordering::SeqCst);
        let yield_first = self.yield_on_lookup.load(Ordering::SeqCst);
        async move {
            if stall {
                std::future::pending::<()>().await;
            }
            if yield_first {
                tokio::task::yield_now().await;
            }
            exactly_one(matching, T::KIND, id)
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        let rows = self.rows();
        async { Ok(rows) }
    }
}

impl<T: Domotic> DomoticRepository<T> for InMemoryRepository<T> {
    fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        let mut rows: Vec<T> = self
            .rows()
            .into_iter()
            .filter(|r| r.environment_id() == environment_id)
            .collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        async { Ok(rows) }
    }

    fn find_favourites(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        let mut rows: Vec<T> = self.rows().into_iter().filter(Domotic::is_favourite).collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        async { Ok(rows) }
    }
}

/// `EnvironmentRepository` backed by a map; cascades are out of its reach.
#[derive(Default)]
pub struct InMemoryEnvironments {
    rows: Mutex<HashMap<EnvironmentId, Environment>>,
}

impl InMemoryEnvironments {
    fn next(rows: &HashMap<EnvironmentId, Environment>) -> Result<EnvironmentId, DomoHubError> {
        Ok(EnvironmentId::after(rows.keys().max().copied())?)
    }
}

impl EnvironmentRepository for InMemoryEnvironments {
    fn next_id(&self) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        let id = Self::next(&self.rows.lock().unwrap());
        async move { id }
    }

    fn create(
        &self,
        name: String,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let result = Self::next(&rows)
            .and_then(|id| Environment::new(id, name))
            .inspect(|env| {
                rows.insert(env.id, env.clone());
            });
        async { result }
    }

    fn add(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let id = environment.id;
        let result = if rows.contains_key(&id) {
            Err(IntegrityError::DuplicateId {
                entity: "Environment",
                id: id.to_string(),
            }
            .into())
        } else {
            rows.insert(id, environment);
            Ok(id)
        };
        async move { result }
    }

    fn find(
        &self,
        id: EnvironmentId,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        let found = self.rows.lock().unwrap().get(&id).cloned();
        async move {
            found.ok_or_else(|| {
                NotFoundError {
                    entity: "Environment",
                    id: id.to_string(),
                }
                .into()
            })
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Environment>, DomoHubError>> + Send {
        let mut all: Vec<Environment> = self.rows.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        async { Ok(all) }
    }

    fn update(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let id = environment.id;
        let result = match rows.get_mut(&id) {
            Some(row) => {
                *row = environment;
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "Environment",
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }

    fn delete(&self, id: EnvironmentId) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        self.rows.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryPreferences {
    first_run_at: Mutex<Option<Timestamp>>,
    last_version: Mutex<Option<String>>,
    default_gateway: Mutex<Option<GatewayId>>,
}

impl PreferenceStore for InMemoryPreferences {
    fn first_run_at(
        &self,
    ) -> impl Future<Output = Result<Option<Timestamp>, DomoHubError>> + Send {
        let value = *self.first_run_at.lock().unwrap();
        async move { Ok(value) }
    }

    fn mark_first_run(
        &self,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        *self.first_run_at.lock().unwrap() = Some(at);
        async { Ok(()) }
    }

    fn last_version(&self) -> impl Future<Output = Result<Option<String>, DomoHubError>> + Send {
        let value = self.last_version.lock().unwrap().clone();
        async { Ok(value) }
    }

    fn set_last_version(
        &self,
        version: &str,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        *self.last_version.lock().unwrap() = Some(version.to_string());
        async { Ok(()) }
    }

    fn default_gateway(
        &self,
    ) -> impl Future<Output = Result<Option<GatewayId>, DomoHubError>> + Send {
        let value = *self.default_gateway.lock().unwrap();
        async move { Ok(value) }
    }

    fn set_default_gateway(
        &self,
        gateway_id: Option<GatewayId>,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        *self.default_gateway.lock().unwrap() = gateway_id;
        async { Ok(()) }
    }
}

/// Client handle remembering what it was built from.
#[derive(Debug)]
pub struct FakeClient {
    pub endpoint: GatewayEndpoint,
}

#[derive(Default)]
pub struct FakeFactory {
    builds: AtomicUsize,
    fail_next: AtomicBool,
}

impl FakeFactory {
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl ClientFactory for FakeFactory {
    type Client = FakeClient;

    fn connect(
        &self,
        endpoint: &GatewayEndpoint,
    ) -> impl Future<Output = Result<Self::Client, DomoHubError>> + Send {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(DomoHubError::Client(Box::new(std::io::Error::other(
                "connection refused",
            ))))
        } else {
            Ok(FakeClient {
                endpoint: endpoint.clone(),
            })
        };
        async { result }
    }
}
