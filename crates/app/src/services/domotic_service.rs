//! Domotic service: the same use-cases for every device-like record.

use std::marker::PhantomData;

use domohub_domain::automation::Automation;
use domohub_domain::device::Device;
use domohub_domain::error::DomoHubError;
use domohub_domain::id::EnvironmentId;
use domohub_domain::ipcam::Ipcam;
use domohub_domain::light::Light;
use domohub_domain::record::Domotic;
use domohub_domain::scenario::Scenario;
use domohub_domain::temperature::Temperature;

use crate::ports::DomoticRepository;

pub type LightService<R> = DomoticService<Light, R>;
pub type AutomationService<R> = DomoticService<Automation, R>;
pub type DeviceService<R> = DomoticService<Device, R>;
pub type IpcamService<R> = DomoticService<Ipcam, R>;
pub type TemperatureService<R> = DomoticService<Temperature, R>;
pub type ScenarioService<R> = DomoticService<Scenario, R>;

/// Application service for one domotic record type.
pub struct DomoticService<T, R> {
    repo: R,
    _record: PhantomData<fn() -> T>,
}

impl<T: Domotic, R: DomoticRepository<T>> DomoticService<T, R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if invariants fail,
    /// [`DomoHubError::IntegrityViolation`] if the id is taken, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, record), fields(kind = T::KIND, id = %record.id()))]
    pub async fn add(&self, record: T) -> Result<T::Id, DomoHubError> {
        record.fields().validate()?;
        self.repo.add(record).await
    }

    /// Add several records at once; ids come back in input order.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add); on failure nothing is stored.
    #[tracing::instrument(skip(self, records), fields(kind = T::KIND, count = records.len()))]
    pub async fn add_all(&self, records: Vec<T>) -> Result<Vec<T::Id>, DomoHubError> {
        for record in &records {
            record.fields().validate()?;
        }
        self.repo.add_all(records).await
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if invariants fail,
    /// [`DomoHubError::NotFound`] if the record does not exist, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, record), fields(kind = T::KIND, id = %record.id()))]
    pub async fn update(&self, record: T) -> Result<(), DomoHubError> {
        record.fields().validate()?;
        self.repo.update(record).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    pub async fn delete(&self, id: T::Id) -> Result<(), DomoHubError> {
        self.repo.delete(id).await
    }

    /// Wipe the table (reset flows).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    pub async fn delete_all(&self) -> Result<(), DomoHubError> {
        self.repo.delete_all().await
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::NotFound`] or
    /// [`DomoHubError::IntegrityViolation`] from the point lookup.
    pub async fn get(&self, id: T::Id) -> Result<T, DomoHubError> {
        self.repo.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<T>, DomoHubError> {
        self.repo.find_all().await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> Result<Vec<T>, DomoHubError> {
        self.repo.find_by_environment(environment_id).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_favourites(&self) -> Result<Vec<T>, DomoHubError> {
        self.repo.find_favourites().await
    }

    /// Flag or unflag a record as favourite.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::NotFound`] when the record does not exist, or a
    /// storage error.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    pub async fn set_favourite(&self, id: T::Id, favourite: bool) -> Result<T, DomoHubError> {
        let mut record = self.repo.find_by_id(id).await?;
        record.fields_mut().favourite = favourite;
        self.repo.update(record.clone()).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRepository;
    use domohub_domain::error::{IntegrityError, ValidationError};
    use domohub_domain::id::{GatewayId, LightId};
    use domohub_domain::record::{DomoticFields, Record};

    fn make_service() -> LightService<InMemoryRepository<Light>> {
        DomoticService::new(InMemoryRepository::default())
    }

    fn light(environment: u32, name: &str) -> Light {
        Light::new(
            DomoticFields {
                environment_id: EnvironmentId::new(environment),
                gateway_id: GatewayId::new(),
                name: name.to_string(),
                location: "12".to_string(),
                favourite: false,
            },
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn should_find_every_added_light_unchanged() {
        let svc = make_service();
        let lights = [light(100, "hall"), light(100, "porch"), light(101, "desk")];

        for l in &lights {
            let id = svc.add(l.clone()).await.unwrap();
            assert_eq!(id, l.id());
        }
        for l in &lights {
            assert_eq!(&svc.get(l.id).await.unwrap(), l);
        }
    }

    #[tokio::test]
    async fn should_return_ids_in_input_order_when_adding_many() {
        let svc = make_service();
        let lights = vec![light(100, "b"), light(100, "a"), light(100, "c")];
        let expected: Vec<LightId> = lights.iter().map(|l| l.id).collect();

        let ids = svc.add_all(lights).await.unwrap();

        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn should_reject_duplicate_id() {
        let svc = make_service();
        let l = light(100, "hall");
        svc.add(l.clone()).await.unwrap();

        let result = svc.add(l).await;
        assert!(matches!(
            result,
            Err(DomoHubError::IntegrityViolation(IntegrityError::DuplicateId { .. }))
        ));
    }

    #[tokio::test]
    async fn should_reject_record_whose_fields_were_blanked() {
        let svc = make_service();
        let mut l = light(100, "hall");
        l.fields.location = String::new();

        let result = svc.add(l).await;
        assert!(matches!(
            result,
            Err(DomoHubError::Validation(ValidationError::EmptyLocation))
        ));
    }

    #[tokio::test]
    async fn should_fail_with_not_found_when_updating_missing_light() {
        let svc = make_service();
        let result = svc.update(light(100, "ghost")).await;
        assert!(matches!(result, Err(DomoHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_fail_with_integrity_violation_when_id_matches_twice() {
        let repo = InMemoryRepository::default();
        let l = light(100, "twin");
        repo.insert_raw(l.clone());
        repo.insert_raw(l.clone());
        let svc = DomoticService::new(repo);

        let result = svc.get(l.id).await;
        assert!(matches!(
            result,
            Err(DomoHubError::IntegrityViolation(IntegrityError::MultipleRows { count: 2, .. }))
        ));
    }

    #[tokio::test]
    async fn should_delete_idempotently() {
        let svc = make_service();
        let l = light(100, "hall");
        svc.add(l.clone()).await.unwrap();

        svc.delete(l.id).await.unwrap();
        svc.delete(l.id).await.unwrap();

        assert!(matches!(svc.get(l.id).await, Err(DomoHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_by_environment_sorted_by_name() {
        let svc = make_service();
        svc.add_all(vec![light(100, "z"), light(101, "m"), light(100, "a")])
            .await
            .unwrap();

        let names: Vec<String> = svc
            .list_by_environment(EnvironmentId::new(100))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.fields.name)
            .collect();
        assert_eq!(names, ["a", "z"]);
    }

    #[tokio::test]
    async fn should_toggle_favourite() {
        let svc = make_service();
        let l = light(100, "hall");
        svc.add(l.clone()).await.unwrap();

        let updated = svc.set_favourite(l.id, true).await.unwrap();
        assert!(updated.fields.favourite);

        let favourites = svc.list_favourites().await.unwrap();
        assert_eq!(favourites, vec![updated]);
    }

    #[tokio::test]
    async fn should_empty_table_on_delete_all() {
        let svc = make_service();
        svc.add_all(vec![light(100, "a"), light(101, "b")]).await.unwrap();

        svc.delete_all().await.unwrap();

        assert!(svc.list().await.unwrap().is_empty());
    }
}
