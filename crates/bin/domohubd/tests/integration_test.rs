//! End-to-end tests for the full domohubd stack.
//!
//! Each test wires the real adapters (in-memory `SQLite`, TCP client factory)
//! into the application services. A local `TcpListener` stands in for the
//! gateway controller.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use domohub_adapter_gateway_tcp::TcpClientFactory;
use domohub_adapter_storage_sqlite_sqlx::{
    Config, Database, SqliteEnvironmentRepository, SqlitePreferenceStore, SqliteRepository,
};
use domohub_app::client_cache::{CacheConfig, GatewayClientCache};
use domohub_app::services::bootstrap::Bootstrap;
use domohub_app::services::domotic_service::{LightService, ScenarioService};
use domohub_app::services::environment_service::EnvironmentService;
use domohub_app::services::gateway_service::GatewayService;
use domohub_domain::error::DomoHubError;
use domohub_domain::gateway::Gateway;
use domohub_domain::id::{EnvironmentId, GatewayId};
use domohub_domain::light::Light;
use domohub_domain::record::DomoticFields;
use domohub_domain::scenario::Scenario;

type Gateways = SqliteRepository<Gateway>;
type Cache = GatewayClientCache<Arc<Gateways>, TcpClientFactory>;

async fn database() -> Database {
    Config::in_memory()
        .build()
        .await
        .expect("in-memory database should initialise")
}

fn gateway_service(
    db: &Database,
) -> (
    GatewayService<Gateways, TcpClientFactory, SqlitePreferenceStore>,
    Arc<Cache>,
) {
    let pool = db.pool().clone();
    let repo: Arc<Gateways> = Arc::new(SqliteRepository::new(pool.clone()));
    let cache = Arc::new(GatewayClientCache::new(
        Arc::clone(&repo),
        TcpClientFactory::new(Duration::from_secs(2)),
        CacheConfig::default(),
    ));
    let service = GatewayService::new(repo, Arc::clone(&cache), SqlitePreferenceStore::new(pool));
    (service, cache)
}

fn fields(environment_id: EnvironmentId, gateway_id: GatewayId, name: &str) -> DomoticFields {
    DomoticFields {
        environment_id,
        gateway_id,
        name: name.to_string(),
        location: "31".to_string(),
        favourite: false,
    }
}

#[tokio::test]
async fn should_open_session_through_cached_client() {
    let db = database().await;
    let (gateways, cache) = gateway_service(&db);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let gateway = Gateway::new("127.0.0.1", port, None).unwrap();
    let id = gateways.add_gateway(gateway).await.unwrap();

    let client = gateways.find_client(id).await.unwrap();
    let again = gateways.find_client(id).await.unwrap();
    let (session, accepted) = tokio::join!(client.open_session(), listener.accept());

    assert!(Arc::ptr_eq(&client, &again));
    assert_eq!(cache.len().await, 1);
    assert!(session.is_ok());
    assert!(accepted.is_ok());
}

#[tokio::test]
async fn should_reflect_new_configuration_after_gateway_update() {
    let db = database().await;
    let (gateways, _cache) = gateway_service(&db);
    let gateway = Gateway::new("127.0.0.1", 20000, None).unwrap();
    let id = gateways.add_gateway(gateway).await.unwrap();
    let before = gateways.find_client(id).await.unwrap();

    gateways
        .update_gateway(Gateway::with_id(id, "127.0.0.1", 20001, Some("12345".into())).unwrap())
        .await
        .unwrap();
    let after = gateways.find_client(id).await.unwrap();

    assert_eq!(before.endpoint().port, 20000);
    assert_eq!(after.endpoint().port, 20001);
    assert_eq!(after.endpoint().password.as_deref(), Some("12345"));
}

#[tokio::test]
async fn should_report_not_found_for_unknown_gateway() {
    let db = database().await;
    let (gateways, cache) = gateway_service(&db);

    let result = gateways.find_client(GatewayId::new()).await;

    assert!(matches!(result, Err(DomoHubError::NotFound(_))));
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn should_forget_default_gateway_when_deleted() {
    let db = database().await;
    let (gateways, cache) = gateway_service(&db);
    let id = gateways
        .add_gateway(Gateway::new("127.0.0.1", 20000, None).unwrap())
        .await
        .unwrap();
    gateways.set_default_gateway(id).await.unwrap();
    gateways.find_client(id).await.unwrap();

    gateways.delete_gateway(id).await.unwrap();

    assert!(gateways.default_gateway().await.unwrap().is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn should_remove_owned_records_when_environment_deleted() {
    let db = database().await;
    let pool = db.pool().clone();
    let environments = EnvironmentService::new(SqliteEnvironmentRepository::new(pool.clone()));
    let lights = LightService::new(SqliteRepository::<Light>::new(pool.clone()));
    let scenarios = ScenarioService::new(SqliteRepository::<Scenario>::new(pool));
    let gateway_id = GatewayId::new();

    let kitchen = environments.create_environment("Kitchen").await.unwrap();
    let garage = environments.create_environment("Garage").await.unwrap();
    lights
        .add_all(vec![
            Light::new(fields(kitchen.id, gateway_id, "ceiling"), true).unwrap(),
            Light::new(fields(garage.id, gateway_id, "door"), false).unwrap(),
        ])
        .await
        .unwrap();
    scenarios
        .add(Scenario::new(fields(kitchen.id, gateway_id, "dinner")).unwrap())
        .await
        .unwrap();

    environments.delete_environment(kitchen.id).await.unwrap();

    let remaining = lights.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].fields.environment_id, garage.id);
    assert!(scenarios.list().await.unwrap().is_empty());
    assert!(matches!(
        environments.get_environment(kitchen.id).await,
        Err(DomoHubError::NotFound(_))
    ));
}

#[tokio::test]
async fn should_seed_default_environment_once() {
    let db = database().await;
    let pool = db.pool().clone();
    let bootstrap = Bootstrap::new(
        SqlitePreferenceStore::new(pool.clone()),
        SqliteEnvironmentRepository::new(pool.clone()),
    );
    let environments = EnvironmentService::new(SqliteEnvironmentRepository::new(pool));

    let first = bootstrap.run("0.1.0", "Home").await.unwrap();
    let second = bootstrap.run("0.2.0", "Home").await.unwrap();

    assert_eq!(first.seeded_environment, Some(EnvironmentId::INITIAL));
    assert!(second.seeded_environment.is_none());
    assert_eq!(second.upgraded_from.as_deref(), Some("0.1.0"));
    let all = environments.list_environments().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Home");
}
