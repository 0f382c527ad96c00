//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! Each test binary shares one cluster. The schema fixture is applied once
//! to a template database named after the fixture's content hash, and every
//! test runs against its own clone of that template, dropped with the
//! [`PgContext`].
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip these suites where the cluster cannot
//! start.

use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use recipe_backend::domain::ports::UserRepository;
use recipe_backend::domain::{Password, User, UserExtras, UserId};
use recipe_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use tokio::runtime::Runtime;
use uuid::Uuid;

const TEMPLATE_NAME_PREFIX: &str = "recipes_template";

/// Password used when `PG_PASSWORD` is unset. A data directory reused across
/// runs keeps the password it was initialised with.
const STABLE_PASSWORD: &str = "recipe_backend_embedded_test";

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("schema")
}

fn cluster() -> Result<&'static ClusterHandle, String> {
    let password =
        std::env::var("PG_PASSWORD").unwrap_or_else(|_| STABLE_PASSWORD.to_owned());
    let _env = env_lock::lock_env([("PG_PASSWORD", Some(password))]);
    shared_cluster_handle().map_err(|err| format!("start cluster: {err}"))
}

fn template_name() -> Result<String, String> {
    let hash = hash_directory(schema_dir()).map_err(|err| format!("hash schema: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn apply_schema(url: &str) -> Result<(), String> {
    let sql = std::fs::read_to_string(schema_dir().join("schema.sql"))
        .map_err(|err| format!("read schema: {err}"))?;
    let mut conn =
        PgConnection::establish(url).map_err(|err| format!("connect to template: {err}"))?;
    conn.batch_execute(&sql)
        .map_err(|err| format!("apply schema: {err}"))
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        apply_schema(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

/// A fresh database with the schema applied, plus a runtime and pool bound
/// to it.
///
/// Fields drop in order: connections close before the runtime stops, and
/// the database goes last.
pub struct PgContext {
    pool: DbPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Pool connected to this context's database.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Drive `future` to completion on the context's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Store a fresh account, returning its id. Labels and recipes need an
    /// owning row to satisfy their foreign keys.
    pub fn insert_user(&self, email: &str) -> UserId {
        let password = Password::new("secret-pass").expect("password");
        let user = User::create(Some(email), &password, UserExtras::default()).expect("user");
        let repo = DieselUserRepository::new(self.pool());
        self.block_on(repo.insert(&user)).expect("insert user");
        *user.id()
    }
}

fn setup() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| format!("build runtime: {err}"))?;
    let cluster = cluster()?;
    let template = ensure_template(cluster)?;
    let database = cluster
        .temporary_database_from_template(
            format!("test_{}", Uuid::new_v4().simple()).as_str(),
            template.as_str(),
        )
        .map_err(|err| format!("clone template: {err:?}"))?;
    let config = PoolConfig::new(database.url()).with_max_connections(2);
    let pool = runtime
        .block_on(DbPool::connect(&config))
        .map_err(|err| format!("connect pool: {err}"))?;
    Ok(PgContext {
        pool,
        runtime,
        _database: database,
    })
}

/// Provision a context, or apply the skip policy when the cluster is
/// unavailable.
pub fn pg_context() -> Option<PgContext> {
    match setup() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Skip with a marker on stderr when `SKIP_TEST_CLUSTER` is truthy; fail
/// loudly otherwise.
#[expect(
    clippy::print_stderr,
    reason = "Skipped suites must leave a visible marker in test output."
)]
fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
