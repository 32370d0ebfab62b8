//! Embedded PostgreSQL helpers for the product repository suites.
//!
//! - One cluster is shared per test binary; bootstrap is retried because the
//!   PostgreSQL binaries are downloaded on first use, and a bootstrap panic is
//!   reported as an error so `SKIP_TEST_CLUSTER` still applies.
//! - Each test gets its own database cloned from a template that already
//!   carries the embedded migrations. The template name includes a hash of
//!   `backend/migrations`, so schema changes produce a fresh template.
//! - Table resets use `postgres` so they run outside any Diesel connection.

use std::panic;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use product_catalogue::outbound::persistence::run_migrations;
use uuid::Uuid;

use super::format_postgres_error;

static CLUSTER: OnceLock<&'static ClusterHandle> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const TEMPLATE_NAME_PREFIX: &str = "catalogue_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn create_unique_pg_embed_dirs() -> Result<(PathBuf, PathBuf), String> {
    let unique = format!("bootstrap-{}-{}", std::process::id(), Uuid::new_v4());
    let base = pg_embed_target_dir().join(unique);
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
    std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
    Ok((runtime_dir, data_dir))
}

/// Environment the bootstrap needs that the caller has not already provided.
///
/// The root-only worker is this package's `pg_worker` binary, and the
/// install and data directories default to unique paths under the target
/// directory so sandboxed runs do not write outside the workspace.
fn bootstrap_environment() -> Result<Vec<(&'static str, Option<String>)>, String> {
    let mut vars = Vec::new();
    if std::env::var_os("PG_EMBEDDED_WORKER").is_none() {
        vars.push((
            "PG_EMBEDDED_WORKER",
            Some(env!("CARGO_BIN_EXE_pg_worker").to_owned()),
        ));
    }
    let needs_dirs =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    if needs_dirs {
        let (runtime_dir, data_dir) = create_unique_pg_embed_dirs()?;
        vars.push((
            "PG_RUNTIME_DIR",
            Some(runtime_dir.to_string_lossy().into_owned()),
        ));
        vars.push(("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())));
    }
    Ok(vars)
}

fn bootstrap_once() -> Result<&'static ClusterHandle, String> {
    panic::catch_unwind(pg_embedded_setup_unpriv::test_support::shared_cluster_handle)
        .map_err(|payload| {
            let reason = payload
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| payload.downcast_ref::<&str>().copied())
                .unwrap_or("unknown panic");
            format!("cluster bootstrap panicked: {reason}")
        })?
        .map_err(|err| format!("{err:?}"))
}

/// Returns the process-wide embedded cluster, bootstrapping it on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    if let Some(handle) = CLUSTER.get().copied() {
        return Ok(handle);
    }
    let vars = bootstrap_environment()?;
    let _env_guard = env_lock::lock_env(vars);

    let mut attempt = 1;
    loop {
        match bootstrap_once() {
            Ok(handle) => return Ok(*CLUSTER.get_or_init(|| handle)),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(error),
            Err(error) => {
                eprintln!(
                    "pg-embed: bootstrap attempt {attempt}/{CLUSTER_RETRIES} failed: {error}"
                );
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Name of the template database for the current migration set.
pub fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Fresh, collision-free name for a per-test database.
pub fn new_test_database_name() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

/// Creates or reuses the template database with every migration applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_migrations(&url).map_err(|err| format!("migrate template: {err}"))?;
    }

    Ok(template_name)
}

fn provision_database_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)
        .map_err(|err| format!("attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {err}"))?;
    let db_name = new_test_database_name();
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| {
            format!("clone template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {err:?}")
        })
}

/// Provisions a temporary database cloned from the migration template.
///
/// The database is dropped when the returned handle is.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_database_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error.unwrap_or_else(|| "clone template: exhausted retries".to_owned()))
}

/// Removes every product row and restarts the identifier sequence.
pub fn clear_products_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("TRUNCATE TABLE products RESTART IDENTITY;")
        .map_err(|err| format_postgres_error(&err))
}

/// Stores a raw category string, bypassing the domain's validation.
///
/// The check constraint is dropped first so the row can hold a value the
/// domain does not know.
pub fn insert_row_with_category(url: &str, category: &str) -> Result<i32, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("ALTER TABLE products DROP CONSTRAINT products_category_check;")
        .map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "INSERT INTO products (name, price, available, category) \
             VALUES ('Widget', 1.00, TRUE, $1) RETURNING id",
            &[&category],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

#[cfg(test)]
mod tests {
    //! Naming checks for embedded database provisioning.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn template_name_tracks_the_migration_set() {
        let name = template_database_name().expect("migrations directory hashes");
        let suffix = name
            .strip_prefix("catalogue_template_")
            .expect("template prefix");
        assert_eq!(suffix.len(), 8);
        assert_eq!(template_database_name(), Ok(name));
    }

    #[rstest]
    fn test_database_names_are_unique_identifiers() {
        let first = new_test_database_name();
        let second = new_test_database_name();
        assert_ne!(first, second);
        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        );
    }

    #[rstest]
    fn bootstrap_points_root_runs_at_the_worker_binary() {
        let _guard = env_lock::lock_env([("PG_EMBEDDED_WORKER", None::<String>)]);
        let vars = bootstrap_environment().expect("bootstrap environment");
        let worker = vars
            .iter()
            .find(|(key, _)| *key == "PG_EMBEDDED_WORKER")
            .and_then(|(_, value)| value.clone())
            .expect("worker path exported");
        assert!(worker.ends_with(&format!("pg_worker{}", std::env::consts::EXE_SUFFIX)));
    }
}
