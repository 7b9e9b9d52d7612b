/// Database migration runner
///
/// Migrations live in `contacts-shared/migrations/` and are embedded into the
/// binary at compile time by `sqlx::migrate!`.
///
/// # Example
///
/// ```no_run
/// use contacts_shared::db::pool::{create_pool, DatabaseConfig};
/// use contacts_shared::db::migrations::{ensure_database_exists, run_migrations};
///
/// # async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
/// ensure_database_exists(url).await?;
/// let pool = create_pool(&DatabaseConfig::new(url)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Embedded migrations compared with what the database has recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Embedded migrations the database reports as applied
    pub applied: usize,

    /// Embedded migrations not yet applied
    pub pending: usize,

    /// Highest successfully applied version
    pub latest_version: Option<i64>,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.pending == 0
    }
}

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or the applied history no
/// longer matches the embedded files
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Reports applied and pending migrations
///
/// A database that has never been migrated reports every embedded migration
/// as pending.
///
/// # Errors
///
/// Returns an error if the bookkeeping table exists but cannot be read
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let migrator = sqlx::migrate!("./migrations");
    let embedded: Vec<i64> = migrator.iter().map(|migration| migration.version).collect();

    let has_history: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let recorded: Vec<i64> = if has_history {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        debug!("no migration history table yet");
        Vec::new()
    };

    let applied = embedded.iter().filter(|v| recorded.contains(v)).count();

    Ok(MigrationStatus {
        applied,
        pending: embedded.len() - applied,
        latest_version: recorded.last().copied(),
    })
}

/// Creates the database if it doesn't exist
///
/// Intended for development and tests; production databases are provisioned
/// ahead of time.
///
/// # Errors
///
/// Returns an error if the server is unreachable or creation is not permitted
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
