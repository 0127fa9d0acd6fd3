use anyhow::{anyhow, Error};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn new_pool(path: &str) -> Result<DbPool, Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(path);

    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| anyhow!("Could not create database pool: {}", e))
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Error> {
    let mut conn = pool
        .get()
        .map_err(|e| anyhow!("Could not get a db connection: {}", e))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Could not run database migrations: {}", e))?;

    for version in applied {
        tracing::info!(target = module_path!(), version = %version, "Applied migration");
    }

    Ok(())
}
