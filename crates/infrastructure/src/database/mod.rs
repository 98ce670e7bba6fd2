use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use domain::DomainError;
use tracing::info;

pub mod schema;
pub use schema::*;

diesel::define_sql_function! {
    fn last_insert_rowid() -> diesel::sql_types::Integer;
}

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at `database_path` and make sure the
    /// tables exist.
    pub fn new(database_path: &str, max_connections: u32) -> Result<Self, DomainError> {
        let builder = r2d2::Pool::builder().max_size(max_connections.max(1));
        Self::open(database_path, builder)
    }

    /// A private in-memory database. Every connection to `:memory:` is its
    /// own database, so the pool holds exactly one and never recycles it.
    pub fn in_memory() -> Result<Self, DomainError> {
        let builder = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None);
        Self::open(":memory:", builder)
    }

    fn open(
        database_path: &str,
        builder: r2d2::Builder<ConnectionManager<SqliteConnection>>,
    ) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = builder.build(manager).map_err(|e| {
            DomainError::RepositoryError(format!(
                "Failed to create SQLite connection pool: {}",
                e
            ))
        })?;

        let database = Database { pool };
        database.create_tables()?;
        info!(path = database_path, "database ready");
        Ok(database)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn create_tables(&self) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        conn.batch_execute(CREATE_TABLES)
            .map_err(|e| DomainError::RepositoryError(e.to_string()))
    }
}

/// Id of the row most recently inserted through `conn`.
pub(crate) fn last_insert_id(conn: &mut SqliteConnection) -> QueryResult<i32> {
    diesel::select(last_insert_rowid()).get_result::<i32>(conn)
}

/// Run a diesel query on a pooled connection off the async runtime.
pub(crate) async fn run_blocking<T, F>(pool: &SqlitePool, query: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
{
    let mut conn = pool
        .get()
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

    tokio::task::spawn_blocking(move || query(&mut *conn))
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))
}
