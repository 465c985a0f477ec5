use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};

use crate::config::Config;
use crate::error::RepositoryError;

type DBPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DBConnection = PooledConnection<ConnectionManager<PgConnection>>;

const CREATE_TASKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        is_completed BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Pooled PostgreSQL access shared by every worker.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DBPool,
}

impl Database {
    /// Builds the pool and waits for its initial connections.
    pub fn connect(config: &Config) -> Result<Self, RepositoryError> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = r2d2::Pool::builder()
            .max_size(config.pool_size)
            .build(manager)?;
        Ok(Database { pool })
    }

    pub fn connection(&self) -> Result<DBConnection, RepositoryError> {
        Ok(self.pool.get()?)
    }

    /// Creates the `tasks` table when it does not exist yet.
    pub fn ensure_schema(&self) -> Result<(), RepositoryError> {
        diesel::sql_query(CREATE_TASKS_TABLE).execute(&mut self.connection()?)?;
        tracing::info!("database initialized: \"tasks\" table is ready");
        Ok(())
    }
}
