pub mod book;
pub mod error;
pub mod member;

use std::str::FromStr;

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const MAX_LIMIT: usize = 10_000;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens pool (creating database file if needed) and brings schema up to date
pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let mut pool_options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        // every connection would get its own empty in-memory database
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(50);
    }
    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;
    debug!("Database pool ready for {database_url}");
    Ok(pool)
}

/// Store ids are integers, anything else cannot match a record
pub(crate) fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}
