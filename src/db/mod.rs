pub mod queries;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use queries::categories::Category;
pub use queries::questions::{Question, QuestionPage};

use sqlx::Error;

pub async fn establish_connection(url: &str, max_connections: u32) -> Result<SqlitePool, Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Single-connection in-memory database with the schema applied.
///
/// The connection is never recycled, otherwise the data would vanish with it.
pub async fn establish_in_memory() -> Result<SqlitePool, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
