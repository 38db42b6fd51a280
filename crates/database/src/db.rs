use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Creates a database connection from `DATABASE_URL`, reading `.env` if present
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    dotenvy::dotenv().ok();

    let url = dotenvy::var("DATABASE_URL")
        .map_err(|e| DbErr::Custom(format!("DATABASE_URL is not set: {e}")))?;

    connect(&url).await
}

/// Connects to an explicit database URL
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    options
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging_level(log::LevelFilter::Debug);

    Database::connect(options).await
}
