use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::{DatabaseBackend, DatabaseConfig};

/// Connect to the configured backend and bring both schema groups up to
/// date. Called exactly once, before the listener binds; any error here is
/// fatal to startup.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let expected_scheme = match config.backend {
        DatabaseBackend::Postgres => "postgres",
        DatabaseBackend::Mysql => "mysql",
    };
    if !config.url.starts_with(expected_scheme) {
        return Err(DbErr::Custom(format!(
            "database.url does not match configured backend '{expected_scheme}'"
        )));
    }

    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    db.get_schema_registry("filebank::entity::identity::*")
        .sync(&db)
        .await?;
    db.get_schema_registry("filebank::entity::content::*")
        .sync(&db)
        .await?;

    Ok(db)
}
