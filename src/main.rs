use tracing::{Level, info};

use filebank::{config::AppConfig, database, seed, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // The only configuration read in the process; everything downstream
    // receives this object through AppState.
    let config = AppConfig::load()?;

    // Backend selection and schema sync happen before the listener binds;
    // an unknown backend or unreachable database aborts startup here.
    let db = database::init_db(&config.database).await?;
    seed::seed_role_permissions(&db).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { db, config };

    let app = filebank::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
