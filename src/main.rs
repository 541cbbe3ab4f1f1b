use migration::{Migrator, MigratorTrait};
use photoevents::services::users::ensure_admin_user;
use photoevents::{create_routes, AppState, Config};
use sea_orm::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(config.database_url.as_str()).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied");

    if let Some(password) = &config.admin_password {
        ensure_admin_user(&db, &config.admin_email, password).await?;
    }

    if !config.uploads_dir.is_dir() {
        tracing::warn!(
            "Uploads directory {} does not exist; reconciliation will refuse to run",
            config.uploads_dir.display()
        );
    }

    let bind_addr = config.bind_addr.clone();
    let app = create_routes(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
