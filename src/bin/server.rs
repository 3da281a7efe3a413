use std::net::SocketAddr;

use axum::routing::get;
use floodrelief_server::{app::app, config::Config, migrator, store::Store};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    floodrelief_server::telemetry::init_telemetry("floodrelief-server", &config);

    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(config.sql_logging);
    let db = Database::connect(options).await?;
    tracing::info!("Connected to database");

    migrator::Migrator::up(&db, None).await?;

    let (prometheus_layer, metric_handle) = floodrelief_server::metrics::init_metrics(&db).await;

    let router = app(Store::new(db), &config)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Flood relief API listening on {}", addr);
    if config.require_auth {
        tracing::info!("Bearer authentication enabled on write routes");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
