use actix_web::{middleware, web, App, HttpServer};
use db_pool::{create_pool, DbConfig};
use notification_center::auth::{IdentityResolver, PgAccountStore};
use notification_center::handlers::notifications::register_routes;
use notification_center::store::PgNotificationStore;
use notification_center::{Config, NotificationCenter};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting notification center");

    let config = Config::from_env().map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("Bad configuration: {}", e))
    })?;

    let mut db_cfg = DbConfig::from_env("notification-center").unwrap_or_default();
    if db_cfg.database_url.is_empty() {
        db_cfg.database_url = config.database.url.clone();
    }
    db_cfg.max_connections = config.database.max_connections;

    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => {
            tracing::info!("Successfully connected to database");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            return Err(io::Error::new(io::ErrorKind::Other, "Database connection failed"));
        }
    };

    let store = Arc::new(PgNotificationStore::new(db_pool.clone()));
    let resolver = IdentityResolver::new(
        &config.auth.jwt_secret,
        Arc::new(PgAccountStore::new(db_pool)),
    );
    let center = Arc::new(NotificationCenter::new(store, resolver));

    let addr = format!("0.0.0.0:{}", config.app.port);
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(center.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(|| async { "OK" }))
            .configure(register_routes)
    })
    .bind(&addr)?
    .run()
    .await
}
