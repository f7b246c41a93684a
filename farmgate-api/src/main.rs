use farmgate_api::{app, AppState};
use farmgate_store::pg::{
    PgCartRepository, PgCategoryRepository, PgOrderRepository, PgProductRepository,
    PgWishlistRepository,
};
use farmgate_store::{DbClient, EventBus};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farmgate_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farmgate_store::app_config::Config::load()?;
    tracing::info!("Starting Farmgate API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections).await?;
    db.migrate().await?;

    let events = EventBus::default();

    // Log every storefront event; subscribers are lossy so a lagging logger
    // never backs up the request path.
    let mut event_rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => tracing::info!(?event, "storefront event"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log fell behind")
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let app_state = AppState {
        products: Arc::new(PgProductRepository::new(db.pool.clone())),
        categories: Arc::new(PgCategoryRepository::new(db.pool.clone())),
        carts: Arc::new(PgCartRepository::new(db.pool.clone())),
        wishlists: Arc::new(PgWishlistRepository::new(db.pool.clone())),
        orders: Arc::new(PgOrderRepository::new(db.pool.clone())),
        events,
        storefront: config.storefront.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
