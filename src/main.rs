use quiz_backend::{config::Config, database::pool::create_pool, routes, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env()?;

    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr: SocketAddr = config.server_address.parse()?;
    let app_state = AppState::new(pool, config);

    let app = routes::router(app_state)
        .layer(quiz_backend::middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http());

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
