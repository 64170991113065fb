mod config;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let port = config.port;
    let levels = config.num_levels;
    let state = state::AppState::new(config).expect("initial state does not fit the pentagon");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, levels, "pentashard listening");
    axum::serve(listener, app).await.expect("server failed");
}
