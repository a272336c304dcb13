use metro_server::config::ServerConfig;
use metro_server::network::load_network;
use metro_server::planner::SearchConfig;
use metro_server::web::{AppState, cors_layer, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Load the station graph (fail fast if unavailable)
    let network = load_network(&config.data_path).expect("Failed to load station data");

    let mut search_config = SearchConfig::default();
    if let Some(timeout) = config.search_timeout {
        search_config = search_config.with_timeout(timeout);
    }

    // Build app state
    let state = AppState::new(network, search_config);

    // Create router
    let app = create_router(state).layer(cors_layer(&config.allowed_origins));

    // Bind and serve
    let addr = config.bind_addr;
    info!("Metro Route Planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health            - Health check");
    info!("  GET  /api/v1/find-path  - Fastest route between two stations");
    info!("  GET  /api/v1/stations   - Station list");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
