use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use axum::middleware;
use axum_server::Handle;
use clap::Parser;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use money_tracker::{
    HttpRemote, TransactionStore, add_tracing_layer,
    frontend::{AppState, build_router},
    get_local_offset, graceful_shutdown, logging_middleware, setup_logging,
};

/// The web front-end for money_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the transactions API, e.g. "http://localhost:3333".
    #[arg(long, env = "MONEY_TRACKER_API_URL", default_value = "http://localhost:3333")]
    api_url: String,

    /// The port to serve the web app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "MONEY_TRACKER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// How long to wait for the transactions API before giving up on a request.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logging(Path::new("debug.log")).expect("Could not set up logging");

    let args = Args::parse();

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("Invalid timezone {}", args.timezone);
        return;
    }

    let remote = HttpRemote::new(
        &args.api_url,
        Duration::from_secs(args.request_timeout_secs),
    )
    .expect("Could not create the API client");
    tracing::info!("Using the transactions API at {}", remote.transactions_url());

    let store = Arc::new(TransactionStore::init(remote));
    let state = AppState::new(store.clone(), &args.timezone);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    let result = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await;

    store.dispose();
    result.expect("Server stopped unexpectedly");
}
