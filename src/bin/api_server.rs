use std::{net::SocketAddr, path::Path};

use axum::middleware;
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;

use money_tracker::{
    add_tracing_layer,
    backend::{ApiState, build_api_router},
    graceful_shutdown, logging_middleware, setup_logging,
};

/// The REST API that stores transactions for money_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3333)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging(Path::new("api_debug.log")).expect("Could not set up logging");

    let args = Args::parse();

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let state = ApiState::new(conn).expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_api_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("API server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}
