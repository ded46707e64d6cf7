//! `specgate run` — start the gateway server.
//!
//! Loads every spec document from the specs directory (a single bad
//! document aborts startup), builds the shared HTTP client and forwarder,
//! and serves the Axum router until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::error::SpecgateError;
use crate::logging;
use crate::server::{self, AppState};
use crate::store::{FileSpecStore, SpecStore};

pub async fn execute(args: RunArgs) -> Result<(), SpecgateError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let store = FileSpecStore::load(args.specs_dir.clone()).await?;
    let service_count = store.list().len();
    let proxyable = store.proxyable_count();

    let state = Arc::new(AppState::new(Arc::new(store), server::build_http_client()));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        specs_dir = %args.specs_dir.display(),
        services = service_count,
        proxyable,
        "specgate started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("specgate stopped");
    Ok(())
}
