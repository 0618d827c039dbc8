// Server module entry point
// Listener setup, the accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod signal;

pub use listener::create_reusable_listener;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;
use connection::accept_connection;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until SIGINT/SIGTERM, then wait for open connections
///
/// Each connection is already bounded by `performance.request_timeout`, so the
/// wait uses the same bound.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let active = Arc::new(AtomicUsize::new(0));
    let shutdown = signal::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            result = &mut shutdown => {
                result?;
                logger::log_shutdown();
                let grace = Duration::from_secs(state.performance.request_timeout);
                drain_connections(&active, grace).await;
                return Ok(());
            }
        }
    }
}

/// Wait until no connection is being served, or until `grace` has passed
async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let open = active.load(Ordering::SeqCst);
        if open == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!("Stopping with {open} connection(s) still open"));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
