//! The shim's process-wide connection singleton ("Process-wide
//! state").
//!
//! Mirrors the `ad` editor's own pattern for process-wide state —
//! `static CONFIG: OnceLock<RwLock<Config>>` — rather than the reference
//! implementation's module-level `int sockfd` set up by a dynamic-linker
//! init hook. The connection is created lazily on the first entry-point
//! call and lives for the rest of the process; there is no reconnection.
use std::{
    env,
    io,
    net::TcpStream,
    sync::{Mutex, OnceLock},
};

use tracing::{debug, info};

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: &str = "15440";

static CONNECTION: OnceLock<Mutex<TcpStream>> = OnceLock::new();

/// Read `server15440`/`serverport15440`, falling back to the documented
/// defaults, and connect. Connection failure is fatal: there is nothing
/// sensible to return to the caller if the shim cannot reach its server.
fn connect() -> TcpStream {
    let addr = env::var("server15440").unwrap_or_else(|_| {
        debug!("server15440 not set, using {DEFAULT_SERVER_ADDR}");
        DEFAULT_SERVER_ADDR.to_string()
    });
    let port = env::var("serverport15440").unwrap_or_else(|_| {
        debug!("serverport15440 not set, using {DEFAULT_SERVER_PORT}");
        DEFAULT_SERVER_PORT.to_string()
    });

    info!(%addr, %port, "connecting to remotefs-server");
    TcpStream::connect((addr.as_str(), port.parse::<u16>().expect("invalid serverport15440")))
        .unwrap_or_else(|e| panic!("remotefs-shim: failed to connect to {addr}:{port}: {e}"))
}

/// Borrow the shim's single connection, creating it on first use.
pub fn connection() -> &'static Mutex<TcpStream> {
    CONNECTION.get_or_init(|| Mutex::new(connect()))
}

/// Run `f` with exclusive access to the connection's socket for the
/// duration of one full request/reply exchange. The `Mutex` exists purely to
/// keep concurrent callers from interleaving bytes on the wire (Open
/// Question 4) — it does not give multithreaded hosts any ordering guarantee
/// beyond that.
pub fn with_connection<T>(f: impl FnOnce(&mut TcpStream) -> io::Result<T>) -> io::Result<T> {
    let mut guard = connection().lock().unwrap_or_else(|poison| poison.into_inner());
    f(&mut guard)
}
