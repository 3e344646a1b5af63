//! Server side of the remote file-operation service.
//!
//! Binds one TCP listener and answers every accepted connection on its own
//! thread, executing the request's real syscall locally and replying with
//! the outcome. The accept loop never exits on its own: a per-connection
//! error only ever drops that one connection.

pub mod config;
pub mod dirtree_fs;
pub mod handlers;
pub mod session;

use std::net::TcpListener;
use std::thread;

use tracing::{error, info};

/// Runs the accept loop against an already-bound listener, forever.
/// Exposed separately from [`serve`] so tests can bind to an ephemeral
/// port and hand the resulting listener straight in.
pub fn serve_forever(listener: TcpListener) -> ! {
    info!(addr = ?listener.local_addr().ok(), "accepting connections");
    loop {
        match listener.accept() {
            Ok((stream, addr)) => {
                info!(%addr, "accepted connection");
                thread::spawn(move || session::handle_connection(stream));
            }
            Err(e) => {
                // A single failed accept (e.g. the peer reset before the
                // handshake completed) must never stop the server.
                error!(error = %e, "accept failed, continuing");
            }
        }
    }
}

/// Binds to `0.0.0.0:{config::port()}` and serves forever.
pub fn run() -> std::io::Result<()> {
    let port = config::port();
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    serve_forever(listener)
}
