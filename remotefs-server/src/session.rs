//! One thread per connection. `handle_connection` reads requests until the
//! peer disconnects or a frame fails to decode. An unrecognised opcode gets
//! the zero-length reply the protocol has always given it, never an error
//! reply of our own invention (Open Question — not redesigned here); since
//! an opcode outside the known nine carries no body grammar to read back
//! off the wire, the connection is then closed rather than continuing to
//! read what would be misinterpreted as the next request's header.
use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::net::TcpStream;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use remotefs_protocol::message::{Reply, Request};
use remotefs_protocol::opcode::{self, Opcode};
use remotefs_protocol::statbuf::STAT_SIZE;
use tracing::{debug, info, warn};

use crate::{dirtree_fs, handlers};

pub fn handle_connection(mut stream: TcpStream) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    info!(%peer, "connection opened");

    loop {
        let raw_opcode = match opcode::read_opcode(&mut stream) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => {
                warn!(%peer, error = %e, "failed to read opcode, dropping connection");
                break;
            }
        };

        let opcode = match Opcode::from_u32(raw_opcode) {
            Some(op) => op,
            None => {
                warn!(%peer, raw_opcode, "unrecognised opcode, sending zero-length reply and closing");
                // No known grammar to read the request body back off the
                // wire, so a zero-length reply is all that can be sent; the
                // unread body bytes would be misread as the next opcode if
                // we looped, so the connection ends here instead.
                let _ = stream.write_all(&[]);
                break;
            }
        };

        let request = match Request::read_body(opcode, STAT_SIZE, &mut stream) {
            Ok(req) => req,
            Err(e) => {
                warn!(%peer, ?opcode, error = %e, "failed to read request body, dropping connection");
                break;
            }
        };

        debug!(%peer, ?opcode, "request");
        let reply = dispatch(request);
        if let Err(e) = reply.write_to(&mut stream) {
            warn!(%peer, error = %e, "failed to write reply, dropping connection");
            break;
        }
    }

    info!(%peer, "connection closed");
}

fn dispatch(request: Request) -> Reply {
    match request {
        Request::Open { path, flags, mode } => handlers::open(&path, flags, mode),
        Request::Read { fd, count } => handlers::read(fd, count),
        Request::Write { fd, data } => handlers::write(fd, &data),
        Request::Close { fd } => handlers::close(fd),
        Request::Lseek { fd, offset, whence } => handlers::lseek(fd, offset, whence),
        Request::Stat { path, statbuf } => handlers::stat(&path, &statbuf),
        Request::Unlink { path } => handlers::unlink(&path),
        Request::GetDirEntries { fd, nbyte, basep } => handlers::getdirentries(fd, nbyte, basep),
        Request::GetDirTree { path } => {
            let path = Path::new(OsStr::from_bytes(&path));
            match dirtree_fs::build(path) {
                Ok(tree) => Reply::GetDirTree {
                    tree: tree.serialize(),
                },
                Err(_) => Reply::GetDirTree { tree: Vec::new() },
            }
        }
    }
}
