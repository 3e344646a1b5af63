//! One request/reply exchange per function, each a thin wrapper over
//! [`remotefs_protocol::message`]. Chunking (splitting a large `read`/`write`
//! into several of these) lives one layer up, in [`crate::ops`].
use std::io;

use remotefs_protocol::{
    message::{Reply, Request},
    statbuf, DirTree,
};

use crate::context::with_connection;

fn exchange<T>(
    req: &Request,
    read_reply: impl FnOnce(&mut std::net::TcpStream) -> io::Result<T>,
) -> io::Result<T> {
    with_connection(|stream| {
        req.write_to(stream)?;
        read_reply(stream)
    })
}

/// `open` is unconditionally remote: there is no local descriptor to
/// classify it against.
pub fn open(path: &[u8], flags: i32, mode: u32) -> io::Result<(i32, i32)> {
    let req = Request::Open {
        path: path.to_vec(),
        flags,
        mode,
    };
    match exchange(&req, Reply::read_open)? {
        Reply::Open { fd, errno } => Ok((fd, errno)),
        _ => unreachable!("read_open always yields Reply::Open"),
    }
}

pub fn close(server_fd: i32) -> io::Result<(i32, i32)> {
    let req = Request::Close { fd: server_fd };
    match exchange(&req, Reply::read_close)? {
        Reply::Close { success, errno } => Ok((success, errno)),
        _ => unreachable!("read_close always yields Reply::Close"),
    }
}

/// One sub-frame of a chunked `read`. `count` must already be clamped to
/// `MAX_MSG_LEN - CHUNK_READ_OVERHEAD` by the caller.
pub fn read_chunk(server_fd: i32, count: u32) -> io::Result<(i32, i32, Vec<u8>)> {
    let req = Request::Read {
        fd: server_fd,
        count,
    };
    match exchange(&req, |s| Reply::read_read(s, count as usize))? {
        Reply::Read { bytes, errno, data } => Ok((bytes, errno, data)),
        _ => unreachable!("read_read always yields Reply::Read"),
    }
}

/// One sub-frame of a chunked `write`. `data.len()` must already be clamped
/// to `MAX_MSG_LEN - CHUNK_WRITE_OVERHEAD` by the caller.
pub fn write_chunk(server_fd: i32, data: &[u8]) -> io::Result<(i32, i32)> {
    let req = Request::Write {
        fd: server_fd,
        data: data.to_vec(),
    };
    match exchange(&req, Reply::read_write)? {
        Reply::Write { bytes, errno } => Ok((bytes, errno)),
        _ => unreachable!("read_write always yields Reply::Write"),
    }
}

/// Lets [`crate::ops::chunked_write`] drive the chunking/boundary logic
/// against a recording fake instead of a live connection, the same way
/// [`crate::local::LocalOps`] abstracts the local-descriptor path.
pub trait ChunkWriter {
    fn write_chunk(&self, server_fd: i32, data: &[u8]) -> io::Result<(i32, i32)>;
}

#[derive(Debug, Default)]
pub struct Socket;

impl ChunkWriter for Socket {
    fn write_chunk(&self, server_fd: i32, data: &[u8]) -> io::Result<(i32, i32)> {
        write_chunk(server_fd, data)
    }
}


pub fn lseek(server_fd: i32, offset: i64, whence: i32) -> io::Result<(i64, i32)> {
    let req = Request::Lseek {
        fd: server_fd,
        offset,
        whence,
    };
    match exchange(&req, Reply::read_lseek)? {
        Reply::Lseek { new_offset, errno } => Ok((new_offset, errno)),
        _ => unreachable!("read_lseek always yields Reply::Lseek"),
    }
}

/// Sends the caller's (possibly zeroed/uninitialized) `stat_t` over the wire
/// alongside the path, per the documented Open Question 2: the server never
/// sends a populated buffer back, so the caller's output parameter is left
/// untouched by this call.
pub fn stat(path: &[u8]) -> io::Result<(i32, i32)> {
    let req = Request::Stat {
        path: path.to_vec(),
        statbuf: statbuf::to_bytes(&statbuf::zeroed()).to_vec(),
    };
    match exchange(&req, Reply::read_stat)? {
        Reply::Stat { success, errno } => Ok((success, errno)),
        _ => unreachable!("read_stat always yields Reply::Stat"),
    }
}

pub fn unlink(path: &[u8]) -> io::Result<(i32, i32)> {
    let req = Request::Unlink {
        path: path.to_vec(),
    };
    match exchange(&req, Reply::read_unlink)? {
        Reply::Unlink { success, errno } => Ok((success, errno)),
        _ => unreachable!("read_unlink always yields Reply::Unlink"),
    }
}

/// `getdirentries` is not chunked: the caller's `nbyte` is sent as-is, and
/// per Open Question 3 the server-updated `basep` is never returned, so the
/// caller's `*basep` is left exactly as it was before the call.
pub fn getdirentries(server_fd: i32, nbyte: u32, basep: i64) -> io::Result<(i32, i32, Vec<u8>)> {
    let req = Request::GetDirEntries {
        fd: server_fd,
        nbyte,
        basep,
    };
    with_connection(|stream| {
        req.write_to(stream)?;
        let (bytes, errno) = Reply::read_getdirentries_header(stream)?;
        let data = if errno == 0 && bytes > 0 {
            remotefs_protocol::wire::read_bytes(stream, bytes as usize)?
        } else {
            Vec::new()
        };
        Ok((bytes, errno, data))
    })
}

pub fn getdirtree(path: &[u8]) -> io::Result<DirTree> {
    let req = Request::GetDirTree {
        path: path.to_vec(),
    };
    with_connection(|stream| {
        req.write_to(stream)?;
        let length = Reply::read_getdirtree_header(stream)? as usize;
        let bytes = remotefs_protocol::wire::read_bytes(stream, length)?;
        DirTree::deserialize(&bytes)
    })
}
