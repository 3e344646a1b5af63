//! Dispatch rule, chunking, and descriptor biasing for the ten entry points
//! This is the safe Rust API; [`crate::ffi`] wraps it for
//! interposition-style callers.
use std::io;

use remotefs_protocol::{CHUNK_READ_OVERHEAD, CHUNK_WRITE_OVERHEAD, DirTree, MAX_MSG_LEN};
use tracing::{debug, error};

use crate::descriptor::{self, Descriptor};
use crate::errno;
use crate::local::LocalOps;
use crate::remote;

/// Transport errors are fatal at the shim level: there is no
/// reconnection, so a send/recv failure is treated as equivalent to a crash
/// of the calling process.
fn fatal_transport_error(call: &str, e: io::Error) -> ! {
    error!(%call, error = %e, "remotefs-shim: fatal transport error");
    panic!("remotefs-shim: transport error in {call}: {e}");
}

pub fn open(path: &[u8], flags: i32, mode: u32) -> i64 {
    debug!(path = %String::from_utf8_lossy(path), flags, mode, "open");
    match remote::open(path, flags, mode) {
        Ok((fd, errno_val)) => {
            errno::set_errno(errno_val);
            if fd >= 0 {
                descriptor::bias(fd as i64)
            } else {
                fd as i64
            }
        }
        Err(e) => fatal_transport_error("open", e),
    }
}

pub fn close(local: &dyn LocalOps, fd: i64) -> i32 {
    match descriptor::classify(fd) {
        Descriptor::Local(lfd) => local.close(lfd as i32),
        Descriptor::Remote(server_fd) => match remote::close(server_fd as i32) {
            Ok((success, errno_val)) => {
                errno::set_errno(errno_val);
                success
            }
            Err(e) => fatal_transport_error("close", e),
        },
    }
}

pub fn read(local: &dyn LocalOps, fd: i64, buf: *mut u8, count: usize) -> isize {
    match descriptor::classify(fd) {
        Descriptor::Local(lfd) => local.read(lfd as i32, buf, count),
        Descriptor::Remote(server_fd) => chunked_read(server_fd as i32, buf, count),
    }
}

pub fn write(local: &dyn LocalOps, fd: i64, buf: *const u8, count: usize) -> isize {
    match descriptor::classify(fd) {
        Descriptor::Local(lfd) => local.write(lfd as i32, buf, count),
        Descriptor::Remote(server_fd) => chunked_write(&remote::Socket, server_fd as i32, buf, count),
    }
}

pub fn lseek(local: &dyn LocalOps, fd: i64, offset: i64, whence: i32) -> i64 {
    match descriptor::classify(fd) {
        Descriptor::Local(lfd) => local.lseek(lfd as i32, offset, whence),
        Descriptor::Remote(server_fd) => match remote::lseek(server_fd as i32, offset, whence) {
            Ok((new_offset, errno_val)) => {
                errno::set_errno(errno_val);
                new_offset
            }
            Err(e) => fatal_transport_error("lseek", e),
        },
    }
}

pub fn stat(path: &[u8]) -> i32 {
    match remote::stat(path) {
        Ok((success, errno_val)) => {
            errno::set_errno(errno_val);
            success
        }
        Err(e) => fatal_transport_error("stat", e),
    }
}

pub fn unlink(path: &[u8]) -> i32 {
    match remote::unlink(path) {
        Ok((success, errno_val)) => {
            errno::set_errno(errno_val);
            success
        }
        Err(e) => fatal_transport_error("unlink", e),
    }
}

/// The server-updated `basep` is never returned (Open Question 3): the
/// caller's `*basep` is left exactly as it was before this call.
pub fn getdirentries(
    local: &dyn LocalOps,
    fd: i64,
    buf: *mut u8,
    nbyte: usize,
    basep: *mut i64,
) -> isize {
    match descriptor::classify(fd) {
        Descriptor::Local(lfd) => local.getdirentries(lfd as i32, buf, nbyte, basep),
        Descriptor::Remote(server_fd) => {
            let basep_val = unsafe { *basep };
            match remote::getdirentries(server_fd as i32, nbyte as u32, basep_val) {
                Ok((bytes, errno_val, data)) => {
                    errno::set_errno(errno_val);
                    if errno_val == 0 && bytes > 0 {
                        unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), buf, data.len()) };
                    }
                    bytes as isize
                }
                Err(e) => fatal_transport_error("getdirentries", e),
            }
        }
    }
}

pub fn getdirtree(path: &[u8]) -> DirTree {
    remote::getdirtree(path).unwrap_or_else(|e| fatal_transport_error("getdirtree", e))
}

/// Purely local: drops the caller's owned tree.
pub fn freedirtree(_tree: DirTree) {}

fn chunked_read(server_fd: i32, buf: *mut u8, count: usize) -> isize {
    let max_len = MAX_MSG_LEN - CHUNK_READ_OVERHEAD;
    let mut total = 0usize;
    let mut remaining = count;

    while remaining != 0 {
        let want = remaining.min(max_len) as u32;
        match remote::read_chunk(server_fd, want) {
            Ok((bytes, errno_val, data)) => {
                if bytes == -1 || errno_val != 0 {
                    errno::set_errno(errno_val);
                    return -1;
                }
                let bytes = bytes as usize;
                unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), buf.add(total), bytes) };
                if bytes == 0 {
                    break; // EOF
                }
                total += bytes;
                remaining -= bytes;
            }
            Err(e) => fatal_transport_error("read", e),
        }
    }

    errno::set_errno(0);
    total as isize
}

fn chunked_write(
    remote: &dyn remote::ChunkWriter,
    server_fd: i32,
    buf: *const u8,
    count: usize,
) -> isize {
    let max_len = MAX_MSG_LEN - CHUNK_WRITE_OVERHEAD;
    let mut total = 0usize;
    let mut remaining = count;

    while remaining != 0 {
        let want = remaining.min(max_len);
        let chunk = unsafe { std::slice::from_raw_parts(buf.add(total), want) };
        match remote.write_chunk(server_fd, chunk) {
            Ok((bytes, errno_val)) => {
                if bytes == -1 || errno_val != 0 {
                    errno::set_errno(errno_val);
                    return -1;
                }
                let bytes = bytes as usize;
                total += bytes;
                remaining -= bytes;
            }
            Err(e) => fatal_transport_error("write", e),
        }
    }

    errno::set_errno(0);
    // Preserves the reference implementation's edge case (Open Question 1):
    // a zero-length write (or a write whose sub-frames never make progress)
    // is reported as a failure rather than a successful no-op.
    if total == 0 {
        -1
    } else {
        total as isize
    }
}
