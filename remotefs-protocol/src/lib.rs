//! Wire codec and directory-tree serializer shared by the remotefs client
//! shim and server.
//!
//! This crate owns every byte-level detail of the wire protocol: opcodes,
//! the nine request/reply shapes, the `stat_t` passthrough, and the
//! recursive directory-tree encoding. Neither
//! the shim nor the server hand-rolls offset arithmetic; they build
//! [`message::Request`]/[`message::Reply`] values and call `write_to`/
//! `read_body`.

pub mod dirtree;
pub mod message;
pub mod opcode;
pub mod statbuf;
pub mod wire;

pub use dirtree::DirTree;
pub use message::{Reply, Request};
pub use opcode::{Opcode, MAX_MSG_LEN};

/// Descriptor-space partition boundary. Values `< DESCRIPTOR_BIAS`
/// are local descriptors; a remote descriptor handed back to a caller always
/// equals `server_fd + DESCRIPTOR_BIAS`. The server itself is never told the
/// biased value — only the shim adds or subtracts it.
pub const DESCRIPTOR_BIAS: i64 = 5000;

/// Per-frame overhead subtracted from [`MAX_MSG_LEN`] when chunking `read`
/// payloads: `bytes:i32 | errno:i32`.
pub const CHUNK_READ_OVERHEAD: usize = 8;

/// Per-frame overhead subtracted from [`MAX_MSG_LEN`] when chunking `write`
/// payloads: `opcode:u32 | fd:i32 | count:u32`.
pub const CHUNK_WRITE_OVERHEAD: usize = 12;
