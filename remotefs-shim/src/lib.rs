//! Client-side interposition shim.
//!
//! Intercepts ten file/directory operations and reroutes every one of them
//! whose descriptor (or lack of one) marks it as remote to a
//! `remotefs-server` over a single lazily-established TCP connection,
//! restoring `errno` and returning values with the same semantics the
//! native calls would have had.
//!
//! The safe, idiomatic entry point for a Rust host process is [`ops`]. A
//! host relying on dynamic-linker symbol interposition instead links
//! against the `extern "C"` adapters in [`ffi`].

pub mod context;
pub mod descriptor;
pub mod errno;
pub mod ffi;
pub mod local;
pub mod ops;
pub mod remote;

pub use descriptor::Descriptor;
pub use local::{Libc, LocalOps};
