//! Thin `extern "C"` adapters a host platform's dynamic-linker symbol
//! interposition installs in front of [`crate::ops`] ("Dynamic symbol
//! interposition").
//!
//! The actual linker-level mechanism that makes these symbols shadow libc's
//! is an external collaborator this crate does not implement ("Out of
//! scope"); what lives here is the C-ABI surface such a mechanism would
//! bind against. A pure-Rust host can skip this module entirely and call
//! [`crate::ops`] directly instead — the "explicit client-library facade"
//! alternative named in the same design note.
//!
//! `open`'s C prototype is variadic (`mode_t` only appears when
//! `O_CREAT` is set); stable Rust cannot export a variadic `extern "C"`
//! symbol, so this adapter always takes `mode` as a plain argument. The
//! server already receives `mode` unconditionally, so nothing about
//! the wire protocol changes — only the shape of this one boundary symbol.
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};

use remotefs_protocol::DirTree;

use crate::local::Libc;
use crate::ops;

unsafe fn path_bytes<'a>(path: *const c_char) -> &'a [u8] {
    CStr::from_ptr(path).to_bytes()
}

/// # Safety
/// `path` must be a valid, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn remotefs_open(path: *const c_char, flags: c_int, mode: u32) -> c_int {
    ops::open(path_bytes(path), flags, mode) as c_int
}

#[no_mangle]
pub extern "C" fn remotefs_close(fd: c_int) -> c_int {
    ops::close(&Libc, fd as i64)
}

/// # Safety
/// `buf` must point to at least `count` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn remotefs_read(fd: c_int, buf: *mut c_void, count: usize) -> isize {
    ops::read(&Libc, fd as i64, buf as *mut u8, count)
}

/// # Safety
/// `buf` must point to at least `count` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn remotefs_write(fd: c_int, buf: *const c_void, count: usize) -> isize {
    ops::write(&Libc, fd as i64, buf as *const u8, count)
}

#[no_mangle]
pub extern "C" fn remotefs_lseek(fd: c_int, offset: i64, whence: c_int) -> i64 {
    ops::lseek(&Libc, fd as i64, offset, whence)
}

/// # Safety
/// `path` must be a valid, NUL-terminated C string. The populated
/// `libc::stat` at `out` is never written by this call (Open Question 2) —
/// passing a valid, writable pointer is still required by the C contract,
/// but its contents are left untouched.
#[no_mangle]
pub unsafe extern "C" fn remotefs_stat(path: *const c_char, _out: *mut libc::stat) -> c_int {
    ops::stat(path_bytes(path))
}

/// # Safety
/// `path` must be a valid, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn remotefs_unlink(path: *const c_char) -> c_int {
    ops::unlink(path_bytes(path))
}

/// # Safety
/// `buf` must point to at least `nbyte` writable bytes, and `basep` must be
/// a valid pointer to an `i64` (its value is read but never overwritten,
/// per Open Question 3).
#[no_mangle]
pub unsafe extern "C" fn remotefs_getdirentries(
    fd: c_int,
    buf: *mut c_char,
    nbyte: usize,
    basep: *mut i64,
) -> isize {
    ops::getdirentries(&Libc, fd as i64, buf as *mut u8, nbyte, basep)
}

/// # Safety
/// `path` must be a valid, NUL-terminated C string. The returned pointer
/// must eventually be passed to [`remotefs_freedirtree`] exactly once.
#[no_mangle]
pub unsafe extern "C" fn remotefs_getdirtree(path: *const c_char) -> *mut DirTree {
    Box::into_raw(Box::new(ops::getdirtree(path_bytes(path))))
}

/// # Safety
/// `tree` must be a pointer previously returned by [`remotefs_getdirtree`],
/// not yet freed.
#[no_mangle]
pub unsafe extern "C" fn remotefs_freedirtree(tree: *mut DirTree) {
    if !tree.is_null() {
        ops::freedirtree(*Box::from_raw(tree));
    }
}
