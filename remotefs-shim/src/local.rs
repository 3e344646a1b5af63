//! The local-operation capability, replacing dynamic symbol interposition /
//! "Process-wide state" re-architecture notes).
//!
//! The five descriptor-taking operations fall through to this capability
//! whenever the caller's descriptor is below the bias boundary. In the
//! original source this fallback was a `dlsym(RTLD_NEXT, ...)` function
//! pointer resolved once at process-init time; here it is an ordinary trait
//! so the dispatch and chunking logic in [`crate::ops`] never has to know
//! how "the real syscall" is reached. [`Libc`] is the platform adapter that
//! calls straight through to libc, which is what a symbol-interposition
//! build installs in front of the real dynamic-linker trampoline; a pure
//! Rust host process can substitute any other implementation (e.g. a fake
//! for tests) behind the same trait.
use std::os::raw::c_void;

pub trait LocalOps: Send + Sync {
    fn close(&self, fd: i32) -> i32;
    fn read(&self, fd: i32, buf: *mut u8, count: usize) -> isize;
    fn write(&self, fd: i32, buf: *const u8, count: usize) -> isize;
    fn lseek(&self, fd: i32, offset: i64, whence: i32) -> i64;
    fn getdirentries(&self, fd: i32, buf: *mut u8, nbyte: usize, basep: *mut i64) -> isize;
}

/// Calls straight through to the platform's libc. Every call here is exactly
/// what the original `orig_*` function pointers invoked.
#[derive(Debug, Default)]
pub struct Libc;

impl LocalOps for Libc {
    fn close(&self, fd: i32) -> i32 {
        unsafe { libc::close(fd) }
    }

    fn read(&self, fd: i32, buf: *mut u8, count: usize) -> isize {
        unsafe { libc::read(fd, buf as *mut c_void, count) }
    }

    fn write(&self, fd: i32, buf: *const u8, count: usize) -> isize {
        unsafe { libc::write(fd, buf as *const c_void, count) }
    }

    fn lseek(&self, fd: i32, offset: i64, whence: i32) -> i64 {
        unsafe { libc::lseek(fd, offset, whence) as i64 }
    }

    fn getdirentries(&self, fd: i32, buf: *mut u8, nbyte: usize, basep: *mut i64) -> isize {
        // getdirentries(2)'s nbytes parameter is size_t on every platform
        // that exposes the call, Linux included; libc's binding follows the
        // C prototype, not our own wire widths, so `nbyte` is passed as-is
        // rather than narrowed to a `u32` on Linux.
        //
        // glibc's getdirentries(3) takes an `off_t *basep`; on the platforms
        // we target `off_t` is 64-bit, matching our `i64`.
        unsafe { libc::getdirentries(fd, buf as *mut libc::c_char, nbyte, basep) }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use std::sync::Mutex;

    /// A fake [`LocalOps`] for exercising dispatch logic without touching a
    /// real kernel descriptor table.
    #[derive(Default)]
    pub struct FakeLocal {
        pub calls: Mutex<Vec<String>>,
    }

    impl LocalOps for FakeLocal {
        fn close(&self, fd: i32) -> i32 {
            self.calls.lock().unwrap().push(format!("close({fd})"));
            0
        }

        fn read(&self, fd: i32, _buf: *mut u8, count: usize) -> isize {
            self.calls
                .lock()
                .unwrap()
                .push(format!("read({fd}, {count})"));
            count as isize
        }

        fn write(&self, fd: i32, _buf: *const u8, count: usize) -> isize {
            self.calls
                .lock()
                .unwrap()
                .push(format!("write({fd}, {count})"));
            count as isize
        }

        fn lseek(&self, fd: i32, offset: i64, whence: i32) -> i64 {
            self.calls
                .lock()
                .unwrap()
                .push(format!("lseek({fd}, {offset}, {whence})"));
            offset
        }

        fn getdirentries(&self, fd: i32, _buf: *mut u8, nbyte: usize, _basep: *mut i64) -> isize {
            self.calls
                .lock()
                .unwrap()
                .push(format!("getdirentries({fd}, {nbyte})"));
            0
        }
    }
}
