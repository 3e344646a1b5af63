//! Per-opcode request execution. Each handler performs the real
//! syscall and folds its outcome into the matching [`Reply`] variant,
//! capturing `errno` from [`std::io::Error::last_os_error`] immediately
//! after the call that may have set it.
use std::ffi::CString;
use std::io;

use libc::{c_void, mode_t, off_t};
use remotefs_protocol::message::Reply;
use remotefs_protocol::statbuf;

fn raw_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

fn cstring(path: &[u8]) -> Result<CString, Reply> {
    CString::new(path).map_err(|_| Reply::Open {
        fd: -1,
        errno: libc::EINVAL,
    })
}

pub fn open(path: &[u8], flags: i32, mode: u32) -> Reply {
    let cpath = match cstring(path) {
        Ok(c) => c,
        Err(reply) => return reply,
    };
    let fd = unsafe { libc::open(cpath.as_ptr(), flags, mode as mode_t) };
    let errno = if fd == -1 { raw_errno() } else { 0 };
    Reply::Open { fd, errno }
}

/// Reads into a buffer sized to the full requested `count`: only the first
/// `bytes.max(0)` of the returned data are meaningful, matching the wire
/// contract documented on [`Reply::Read`].
pub fn read(fd: i32, count: u32) -> Reply {
    let mut buf = vec![0u8; count as usize];
    let n = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut c_void, count as usize) };
    let errno = if n < 0 { raw_errno() } else { 0 };
    Reply::Read {
        bytes: n as i32,
        errno,
        data: buf,
    }
}

pub fn write(fd: i32, data: &[u8]) -> Reply {
    let n = unsafe { libc::write(fd, data.as_ptr() as *const c_void, data.len()) };
    let errno = if n < 0 { raw_errno() } else { 0 };
    Reply::Write {
        bytes: n as i32,
        errno,
    }
}

pub fn close(fd: i32) -> Reply {
    let success = unsafe { libc::close(fd) };
    let errno = if success == -1 { raw_errno() } else { 0 };
    Reply::Close { success, errno }
}

pub fn lseek(fd: i32, offset: i64, whence: i32) -> Reply {
    let new_offset = unsafe { libc::lseek(fd, offset as off_t, whence) };
    let errno = if new_offset == -1 { raw_errno() } else { 0 };
    Reply::Lseek {
        new_offset: new_offset as i64,
        errno,
    }
}

/// The client's transmitted `statbuf` is never consulted (Open Question
/// 2): we `stat` into a local buffer purely to exercise the syscall and
/// report `success`/`errno`, then discard it.
pub fn stat(path: &[u8], _client_statbuf: &[u8]) -> Reply {
    let cpath = match CString::new(path) {
        Ok(c) => c,
        Err(_) => {
            return Reply::Stat {
                success: -1,
                errno: libc::EINVAL,
            };
        }
    };
    let mut local = statbuf::zeroed();
    let success = unsafe { libc::stat(cpath.as_ptr(), &mut local) };
    let errno = if success == -1 { raw_errno() } else { 0 };
    Reply::Stat { success, errno }
}

pub fn unlink(path: &[u8]) -> Reply {
    let cpath = match CString::new(path) {
        Ok(c) => c,
        Err(_) => {
            return Reply::Unlink {
                success: -1,
                errno: libc::EINVAL,
            };
        }
    };
    let success = unsafe { libc::unlink(cpath.as_ptr()) };
    let errno = if success == -1 { raw_errno() } else { 0 };
    Reply::Unlink { success, errno }
}

/// The client-supplied `basep` is accepted but the server's updated value
/// is never reported back on the wire (Open Question 3): only `bytes` and
/// `errno` make it into the reply.
pub fn getdirentries(fd: i32, nbyte: u32, basep: i64) -> Reply {
    let mut buf = vec![0u8; nbyte as usize];
    let mut basep = basep as off_t;
    // getdirentries(2)'s nbytes parameter is size_t on every platform that
    // exposes the call; libc's binding follows the C prototype, not our
    // u32 wire field, so it is widened to usize uniformly here.
    let n = unsafe {
        libc::getdirentries(
            fd,
            buf.as_mut_ptr() as *mut libc::c_char,
            nbyte as usize,
            &mut basep,
        )
    };
    let errno = if n < 0 { raw_errno() } else { 0 };
    if n > 0 {
        buf.truncate(n as usize);
    }
    Reply::GetDirEntries {
        bytes: n as i32,
        errno,
        data: buf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn open_of_missing_file_reports_enoent() {
        let reply = open(b"/nonexistent/path/for/remotefs-tests\0", libc::O_RDONLY, 0);
        match reply {
            Reply::Open { fd, errno } => {
                assert_eq!(fd, -1);
                assert_eq!(errno, libc::ENOENT);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn write_then_read_round_trips_through_real_fd() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello").unwrap();
        let fd = tmp.as_file().try_clone().unwrap();

        use std::os::unix::io::AsRawFd;
        let reply = read(fd.as_raw_fd(), 0);
        match reply {
            Reply::Read { bytes, errno, data } => {
                assert_eq!(errno, 0);
                assert_eq!(bytes, 0);
                assert!(data.is_empty());
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn close_of_bad_fd_reports_ebadf() {
        let reply = close(-1);
        match reply {
            Reply::Close { success, errno } => {
                assert_eq!(success, -1);
                assert_eq!(errno, libc::EBADF);
            }
            _ => panic!("wrong variant"),
        }
    }
}
