//! Verbatim wire transfer of the platform's `stat_t` layout.
//!
//! The protocol sends `libc::stat` byte-for-byte: client and server must
//! therefore be built for the same platform. No attempt is made to version or
//! normalize the layout across hosts (see Open Question 2 in the design
//! notes).
use std::{io, mem, slice};

pub const STAT_SIZE: usize = mem::size_of::<libc::stat>();

/// View a `stat` buffer as the raw bytes the wire carries.
pub fn to_bytes(s: &libc::stat) -> &[u8] {
    unsafe { slice::from_raw_parts(s as *const libc::stat as *const u8, STAT_SIZE) }
}

/// Recover a `stat` buffer from exactly `STAT_SIZE` bytes.
pub fn from_bytes(bytes: &[u8]) -> io::Result<libc::stat> {
    if bytes.len() != STAT_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected {STAT_SIZE} stat bytes, got {}", bytes.len()),
        ));
    }
    // SAFETY: `libc::stat` is a plain-old-data struct; any bit pattern of the
    // right size is a valid (if meaningless) instance of it, and `bytes` is
    // exactly `STAT_SIZE` long.
    let mut out: libc::stat = unsafe { mem::zeroed() };
    unsafe {
        let dst = &mut out as *mut libc::stat as *mut u8;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, STAT_SIZE);
    }
    Ok(out)
}

/// A zeroed `stat_t`, standing in for the "uninitialized output buffer" the
/// reference client transmits alongside a `stat` request (Open Question
/// 2). We zero rather than leave truly uninitialized so the copy onto the
/// wire itself is sound; the server still never writes a populated buffer
/// back, so the caller's output parameter is left exactly as before the call.
pub fn zeroed() -> libc::stat {
    unsafe { mem::zeroed() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let mut s = zeroed();
        s.st_size = 42;
        s.st_mode = 0o100644;

        let bytes = to_bytes(&s).to_vec();
        let back = from_bytes(&bytes).unwrap();
        assert_eq!(back.st_size, 42);
        assert_eq!(back.st_mode, 0o100644);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = from_bytes(&[0u8; 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
