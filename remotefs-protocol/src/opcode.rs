use std::io;

/// Ceiling on the size of any single wire frame, in either direction.
///
/// `read`/`write` payloads larger than this are split by the shim into
/// independent sub-frames (see [`crate::CHUNK_READ_OVERHEAD`] and
/// [`crate::CHUNK_WRITE_OVERHEAD`]).
pub const MAX_MSG_LEN: usize = 4096;

/// The ten operations the protocol carries, in their wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Open = 0,
    Read = 1,
    Write = 2,
    Close = 3,
    Lseek = 4,
    Stat = 5,
    Unlink = 6,
    GetDirEntries = 7,
    GetDirTree = 8,
}

impl Opcode {
    pub fn from_u32(v: u32) -> Option<Self> {
        Some(match v {
            0 => Self::Open,
            1 => Self::Read,
            2 => Self::Write,
            3 => Self::Close,
            4 => Self::Lseek,
            5 => Self::Stat,
            6 => Self::Unlink,
            7 => Self::GetDirEntries,
            8 => Self::GetDirTree,
            _ => return None,
        })
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Decode the leading opcode from a request, erroring on anything outside 0..=8.
///
/// Per the protocol's error-handling design an unknown opcode is not a defined
/// wire-level error: callers map a decode failure here to whatever "zero-length
/// reply" behavior their side specifies, rather than inventing a new reply shape.
pub fn read_opcode<R: io::Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
