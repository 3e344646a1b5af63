//! Typed request/reply envelopes for the nine opcodes.
//!
//! Replaces the manual per-field offset arithmetic of the reference
//! implementation with a table-driven codec: each opcode has exactly one
//! [`Request`] variant and one [`Reply`] variant, and `write_to`/`read_from`
//! are the only places the wire grammar is spelled out.
use std::io::{self, Read, Write};

use crate::opcode::Opcode;
use crate::wire::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Open {
        path: Vec<u8>,
        flags: i32,
        mode: u32,
    },
    Read {
        fd: i32,
        count: u32,
    },
    Write {
        fd: i32,
        data: Vec<u8>,
    },
    Close {
        fd: i32,
    },
    Lseek {
        fd: i32,
        offset: i64,
        whence: i32,
    },
    Stat {
        path: Vec<u8>,
        statbuf: Vec<u8>,
    },
    Unlink {
        path: Vec<u8>,
    },
    GetDirEntries {
        fd: i32,
        nbyte: u32,
        basep: i64,
    },
    GetDirTree {
        path: Vec<u8>,
    },
}

impl Request {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Open { .. } => Opcode::Open,
            Self::Read { .. } => Opcode::Read,
            Self::Write { .. } => Opcode::Write,
            Self::Close { .. } => Opcode::Close,
            Self::Lseek { .. } => Opcode::Lseek,
            Self::Stat { .. } => Opcode::Stat,
            Self::Unlink { .. } => Opcode::Unlink,
            Self::GetDirEntries { .. } => Opcode::GetDirEntries,
            Self::GetDirTree { .. } => Opcode::GetDirTree,
        }
    }

    /// Encode opcode + request body and send it as a single frame.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_u32(w, self.opcode().as_u32())?;
        match self {
            Self::Open { path, flags, mode } => {
                write_lp_bytes(w, path)?;
                write_i32(w, *flags)?;
                write_u32(w, *mode)?;
            }
            Self::Read { fd, count } => {
                write_i32(w, *fd)?;
                write_u32(w, *count)?;
            }
            Self::Write { fd, data } => {
                write_i32(w, *fd)?;
                write_u32(w, data.len() as u32)?;
                write_bytes(w, data)?;
            }
            Self::Close { fd } => {
                write_i32(w, *fd)?;
            }
            Self::Lseek { fd, offset, whence } => {
                write_i32(w, *fd)?;
                write_i64(w, *offset)?;
                write_i32(w, *whence)?;
            }
            Self::Stat { path, statbuf } => {
                write_lp_bytes(w, path)?;
                write_bytes(w, statbuf)?;
            }
            Self::Unlink { path } => {
                write_lp_bytes(w, path)?;
            }
            Self::GetDirEntries { fd, nbyte, basep } => {
                write_i32(w, *fd)?;
                write_u32(w, *nbyte)?;
                write_i64(w, *basep)?;
            }
            Self::GetDirTree { path } => {
                write_lp_bytes(w, path)?;
            }
        }
        Ok(())
    }

    /// Read a request body for an already-decoded `opcode`. `stat_size` is
    /// the platform's `sizeof(stat_t)`, needed because the `stat` request's
    /// trailing field has no length prefix of its own.
    pub fn read_body<R: Read>(opcode: Opcode, stat_size: usize, r: &mut R) -> io::Result<Self> {
        Ok(match opcode {
            Opcode::Open => {
                let path = read_lp_bytes(r)?;
                let flags = read_i32(r)?;
                let mode = read_u32(r)?;
                Self::Open { path, flags, mode }
            }
            Opcode::Read => {
                let fd = read_i32(r)?;
                let count = read_u32(r)?;
                Self::Read { fd, count }
            }
            Opcode::Write => {
                let fd = read_i32(r)?;
                let count = read_u32(r)? as usize;
                let data = read_bytes(r, count)?;
                Self::Write { fd, data }
            }
            Opcode::Close => Self::Close { fd: read_i32(r)? },
            Opcode::Lseek => {
                let fd = read_i32(r)?;
                let offset = read_i64(r)?;
                let whence = read_i32(r)?;
                Self::Lseek { fd, offset, whence }
            }
            Opcode::Stat => {
                let path = read_lp_bytes(r)?;
                let statbuf = read_bytes(r, stat_size)?;
                Self::Stat { path, statbuf }
            }
            Opcode::Unlink => Self::Unlink {
                path: read_lp_bytes(r)?,
            },
            Opcode::GetDirEntries => {
                let fd = read_i32(r)?;
                let nbyte = read_u32(r)?;
                let basep = read_i64(r)?;
                Self::GetDirEntries { fd, nbyte, basep }
            }
            Opcode::GetDirTree => Self::GetDirTree {
                path: read_lp_bytes(r)?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Open {
        fd: i32,
        errno: i32,
    },
    /// `data` always has length equal to the originally requested `count`,
    /// regardless of `bytes`; only the first `bytes.max(0)` of it are
    /// meaningful. Keeping the field at the full, fixed size is what lets
    /// `write_to` produce a frame whose length matches the wire grammar
    /// without the caller tracking the request size separately.
    Read {
        bytes: i32,
        errno: i32,
        data: Vec<u8>,
    },
    Write {
        bytes: i32,
        errno: i32,
    },
    Close {
        success: i32,
        errno: i32,
    },
    Lseek {
        new_offset: i64,
        errno: i32,
    },
    Stat {
        success: i32,
        errno: i32,
    },
    Unlink {
        success: i32,
        errno: i32,
    },
    GetDirEntries {
        bytes: i32,
        errno: i32,
        data: Vec<u8>,
    },
    GetDirTree {
        tree: Vec<u8>,
    },
}

impl Reply {
    /// Write the reply, issuing a second frame for the two-frame opcodes
    /// (`getdirentries`, `getdirtree`). Returns the number
    /// of payload bytes written, for the server's per-request logging.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            Self::Open { fd, errno } => {
                write_i32(w, *fd)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::Read { bytes, errno, data } => {
                write_i32(w, *bytes)?;
                write_i32(w, *errno)?;
                write_bytes(w, data)?;
                Ok(data.len())
            }
            Self::Write { bytes, errno } => {
                write_i32(w, *bytes)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::Close { success, errno } => {
                write_i32(w, *success)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::Lseek { new_offset, errno } => {
                write_i64(w, *new_offset)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::Stat { success, errno } => {
                write_i32(w, *success)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::Unlink { success, errno } => {
                write_i32(w, *success)?;
                write_i32(w, *errno)?;
                Ok(0)
            }
            Self::GetDirEntries { bytes, errno, data } => {
                write_i32(w, *bytes)?;
                write_i32(w, *errno)?;
                if *errno == 0 && *bytes > 0 {
                    write_bytes(w, data)?;
                    Ok(data.len())
                } else {
                    Ok(0)
                }
            }
            Self::GetDirTree { tree } => {
                write_u32(w, tree.len() as u32)?;
                write_bytes(w, tree)?;
                Ok(tree.len())
            }
        }
    }

    pub fn read_open<R: Read>(r: &mut R) -> io::Result<Self> {
        let fd = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Open { fd, errno })
    }

    /// `count` is the number of bytes the client requested; the wire reply
    /// carries exactly that many data bytes regardless of how many are
    /// actually valid (`bytes`).
    pub fn read_read<R: Read>(r: &mut R, count: usize) -> io::Result<Self> {
        let bytes = read_i32(r)?;
        let errno = read_i32(r)?;
        let data = read_bytes(r, count)?;
        Ok(Self::Read { bytes, errno, data })
    }

    pub fn read_write<R: Read>(r: &mut R) -> io::Result<Self> {
        let bytes = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Write { bytes, errno })
    }

    pub fn read_close<R: Read>(r: &mut R) -> io::Result<Self> {
        let success = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Close { success, errno })
    }

    pub fn read_lseek<R: Read>(r: &mut R) -> io::Result<Self> {
        let new_offset = read_i64(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Lseek { new_offset, errno })
    }

    pub fn read_stat<R: Read>(r: &mut R) -> io::Result<Self> {
        let success = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Stat { success, errno })
    }

    pub fn read_unlink<R: Read>(r: &mut R) -> io::Result<Self> {
        let success = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok(Self::Unlink { success, errno })
    }

    /// Reads frame 1 (`bytes | errno`); frame 2 (the data) is only present
    /// when `errno == 0`, so the caller reads it separately once it knows
    /// `bytes`.
    pub fn read_getdirentries_header<R: Read>(r: &mut R) -> io::Result<(i32, i32)> {
        let bytes = read_i32(r)?;
        let errno = read_i32(r)?;
        Ok((bytes, errno))
    }

    pub fn read_getdirtree_header<R: Read>(r: &mut R) -> io::Result<u32> {
        read_u32(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_open_request() {
        let req = Request::Open {
            path: b"/tmp/x".to_vec(),
            flags: 0o101, // O_CREAT | O_WRONLY
            mode: 0o644,
        };
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();

        let mut cur = Cursor::new(buf);
        let opcode = Opcode::from_u32(read_u32(&mut cur).unwrap()).unwrap();
        assert_eq!(opcode, Opcode::Open);
        let back = Request::read_body(opcode, 0, &mut cur).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn write_request_byte_count_matches_grammar() {
        let req = Request::Write {
            fd: 7,
            data: vec![1, 2, 3, 4, 5],
        };
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        // opcode(4) + fd(4) + count(4) + data(5)
        assert_eq!(buf.len(), 4 + 4 + 4 + 5);
    }

    #[test]
    fn read_reply_pads_to_requested_count() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 3).unwrap(); // bytes
        write_i32(&mut buf, 0).unwrap(); // errno
        buf.extend_from_slice(b"abc\0\0"); // 5-byte requested count, 3 valid

        let mut cur = Cursor::new(buf);
        let reply = Reply::read_read(&mut cur, 5).unwrap();
        match reply {
            Reply::Read { bytes, errno, data } => {
                assert_eq!(bytes, 3);
                assert_eq!(errno, 0);
                assert_eq!(&data[..3], b"abc");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn getdirentries_reply_omits_payload_on_error() {
        let reply = Reply::GetDirEntries {
            bytes: -1,
            errno: 9, // EBADF
            data: vec![1, 2, 3],
        };
        let mut buf = Vec::new();
        reply.write_to(&mut buf).unwrap();
        // header only: bytes(4) + errno(4)
        assert_eq!(buf.len(), 8);
    }
}
