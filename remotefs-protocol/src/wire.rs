//! Little-endian primitive (de)serialization and the send-all/recv-exact loops
//! every request and reply is built out of.
use std::io::{self, Read, Write};

/// Write `buf` in full, looping over partial writes the way a blocking socket
/// occasionally produces under load. Mirrors the reference implementation's
/// `sendRequest` loop.
pub fn send_all<W: Write>(w: &mut W, buf: &[u8]) -> io::Result<()> {
    w.write_all(buf)
}

/// Read exactly `buf.len()` bytes, looping over short reads. A peer that
/// closes mid-frame surfaces as an `UnexpectedEof`, which callers treat as a
/// fatal transport error per the protocol's error-handling design.
pub fn recv_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<()> {
    r.read_exact(buf)
}

pub fn write_u32<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    send_all(w, &v.to_le_bytes())
}

pub fn write_i32<W: Write>(w: &mut W, v: i32) -> io::Result<()> {
    send_all(w, &v.to_le_bytes())
}

pub fn write_i64<W: Write>(w: &mut W, v: i64) -> io::Result<()> {
    send_all(w, &v.to_le_bytes())
}

pub fn write_bytes<W: Write>(w: &mut W, v: &[u8]) -> io::Result<()> {
    send_all(w, v)
}

/// Length-prefixed byte string: `len:u32 | bytes`.
pub fn write_lp_bytes<W: Write>(w: &mut W, v: &[u8]) -> io::Result<()> {
    write_u32(w, v.len() as u32)?;
    write_bytes(w, v)
}

pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    recv_exact(r, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    recv_exact(r, &mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub fn read_i64<R: Read>(r: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    recv_exact(r, &mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

pub fn read_bytes<R: Read>(r: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    recv_exact(r, &mut buf)?;
    Ok(buf)
}

/// Length-prefixed byte string: `len:u32 | bytes`.
pub fn read_lp_bytes<R: Read>(r: &mut R) -> io::Result<Vec<u8>> {
    let len = read_u32(r)? as usize;
    read_bytes(r, len)
}
