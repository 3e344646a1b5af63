//! End-to-end exercises of the shim against a real `remotefs-server`
//! instance over a loopback TCP connection.
//!
//! All scenarios run inside a single `#[test]` because the shim's
//! connection is process-wide (`ShimContext`/`OnceLock`): splitting them
//! into separate test functions would race on which one initializes it
//! first.
use std::net::TcpListener;
use std::thread;

use remotefs_shim::ops;
use remotefs_shim::Libc;
use tempfile::tempdir;

fn start_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || remotefs_server::serve_forever(listener));
    port
}

fn path_bytes(p: &std::path::Path) -> Vec<u8> {
    p.to_str().unwrap().as_bytes().to_vec()
}

#[test]
fn full_lifecycle_over_a_real_connection() {
    let port = start_server();
    unsafe {
        std::env::set_var("server15440", "127.0.0.1");
        std::env::set_var("serverport15440", port.to_string());
    }

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("greeting.txt");

    // open + write + close a new file.
    let fd = ops::open(
        &path_bytes(&file_path),
        libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC,
        0o644,
    );
    assert!(fd >= remotefs_protocol::DESCRIPTOR_BIAS, "fd should be remote");

    let payload = b"hello, remote file";
    let n = ops::write(&Libc, fd, payload.as_ptr(), payload.len());
    assert_eq!(n, payload.len() as isize);

    // lseek back to the start and read the same bytes back without closing.
    let new_offset = ops::lseek(&Libc, fd, 0, libc::SEEK_SET);
    assert_eq!(new_offset, 0);
    let mut roundtrip = vec![0u8; payload.len()];
    let n = ops::read(&Libc, fd, roundtrip.as_mut_ptr(), roundtrip.len());
    assert_eq!(n, payload.len() as isize);
    assert_eq!(&roundtrip, payload);

    assert_eq!(ops::close(&Libc, fd), 0);

    // a read against a closed descriptor fails with EBADF.
    let mut buf = [0u8; 1];
    assert_eq!(ops::read(&Libc, fd, buf.as_mut_ptr(), buf.len()), -1);
    assert_eq!(remotefs_shim::errno::get_errno(), libc::EBADF);

    // read it back through a fresh open.
    let fd = ops::open(&path_bytes(&file_path), libc::O_RDONLY, 0);
    let mut buf = vec![0u8; payload.len()];
    let n = ops::read(&Libc, fd, buf.as_mut_ptr(), buf.len());
    assert_eq!(n, payload.len() as isize);
    assert_eq!(&buf, payload);
    assert_eq!(ops::close(&Libc, fd), 0);

    // stat reports success for a file that exists.
    assert_eq!(ops::stat(&path_bytes(&file_path)), 0);

    // a large write exercises the chunking path (>4084 bytes per frame).
    let big = vec![0xABu8; 10_000];
    let fd = ops::open(
        &path_bytes(&file_path),
        libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC,
        0o644,
    );
    let n = ops::write(&Libc, fd, big.as_ptr(), big.len());
    assert_eq!(n, big.len() as isize);
    assert_eq!(ops::close(&Libc, fd), 0);

    let fd = ops::open(&path_bytes(&file_path), libc::O_RDONLY, 0);
    let mut readback = vec![0u8; big.len()];
    let n = ops::read(&Libc, fd, readback.as_mut_ptr(), readback.len());
    assert_eq!(n, big.len() as isize);
    assert_eq!(readback, big);
    assert_eq!(ops::close(&Libc, fd), 0);

    // getdirtree reflects real subdirectories, not files.
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let tree = ops::getdirtree(&path_bytes(dir.path()));
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].name, b"sub");
    ops::freedirtree(tree);

    // getdirentries on an open directory fd returns raw entries; the
    // caller's basep is left untouched (Open Question 3).
    let dir_fd = ops::open(&path_bytes(dir.path()), libc::O_RDONLY, 0);
    let mut dirent_buf = vec![0u8; 4096];
    let mut basep: i64 = 0;
    let n = ops::getdirentries(
        &Libc,
        dir_fd,
        dirent_buf.as_mut_ptr(),
        dirent_buf.len(),
        &mut basep,
    );
    assert!(n > 0, "expected at least one directory entry's worth of bytes");
    assert_eq!(basep, 0, "basep is never written back by the shim");
    assert_eq!(ops::close(&Libc, dir_fd), 0);

    // unlink removes the file; a second stat then fails with ENOENT.
    assert_eq!(ops::unlink(&path_bytes(&file_path)), 0);
    assert_eq!(ops::stat(&path_bytes(&file_path)), -1);
    assert_eq!(remotefs_shim::errno::get_errno(), libc::ENOENT);
}
