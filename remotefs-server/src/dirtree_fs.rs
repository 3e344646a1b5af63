//! Builds a [`DirTree`] by walking the real filesystem.
//!
//! Only subdirectories are visited; regular files are skipped entirely, and
//! symlinks are not followed (`file_type` reports the link itself, which is
//! never `is_dir()`).
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use remotefs_protocol::DirTree;

pub fn build(path: &Path) -> io::Result<DirTree> {
    let name = path
        .file_name()
        .map(|n| n.as_bytes().to_vec())
        .unwrap_or_else(|| path.as_os_str().as_bytes().to_vec());

    let mut children = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            children.push(build(&entry.path())?);
        }
    }
    // read_dir's order is filesystem-dependent; sorting gives callers a
    // deterministic tree without changing what it contains.
    children.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(DirTree::new(name, children))
}
