//! Recursive directory-tree (de)serialization.
//!
//! Only subdirectories are represented: a node's `children` are its
//! immediate subdirectories, and its implicit child count is
//! `children.len()`. Regular files never appear in the tree.
use std::io;

/// A labelled rose tree node: a directory name plus its ordered immediate
/// subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTree {
    pub name: Vec<u8>,
    pub children: Vec<DirTree>,
}

impl DirTree {
    pub fn new(name: impl Into<Vec<u8>>, children: Vec<DirTree>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn num_subdirs(&self) -> usize {
        self.children.len()
    }

    /// Pre-order serialize: `name | NUL | num_children:u32(LE) | children...`.
    ///
    /// The name is NUL-delimited rather than length-prefixed; callers
    /// must never pass a name containing an embedded NUL.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    fn serialize_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.name);
        buf.push(0);
        buf.extend_from_slice(&(self.children.len() as u32).to_le_bytes());
        for child in &self.children {
            child.serialize_into(buf);
        }
    }

    /// Deserialize a complete pre-order encoding. Errors if the buffer is
    /// malformed (missing NUL delimiter, truncated count, or fewer child
    /// encodings than announced).
    pub fn deserialize(buf: &[u8]) -> io::Result<Self> {
        let (node, consumed) = Self::deserialize_node(buf)?;
        if consumed != buf.len() {
            return Err(truncated("trailing bytes after directory tree"));
        }
        Ok(node)
    }

    fn deserialize_node(buf: &[u8]) -> io::Result<(Self, usize)> {
        let nul_at = buf
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| truncated("missing NUL delimiter in directory tree name"))?;
        let name = buf[..nul_at].to_vec();
        let mut offset = nul_at + 1;

        let count_bytes = buf
            .get(offset..offset + 4)
            .ok_or_else(|| truncated("missing child count in directory tree"))?;
        let num_children = u32::from_le_bytes(count_bytes.try_into().unwrap()) as usize;
        offset += 4;

        let mut children = Vec::with_capacity(num_children);
        for _ in 0..num_children {
            let (child, used) = Self::deserialize_node(&buf[offset..])?;
            offset += used;
            children.push(child);
        }

        Ok((DirTree { name, children }, offset))
    }
}

fn truncated(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test]
    fn round_trips_leaf() {
        let t = DirTree::new("a", vec![]);
        let bytes = t.serialize();
        assert_eq!(DirTree::deserialize(&bytes).unwrap(), t);
    }

    #[test]
    fn round_trips_nested_tree() {
        let t = DirTree::new(
            "a",
            vec![DirTree::new("b", vec![]), DirTree::new("c", vec![])],
        );
        let bytes = t.serialize();
        let back = DirTree::deserialize(&bytes).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.num_subdirs(), 2);
    }

    #[test]
    fn round_trips_deeply_nested_tree() {
        let t = DirTree::new(
            "root",
            vec![DirTree::new(
                "mid",
                vec![DirTree::new("leaf", vec![DirTree::new("deepest", vec![])])],
            )],
        );
        let bytes = t.serialize();
        assert_eq!(DirTree::deserialize(&bytes).unwrap(), t);
    }

    #[test_case(&[] ; "empty buffer")]
    #[test_case(&[b'a', b'b'] ; "no NUL delimiter")]
    #[test_case(&[0, 1, 2] ; "count truncated")]
    #[test]
    fn rejects_malformed_input(buf: &[u8]) {
        assert!(DirTree::deserialize(buf).is_err());
    }

    #[test]
    fn rejects_child_count_exceeding_buffer() {
        // Name "a", NUL, claims 5 children, but none follow.
        let mut buf = vec![b'a', 0];
        buf.extend_from_slice(&5u32.to_le_bytes());
        assert!(DirTree::deserialize(&buf).is_err());
    }
}
