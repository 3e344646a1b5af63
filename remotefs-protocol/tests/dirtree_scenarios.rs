use remotefs_protocol::DirTree;

/// A directory `a` containing two empty subdirectories `b` and `c`
/// serializes/deserializes to a tree with `num_subdirs == 2` and two
/// childless children.
#[test]
fn getdirtree_two_empty_subdirs() {
    let tree = DirTree::new(
        "a",
        vec![DirTree::new("b", vec![]), DirTree::new("c", vec![])],
    );

    let wire = tree.serialize();
    let decoded = DirTree::deserialize(&wire).expect("well-formed tree decodes");

    assert_eq!(decoded.name, b"a");
    assert_eq!(decoded.num_subdirs(), 2);
    assert_eq!(decoded.children[0].name, b"b");
    assert_eq!(decoded.children[0].num_subdirs(), 0);
    assert_eq!(decoded.children[1].name, b"c");
    assert_eq!(decoded.children[1].num_subdirs(), 0);
}

#[test]
fn round_trip_law_holds_for_arbitrary_nul_free_names() {
    let tree = DirTree::new(
        "project",
        vec![
            DirTree::new("src", vec![DirTree::new("bin", vec![])]),
            DirTree::new("target", vec![]),
            DirTree::new(".git", vec![DirTree::new("objects", vec![])]),
        ],
    );

    let wire = tree.serialize();
    assert_eq!(DirTree::deserialize(&wire).unwrap(), tree);
}
