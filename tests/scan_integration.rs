use std::fs;

use anyhow::{Result, anyhow};
use slide_show::media::{DirectoryReference, ImageItem};
use slide_show::scan::{ChildDocument, ChildRows, DocumentTree, FsDocumentTree, list_images};
use slide_show::uri;
use tempfile::{tempdir, tempdir_in};

/// Document tree that serves fixed rows and optionally fails part-way.
struct FakeTree {
    rows: Vec<(&'static str, Option<&'static str>)>,
    fail_after: Option<usize>,
    fail_query: bool,
}

impl FakeTree {
    fn new(rows: Vec<(&'static str, Option<&'static str>)>) -> Self {
        Self {
            rows,
            fail_after: None,
            fail_query: false,
        }
    }
}

impl DocumentTree for FakeTree {
    fn children(&self, _tree_uri: &str) -> Result<ChildRows<'_>> {
        if self.fail_query {
            return Err(anyhow!("provider crashed"));
        }
        let fail_after = self.fail_after;
        Ok(Box::new(self.rows.iter().enumerate().map(
            move |(i, (id, mime))| {
                if fail_after.is_some_and(|n| i >= n) {
                    return Err(anyhow!("cursor closed"));
                }
                Ok(ChildDocument {
                    document_id: (*id).to_owned(),
                    mime_type: mime.map(str::to_owned),
                })
            },
        )))
    }

    fn document_uri(&self, tree_uri: &str, document_id: &str) -> String {
        format!("{tree_uri}/document/{document_id}")
    }
}

const TREE: &str = "content://provider/tree/primary%3APictures";

fn tree_ref() -> DirectoryReference {
    DirectoryReference::ContentTree(TREE.to_owned())
}

#[test]
fn plain_directory_lists_only_matching_files() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    for name in ["a.jpg", "b.JPEG", "c.Png", "d.webp", "e.BMP"] {
        fs::write(dir.join(name), b"x").unwrap();
    }
    for name in ["notes.txt", "clip.mp4", "anim.gif", "jpg"] {
        fs::write(dir.join(name), b"x").unwrap();
    }
    fs::create_dir_all(dir.join("folder.jpg")).unwrap();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("nested").join("deep.jpg"), b"x").unwrap();

    let images = list_images(
        &DirectoryReference::PlainPath(dir.to_path_buf()),
        &FakeTree::new(vec![]),
    );

    let mut names: Vec<String> = images
        .iter()
        .map(|item| item.uri().rsplit('/').next().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.Png", "d.webp", "e.BMP"]);
    assert!(
        images
            .iter()
            .all(|item| item.uri().starts_with("file://")),
        "plain items are file URIs"
    );
}

#[test]
fn relative_directory_yields_absolute_file_uris() {
    let tmp = tempdir_in(".").unwrap();
    assert!(tmp.path().is_relative());
    fs::write(tmp.path().join("a.jpg"), b"x").unwrap();

    let images = list_images(
        &DirectoryReference::PlainPath(tmp.path().to_path_buf()),
        &FakeTree::new(vec![]),
    );

    assert_eq!(images.len(), 1);
    let item = images[0].uri();
    assert!(item.starts_with("file:///"), "{item}");
    let name = tmp.path().file_name().unwrap();
    let expected = std::env::current_dir().unwrap().join(name).join("a.jpg");
    assert_eq!(uri::path(item), Some(expected.to_string_lossy().into_owned()));
}

#[test]
fn reserved_characters_in_file_names_are_escaped() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("a#1.jpg"), b"x").unwrap();
    fs::write(tmp.path().join("b?2 c.png"), b"x").unwrap();

    let images = list_images(
        &DirectoryReference::PlainPath(tmp.path().to_path_buf()),
        &FakeTree::new(vec![]),
    );

    let mut paths: Vec<String> = images
        .iter()
        .map(|item| uri::path(item.uri()).unwrap())
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            tmp.path().join("a#1.jpg").to_string_lossy().into_owned(),
            tmp.path().join("b?2 c.png").to_string_lossy().into_owned(),
        ]
    );
    assert!(images.iter().any(|item| item.uri().ends_with("/a%231.jpg")));
}

#[test]
fn missing_directory_yields_empty_list() {
    let tmp = tempdir().unwrap();
    let images = list_images(
        &DirectoryReference::PlainPath(tmp.path().join("gone")),
        &FakeTree::new(vec![]),
    );
    assert!(images.is_empty());
}

#[test]
fn content_tree_keeps_image_mime_types_only() {
    let tree = FakeTree::new(vec![
        ("doc:1", Some("image/png")),
        ("doc:2", Some("text/plain")),
        ("doc:3", Some("image/jpeg")),
    ]);

    let images = list_images(&tree_ref(), &tree);

    assert_eq!(
        images.to_vec(),
        vec![
            ImageItem::new(format!("{TREE}/document/doc:1")),
            ImageItem::new(format!("{TREE}/document/doc:3")),
        ]
    );
}

#[test]
fn content_tree_skips_rows_without_mime_type() {
    let tree = FakeTree::new(vec![("doc:1", None), ("doc:2", Some("image/webp"))]);
    assert_eq!(list_images(&tree_ref(), &tree).len(), 1);
}

#[test]
fn content_tree_failure_mid_query_keeps_partial_results() {
    let mut tree = FakeTree::new(vec![
        ("doc:1", Some("image/png")),
        ("doc:2", Some("image/png")),
        ("doc:3", Some("image/png")),
    ]);
    tree.fail_after = Some(2);

    let images = list_images(&tree_ref(), &tree);
    assert_eq!(images.len(), 2);
}

#[test]
fn content_tree_query_failure_yields_empty_list() {
    let mut tree = FakeTree::new(vec![("doc:1", Some("image/png"))]);
    tree.fail_query = true;
    assert!(list_images(&tree_ref(), &tree).is_empty());
}

#[test]
fn fs_document_tree_serves_immediate_children() {
    let tmp = tempdir().unwrap();
    let album = tmp.path().join("album");
    fs::create_dir_all(album.join("sub")).unwrap();
    fs::write(album.join("one.png"), b"x").unwrap();
    fs::write(album.join("two.jpg"), b"x").unwrap();
    fs::write(album.join("readme.txt"), b"x").unwrap();
    fs::write(album.join("sub").join("three.jpg"), b"x").unwrap();

    let tree = FsDocumentTree::new("auth", tmp.path());
    let uri = tree.tree_uri("album");

    let mut uris: Vec<String> = list_images(&DirectoryReference::ContentTree(uri), &tree)
        .iter()
        .map(|item| item.uri().to_owned())
        .collect();
    uris.sort();
    assert_eq!(
        uris,
        vec![
            "content://auth/tree/album/document/album%2Fone.png".to_string(),
            "content://auth/tree/album/document/album%2Ftwo.jpg".to_string(),
        ]
    );
}

#[test]
fn fs_document_tree_unknown_authority_is_empty() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("one.png"), b"x").unwrap();
    let tree = FsDocumentTree::new("auth", tmp.path());
    let images = list_images(
        &DirectoryReference::ContentTree("content://elsewhere/tree/x".into()),
        &tree,
    );
    assert!(images.is_empty());
}
