//! Directory enumeration for plain paths and content-provider document trees.
//!
//! Enumeration never fails from the caller's point of view: errors are logged
//! and whatever was collected up to that point is returned.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::media::{DirectoryReference, ImageItem, ImageList};
use crate::uri;

/// Extensions (lowercase, without dot) shown from plain directories.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// One row of a document-tree children query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDocument {
    pub document_id: String,
    pub mime_type: Option<String>,
}

/// Rows of a children query, in provider order.
pub type ChildRows<'a> = Box<dyn Iterator<Item = Result<ChildDocument>> + 'a>;

/// Read-only access to a content-provider document tree.
pub trait DocumentTree {
    /// Query the immediate children of `tree_uri`.
    fn children(&self, tree_uri: &str) -> Result<ChildRows<'_>>;

    /// URI of the document `document_id` inside `tree_uri`.
    fn document_uri(&self, tree_uri: &str, document_id: &str) -> String;
}

/// Return `true` if `path` has one of [`IMAGE_EXTENSIONS`] (ASCII case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Enumerate the images directly inside `reference`.
pub fn list_images(reference: &DirectoryReference, tree: &dyn DocumentTree) -> ImageList {
    let images = match reference {
        DirectoryReference::PlainPath(path) => list_plain(path),
        DirectoryReference::ContentTree(uri) => list_tree(uri, tree),
    };
    info!(source = %reference, count = images.len(), "enumerated images");
    images
}

fn list_plain(dir: &Path) -> ImageList {
    let mut out = Vec::new();
    let dir = match std::path::absolute(dir) {
        Ok(dir) => dir,
        Err(err) => {
            error!(dir = %dir.display(), "resolving directory failed: {err}");
            return out.into();
        }
    };
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!(dir = %dir.display(), "listing directory failed: {err}");
                break;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            debug!(path = %path.display(), "image");
            out.push(ImageItem::from_path(path));
        }
    }
    out.into()
}

fn list_tree(tree_uri: &str, tree: &dyn DocumentTree) -> ImageList {
    let mut out = Vec::new();
    let rows = match tree.children(tree_uri) {
        Ok(rows) => rows,
        Err(err) => {
            error!(tree = tree_uri, "querying document tree failed: {err:#}");
            return out.into();
        }
    };
    for row in rows {
        let child = match row {
            Ok(child) => child,
            Err(err) => {
                error!(tree = tree_uri, "reading document tree row failed: {err:#}");
                break;
            }
        };
        if child
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
        {
            out.push(ImageItem::new(
                tree.document_uri(tree_uri, &child.document_id),
            ));
        }
    }
    out.into()
}

/// Guess a MIME type from a file name's extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(OsStr::to_str)?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "mp4" => "video/mp4",
        "pdf" => "application/pdf",
        _ => return None,
    })
}

/// [`DocumentTree`] over a local directory.
///
/// `content://<authority>/tree/<id>` maps to `<root>/<id>`, where `<id>` is a
/// percent-encoded path relative to `root` (empty for the root itself).
/// Child document ids are relative paths in the same form.
#[derive(Debug, Clone)]
pub struct FsDocumentTree {
    authority: String,
    root: PathBuf,
}

impl FsDocumentTree {
    pub fn new(authority: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            authority: authority.into(),
            root: root.into(),
        }
    }

    /// Tree URI naming `relative` (a path under the root).
    pub fn tree_uri(&self, relative: &str) -> String {
        format!(
            "content://{}/tree/{}",
            self.authority,
            uri::encode_segment(relative)
        )
    }

    fn resolve_tree(&self, tree_uri: &str) -> Result<(String, PathBuf)> {
        let prefix = format!("content://{}/", self.authority);
        if !tree_uri.starts_with(&prefix) {
            bail!("{tree_uri} is not served by {}", self.authority);
        }
        let segments = uri::path_segments(tree_uri);
        let Some((first, rest)) = segments.split_first() else {
            bail!("no path in {tree_uri}");
        };
        if first != "tree" {
            bail!("{tree_uri} is not a tree URI");
        }
        let id = rest.join("/");
        if id.split('/').any(|part| part == "..") {
            bail!("{tree_uri} escapes the tree root");
        }
        Ok((id.clone(), self.root.join(&id)))
    }
}

impl DocumentTree for FsDocumentTree {
    fn children(&self, tree_uri: &str) -> Result<ChildRows<'_>> {
        let (parent_id, dir) = self.resolve_tree(tree_uri)?;
        let entries =
            fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))?;
        Ok(Box::new(entries.map(move |entry| -> Result<ChildDocument> {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let document_id = if parent_id.is_empty() {
                name
            } else {
                format!("{parent_id}/{name}")
            };
            let mime_type = if entry.file_type()?.is_dir() {
                Some("vnd.android.document/directory")
            } else {
                mime_type_for(&entry.path())
            };
            Ok(ChildDocument {
                document_id,
                mime_type: mime_type.map(str::to_owned),
            })
        })))
    }

    fn document_uri(&self, tree_uri: &str, document_id: &str) -> String {
        let tree = tree_uri.split(['?', '#']).next().unwrap_or(tree_uri);
        format!(
            "{}/document/{}",
            tree.trim_end_matches('/'),
            uri::encode_segment(document_id)
        )
    }
}
