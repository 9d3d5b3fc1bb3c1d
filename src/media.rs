//! Core value types shared by the enumerator, the interpreter and the driver.

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::uri;

/// Reference to one displayable image, as a URI string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageItem(String);

impl ImageItem {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` item for a local path. `path` should be absolute.
    pub fn from_path(path: &Path) -> Self {
        Self(uri::file_uri(path))
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, immutable snapshot of one directory scan.
///
/// Cloning is cheap; a re-scan produces a new list rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageList(Arc<[ImageItem]>);

impl ImageList {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Vec<ImageItem>> for ImageList {
    fn from(items: Vec<ImageItem>) -> Self {
        Self(items.into())
    }
}

impl FromIterator<ImageItem> for ImageList {
    fn from_iter<I: IntoIterator<Item = ImageItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for ImageList {
    type Target = [ImageItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Where a show's images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryReference {
    /// A directory on the local filesystem.
    PlainPath(PathBuf),
    /// A content-provider document tree, e.g. `content://authority/tree/primary%3APictures`.
    ContentTree(String),
}

impl fmt::Display for DirectoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainPath(path) => write!(f, "{}", path.display()),
            Self::ContentTree(uri) => f.write_str(uri),
        }
    }
}
