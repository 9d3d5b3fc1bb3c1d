//! Turns external requests into a list of images ready to be shown.

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::ShowError;
use crate::intent::{Action, Intent, is_tree_uri};
use crate::media::{DirectoryReference, ImageList};
use crate::scan::{DocumentTree, list_images};

/// Whether storage may be read.
///
/// When this is `false` nothing is enumerated; the caller is expected to
/// obtain access and ask again.
pub trait StorageAccess {
    fn has_storage_access(&self) -> bool;
}

impl StorageAccess for bool {
    fn has_storage_access(&self) -> bool {
        *self
    }
}

impl StorageAccess for Configuration {
    fn has_storage_access(&self) -> bool {
        self.storage_access
    }
}

/// A directory together with the images found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub source: DirectoryReference,
    pub images: ImageList,
}

/// Handle an "open with" / "send to" request.
///
/// `Ok(None)` means the request was a plain launch with nothing to show.
pub fn handle_intent(
    intent: &Intent,
    access: &dyn StorageAccess,
    tree: &dyn DocumentTree,
) -> Result<Option<Show>, ShowError> {
    debug!(
        action = ?intent.action,
        data = ?intent.data,
        stream = ?intent.extra_stream,
        scheme = ?intent.scheme(),
        "received intent"
    );
    if intent.action == Action::Main {
        return Ok(None);
    }

    let Some(reference) = intent.resolve_directory() else {
        warn!(%intent, "intent not recognized");
        return Err(ShowError::UnrecognizedIntent(intent.to_string()));
    };
    if let DirectoryReference::PlainPath(dir) = &reference
        && !dir.is_dir()
    {
        warn!(%intent, dir = %dir.display(), "intent points at a missing directory");
        return Err(ShowError::UnrecognizedIntent(intent.to_string()));
    }

    open_directory(reference, access, tree).map(Some)
}

/// Enumerate a directory the user picked.
pub fn open_directory(
    reference: DirectoryReference,
    access: &dyn StorageAccess,
    tree: &dyn DocumentTree,
) -> Result<Show, ShowError> {
    if !access.has_storage_access() {
        info!(source = %reference, "storage access not granted; not enumerating");
        return Err(ShowError::PermissionRequired(reference.to_string()));
    }

    let images = list_images(&reference, tree);
    if images.is_empty() {
        return Err(ShowError::EmptyDirectory(reference.to_string()));
    }
    Ok(Show {
        source: reference,
        images,
    })
}

/// Classify a user-supplied location: tree URIs go to the provider, anything
/// else is a filesystem path.
pub fn directory_reference(location: &str) -> DirectoryReference {
    if is_tree_uri(location) {
        DirectoryReference::ContentTree(location.to_owned())
    } else {
        DirectoryReference::PlainPath(location.into())
    }
}
