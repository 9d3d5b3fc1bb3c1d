//! Decoding of "open with" / "send to" requests from a file manager.
//!
//! The only URI shape understood here is the one the file manager's file
//! provider emits:
//!
//! ```text
//! content://<authority>/FS/<base64(directory)>/<file name>
//! ```
//!
//! The directory is standard-alphabet base64 of the UTF-8 absolute path.
//! Anything else is reported as unrecognized.

use std::fmt;
use std::path::PathBuf;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;

use crate::media::DirectoryReference;
use crate::uri;

const FS_PREFIX: &str = "/FS/";

const FS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// What the caller asked us to do with the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Plain launch; no data to interpret.
    Main,
    /// "Open with": the image is in `data`.
    View,
    /// "Send to": the image is in the stream extra.
    Send,
    Other(String),
}

impl Action {
    /// Map a platform action string (`android.intent.action.VIEW`, or just `view`).
    pub fn parse(raw: &str) -> Self {
        let short = raw.rsplit('.').next().unwrap_or(raw);
        match short.to_ascii_lowercase().as_str() {
            "main" => Self::Main,
            "view" => Self::View,
            "send" => Self::Send,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

/// An external request to show something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub action: Action,
    pub data: Option<String>,
    pub extra_stream: Option<String>,
}

impl Intent {
    pub fn main() -> Self {
        Self {
            action: Action::Main,
            data: None,
            extra_stream: None,
        }
    }

    pub fn view(data: impl Into<String>) -> Self {
        Self {
            action: Action::View,
            data: Some(data.into()),
            extra_stream: None,
        }
    }

    pub fn send(stream: impl Into<String>) -> Self {
        Self {
            action: Action::Send,
            data: None,
            extra_stream: Some(stream.into()),
        }
    }

    /// Scheme of the URI carried by the request (`content`, `file`, ...).
    pub fn scheme(&self) -> Option<&str> {
        self.data
            .as_deref()
            .or(self.extra_stream.as_deref())
            .and_then(uri::scheme)
    }

    pub fn resolve_directory(&self) -> Option<DirectoryReference> {
        resolve_directory(
            &self.action,
            self.data.as_deref(),
            self.extra_stream.as_deref(),
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Intent {{ act={:?}", self.action)?;
        if let Some(data) = &self.data {
            write!(f, " dat={data}")?;
        }
        if let Some(stream) = &self.extra_stream {
            write!(f, " stream={stream}")?;
        }
        f.write_str(" }")
    }
}

/// Turn a view/send request into the directory it points into.
///
/// Returns `None` for every other action and for any URI that is not in the
/// `/FS/<base64>/<file>` shape; the caller reports that as unrecognized.
pub fn resolve_directory(
    action: &Action,
    data: Option<&str>,
    extra_stream: Option<&str>,
) -> Option<DirectoryReference> {
    let uri = match action {
        Action::View => data?,
        Action::Send => extra_stream?,
        Action::Main | Action::Other(_) => return None,
    };
    directory_from_fs_uri(uri).map(DirectoryReference::PlainPath)
}

/// Extract the base64-encoded directory from a `/FS/` file-provider URI.
pub fn directory_from_fs_uri(uri: &str) -> Option<PathBuf> {
    let path = uri::path(uri)?;
    let encoded_and_file = path.strip_prefix(FS_PREFIX)?;
    let (encoded_dir, _file) = encoded_and_file.rsplit_once('/')?;

    let bytes = FS_ENGINE.decode(encoded_dir).ok()?;
    let dir = String::from_utf8(bytes).ok()?;
    if !dir.starts_with('/') {
        return None;
    }
    debug!(directory = %dir, "decoded file-provider directory");
    Some(PathBuf::from(dir))
}

/// True for document-tree URIs: first path segment `tree`, at least two segments.
pub fn is_tree_uri(uri: &str) -> bool {
    let segments = uri::path_segments(uri);
    segments.len() >= 2 && segments[0] == "tree"
}
