//! Just enough URI handling for `file://` and `content://` references.

use std::borrow::Cow;
use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

/// Characters left as-is inside one path segment.
pub const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Scheme of `uri`, if it has one.
pub fn scheme(uri: &str) -> Option<&str> {
    uri.split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| is_scheme(scheme))
}

/// Raw (still percent-encoded) path of a URI: scheme and authority stripped,
/// query and fragment dropped.
pub fn raw_path(uri: &str) -> Option<&str> {
    let rest = match scheme(uri) {
        Some(scheme) => &uri[scheme.len() + 1..],
        None => uri,
    };
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            let start = authority_and_path.find('/')?;
            &authority_and_path[start..]
        }
        None => rest,
    };
    (!path.is_empty()).then_some(path)
}

/// Decoded path of a URI.
pub fn path(uri: &str) -> Option<String> {
    raw_path(uri).map(|raw| decode(raw).into_owned())
}

/// Non-empty path segments, split first and then decoded one by one, so an
/// encoded `%2F` stays inside its segment.
pub fn path_segments(uri: &str) -> Vec<String> {
    raw_path(uri)
        .map(|raw| {
            raw.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| decode(s).into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve `%XX` escapes; malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8_lossy()
}

pub fn encode_segment(s: &str) -> String {
    percent_encode(s.as_bytes(), PATH_SEGMENT).to_string()
}

/// `file://` URI for `path`, each segment percent-encoded byte for byte.
pub fn file_uri(path: &Path) -> String {
    let encoded: Vec<String> = path
        .as_os_str()
        .as_encoded_bytes()
        .split(|b| *b == b'/')
        .map(|segment| percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("file://{}", encoded.join("/"))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
