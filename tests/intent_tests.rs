use std::fs;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE};
use slide_show::intent::{Action, Intent, resolve_directory};
use slide_show::media::DirectoryReference;

fn fs_uri(dir: &str, file: &str) -> String {
    format!(
        "content://com.ghostsq.commander.FileProvider/FS/{}/{file}",
        STANDARD.encode(dir)
    )
}

#[test]
fn view_decodes_embedded_directory() {
    let uri = format!(
        "content://pkg/FS/{}/file.jpg",
        STANDARD.encode("/storage/emulated/0/Pictures")
    );
    assert_eq!(
        resolve_directory(&Action::View, Some(&uri), None),
        Some(DirectoryReference::PlainPath(PathBuf::from(
            "/storage/emulated/0/Pictures"
        )))
    );
}

#[test]
fn view_rejects_non_base64_segment() {
    assert_eq!(
        resolve_directory(
            &Action::View,
            Some("content://pkg/FS/not-base64/file.jpg"),
            None
        ),
        None
    );
}

#[test]
fn unpadded_encoding_is_accepted() {
    let uri = format!(
        "content://pkg/FS/{}/a.png",
        STANDARD_NO_PAD.encode("/sdcard/DCIM")
    );
    assert_eq!(
        Intent::view(uri).resolve_directory(),
        Some(DirectoryReference::PlainPath("/sdcard/DCIM".into()))
    );
}

#[test]
fn url_safe_alphabet_is_rejected() {
    // "/a?>" encodes to "L2E/Pg==" in the standard alphabet and "L2E_Pg==" url-safe.
    let dir = "/a?>";
    assert!(STANDARD.encode(dir).contains('/'));
    let url_safe = format!("content://pkg/FS/{}/x.jpg", URL_SAFE.encode(dir));
    assert_eq!(Intent::view(url_safe).resolve_directory(), None);
}

#[test]
fn slash_inside_encoding_still_splits_on_last_slash() {
    let dir = "/a?>";
    assert_eq!(
        Intent::view(fs_uri(dir, "x.jpg")).resolve_directory(),
        Some(DirectoryReference::PlainPath(dir.into()))
    );
}

#[test]
fn percent_encoded_padding_is_decoded_first() {
    let encoded = STANDARD.encode("/storage/x");
    assert!(encoded.ends_with('='));
    let uri = format!(
        "content://pkg/FS/{}/f.jpg",
        encoded.replace('=', "%3D")
    );
    assert_eq!(
        Intent::view(uri).resolve_directory(),
        Some(DirectoryReference::PlainPath("/storage/x".into()))
    );
}

#[test]
fn send_uses_stream_extra() {
    let stream = fs_uri("/storage/emulated/0/Download", "b.webp");
    let intent = Intent::send(stream.clone());
    assert_eq!(
        intent.resolve_directory(),
        Some(DirectoryReference::PlainPath(
            "/storage/emulated/0/Download".into()
        ))
    );
    // The data field is not consulted for send.
    assert_eq!(resolve_directory(&Action::Send, Some(&stream), None), None);
}

#[test]
fn other_actions_are_unrecognized() {
    let uri = fs_uri("/storage", "x.jpg");
    for action in [Action::Main, Action::Other("edit".into())] {
        assert_eq!(resolve_directory(&action, Some(&uri), Some(&uri)), None);
    }
}

#[test]
fn invalid_utf8_directory_is_rejected() {
    let uri = format!("content://pkg/FS/{}/x.jpg", STANDARD.encode(b"/\xff\xfe"));
    assert_eq!(Intent::view(uri).resolve_directory(), None);
}

#[test]
fn decoded_directory_need_not_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("missing");
    assert!(fs::metadata(&missing).is_err());
    let uri = fs_uri(missing.to_str().unwrap(), "x.jpg");
    assert_eq!(
        Intent::view(uri).resolve_directory(),
        Some(DirectoryReference::PlainPath(missing))
    );
}
