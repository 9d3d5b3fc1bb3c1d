use std::fs;
use std::path::PathBuf;

use slide_show::config::{Configuration, DEFAULT_TREE_AUTHORITY, Preferences};
use slide_show::error::ConfigError;
use tempfile::tempdir;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
slide-duration: "3000"
start-directory: "/photos"
storage-access: false
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.slide_duration, "3000");
    assert_eq!(cfg.start_directory, Some(PathBuf::from("/photos")));
    assert!(!cfg.storage_access);
    assert_eq!(cfg.tree_authority, DEFAULT_TREE_AUTHORITY);
}

#[test]
fn numeric_slide_duration_is_kept_as_text() {
    let cfg: Configuration = serde_yaml::from_str("slide-duration: 750\n").unwrap();
    assert_eq!(cfg.slide_duration_text(), "750");
}

#[test]
fn unusable_slide_duration_still_loads() {
    let cfg: Configuration = serde_yaml::from_str("slide-duration: abc\n").unwrap();
    assert_eq!(cfg.slide_duration, "abc");
    assert!(cfg.validated().is_ok());
}

#[test]
fn empty_document_uses_defaults() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.slide_duration, "5000");
    assert!(cfg.storage_access);
    assert_eq!(cfg.start_directory, None);
}

#[test]
fn tree_root_must_be_a_directory() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");
    let cfg = Configuration {
        tree_root: Some(missing.clone()),
        ..Configuration::default()
    };
    assert_eq!(cfg.validated().unwrap_err(), ConfigError::TreeRoot(missing));
}

#[test]
fn from_yaml_file_reads_and_reports_path() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("slide-show.yaml");
    fs::write(&path, "slide-duration: 1000\ntree-authority: local\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.slide_duration, "1000");
    assert_eq!(cfg.tree_authority, "local");

    let err = Configuration::from_yaml_file(tmp.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}
