use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Slide duration used when the preference is missing or unusable.
pub const DEFAULT_SLIDE_DURATION: Duration = Duration::from_millis(5000);

/// Default authority for the filesystem-backed document tree.
pub const DEFAULT_TREE_AUTHORITY: &str = "com.android.externalstorage.documents";

/// Source of user preferences read by the slideshow driver.
///
/// The slide duration is kept as the text the user typed; parsing it is the
/// driver's job so a bad value can fall back with a warning.
pub trait Preferences {
    fn slide_duration_text(&self) -> Cow<'_, str>;
}

impl Preferences for str {
    fn slide_duration_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Preferences for String {
    fn slide_duration_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Parse slide-duration text as a positive number of milliseconds.
pub fn parse_slide_duration(text: &str) -> Result<Duration, ConfigError> {
    match text.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::SlideDuration {
            value: text.to_owned(),
        }),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Time each image stays on screen, in milliseconds, as entered.
    #[serde(deserialize_with = "text_or_number")]
    pub slide_duration: String,
    /// Directory shown when no directory or intent is given on the command line.
    pub start_directory: Option<PathBuf>,
    /// Local directory that backs `content://<tree-authority>/tree/...` URIs.
    pub tree_root: Option<PathBuf>,
    pub tree_authority: String,
    /// Whether storage access has been granted.
    pub storage_access: bool,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&s).with_context(|| format!("parsing {}", path.display()))
    }

    /// Validate settings that must hold before anything is shown.
    ///
    /// The slide duration is deliberately not checked here; it falls back at
    /// show time instead.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if let Some(root) = &self.tree_root
            && !root.is_dir()
        {
            return Err(ConfigError::TreeRoot(root.clone()));
        }
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            slide_duration: DEFAULT_SLIDE_DURATION.as_millis().to_string(),
            start_directory: None,
            tree_root: None,
            tree_authority: DEFAULT_TREE_AUTHORITY.to_owned(),
            storage_access: true,
        }
    }
}

impl Preferences for Configuration {
    fn slide_duration_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.slide_duration)
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Text(s) => s,
    })
}
