use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::emotion::EmotionLabel;

/// Placeholder text the chat pipeline stores alongside an emoji message.
pub const STICKER_PLACEHOLDER: &str = "[表情]";

#[derive(Debug, Error)]
pub enum AssetPoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<AssetPoolError>,
    },
}

/// Caller-owned sticker catalogue, grouped by emotion.
///
/// Asset identifiers are opaque to the engine. A label may be missing or map
/// to an empty group; both simply mean "nothing to send" for that label.
///
/// RON shape:
/// ```ron
/// (
///     groups: { praise: ["praise_clap", "praise_thumbs"], neutral: ["neutral_wave"] },
///     sources: { "praise_clap": "stickers/praise_clap.png" },
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetPool {
    #[serde(default)]
    pub groups: FxHashMap<EmotionLabel, Vec<String>>,
    /// Optional asset key → renderable source (path or URI).
    #[serde(default)]
    pub sources: FxHashMap<String, String>,
}

impl AssetPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style group insertion, mostly for tests and embedding.
    pub fn with_group<I, S>(mut self, label: EmotionLabel, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_group(label, assets);
        self
    }

    /// Replace the group for `label`.
    pub fn insert_group<I, S>(&mut self, label: EmotionLabel, assets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(label, assets.into_iter().map(Into::into).collect());
    }

    pub fn insert_source(&mut self, key: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(key.into(), source.into());
    }

    /// The group registered for `label`, if any. An empty group is still `Some`.
    pub fn group(&self, label: EmotionLabel) -> Option<&[String]> {
        self.groups.get(&label).map(Vec::as_slice)
    }

    pub fn source_for(&self, key: &str) -> Option<&str> {
        self.sources.get(key).map(String::as_str)
    }

    /// Labels with no assets at all, whether missing or empty, in sampling order.
    pub fn empty_labels(&self) -> Vec<EmotionLabel> {
        EmotionLabel::ALL
            .into_iter()
            .filter(|label| self.group(*label).map_or(true, <[String]>::is_empty))
            .collect()
    }

    pub fn total_assets(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Load a pool from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<AssetPool, AssetPoolError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Load a pool file, or every `.ron` file in a directory merged in
    /// file-name order. The first file that fails to load fails the whole
    /// directory.
    pub fn load_from_path(path: &Path) -> Result<AssetPool, AssetPoolError> {
        if !path.is_dir() {
            return Self::load_from_ron(path);
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file = entry?.path();
            if file.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(file);
            }
        }
        files.sort();

        let mut pool = AssetPool::new();
        for file in files {
            let loaded = Self::load_from_ron(&file).map_err(|e| AssetPoolError::InFile {
                path: file.clone(),
                source: Box::new(e),
            })?;
            pool.merge(loaded);
        }
        Ok(pool)
    }

    /// Parse a pool from a RON string.
    pub fn parse_ron(input: &str) -> Result<AssetPool, AssetPoolError> {
        Ok(ron::from_str(input)?)
    }

    /// Merge another pool into this one. Groups and sources from `other`
    /// replace entries with the same key.
    pub fn merge(&mut self, other: AssetPool) {
        self.groups.extend(other.groups);
        self.sources.extend(other.sources);
    }
}

/// A sticker chosen for a message, ready for the chat pipeline to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerAttachment {
    pub media_key: String,
    pub source: Option<String>,
    pub placeholder: String,
}

impl StickerAttachment {
    pub fn new(media_key: &str, pool: &AssetPool) -> Self {
        Self {
            media_key: media_key.to_string(),
            source: pool.source_for(media_key).map(str::to_string),
            placeholder: STICKER_PLACEHOLDER.to_string(),
        }
    }
}
