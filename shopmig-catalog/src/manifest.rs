use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// Which field of the product export an image reference came from. Each class
/// gets its own directory subtree on the target so the rebuilt layout matches
/// what the shop software expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceClass {
    /// `img` tags embedded in the rich-text description.
    Editor,
    Big,
    Medium,
    Small,
    Tiny,
    /// Entries of the pipe-delimited extra images column.
    Extra,
}

impl ReferenceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceClass::Editor => "editor",
            ReferenceClass::Big => "big",
            ReferenceClass::Medium => "medium",
            ReferenceClass::Small => "small",
            ReferenceClass::Tiny => "tiny",
            ReferenceClass::Extra => "extra",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "editor" => Some(ReferenceClass::Editor),
            "big" => Some(ReferenceClass::Big),
            "medium" => Some(ReferenceClass::Medium),
            "small" => Some(ReferenceClass::Small),
            "tiny" => Some(ReferenceClass::Tiny),
            "extra" => Some(ReferenceClass::Extra),
            _ => None,
        }
    }
}

/// One image occurrence extracted from a product record. `directory_key` is
/// the partition the file must land in under its class directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub class: ReferenceClass,
    pub directory_key: String,
    pub url: String,
}

impl ImageRef {
    pub fn new(
        class: ReferenceClass,
        directory_key: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            class,
            directory_key: directory_key.into(),
            url: url.into(),
        }
    }
}

/// Deduplicated download plan: class -> directory key -> unique URLs. Folded
/// from the normalizer's reference stream in one pass and read-only after
/// that. Buckets are sets, so folding the same export twice, or the same rows
/// in any order, produces an identical manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    buckets: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: ImageRef) {
        self.buckets
            .entry(image.class.as_str().to_string())
            .or_default()
            .entry(image.directory_key)
            .or_default()
            .insert(image.url);
    }

    pub fn extend(&mut self, images: impl IntoIterator<Item = ImageRef>) {
        for image in images {
            self.insert(image);
        }
    }

    /// All `(class, directory key, urls)` buckets, deterministically ordered.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &str, &BTreeSet<String>)> {
        self.buckets.iter().flat_map(|(class, dirs)| {
            dirs.iter()
                .map(move |(key, urls)| (class.as_str(), key.as_str(), urls))
        })
    }

    pub fn bucket(&self, class: ReferenceClass, directory_key: &str) -> Option<&BTreeSet<String>> {
        self.buckets.get(class.as_str())?.get(directory_key)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.values().map(|dirs| dirs.len()).sum()
    }

    pub fn url_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|dirs| dirs.values())
            .map(|urls| urls.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), buckets = self.bucket_count(), urls = self.url_count(), "saved asset manifest");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
