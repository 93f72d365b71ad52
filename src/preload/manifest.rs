//! Image sets keyed by probe angle and tail position
//!
//! The page may define `imageSetsByAngleAndTail`, a JSON object mapping a
//! composite key (e.g. `"30_left"`) to the images shown for that pose.
//! Every image in it is preloaded after the base assets.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Name of the page global holding the image sets
pub const IMAGE_SETS_GLOBAL: &str = "imageSetsByAngleAndTail";

/// Composite pose key to image paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSets(pub BTreeMap<String, Vec<String>>);

impl ImageSets {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Images for one pose
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Total image count across all poses (duplicates included)
    pub fn image_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Base assets followed by every image in `sets` (key order), each path once
pub fn asset_list(base: &[String], sets: Option<&ImageSets>) -> Vec<String> {
    let mut seen = HashSet::new();
    let extra = sets.into_iter().flat_map(|s| s.0.values().flatten());

    let mut assets = Vec::with_capacity(base.len());
    for path in base.iter().chain(extra) {
        if !path.is_empty() && seen.insert(path.as_str()) {
            assets.push(path.clone());
        }
    }
    assets
}
