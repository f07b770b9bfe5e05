//! Asset existence queries.
//!
//! The game core never loads pixels. It only asks the rendering collaborator whether
//! an image is present under a key and how large it is; everything else is derived
//! from configuration.

use std::collections::HashMap;

use glam::UVec2;

use crate::animation::AnimState;
use crate::direction::Direction;

/// Answers "does this image exist, and what are its dimensions?" for a string key.
pub trait AssetProbe {
    /// Returns the pixel size of the image registered under `key`, if any.
    fn image_size(&self, key: &str) -> Option<UVec2>;

    fn exists(&self, key: &str) -> bool {
        self.image_size(key).is_some()
    }
}

/// Builds the image key for a class prefix, state and optional facing.
///
/// Directional images are `{prefix}_{state}_{direction}`, the others `{prefix}_{state}`.
pub fn image_key(prefix: &str, state: AnimState, direction: Option<Direction>) -> String {
    match direction {
        Some(direction) => format!("{prefix}_{state}_{}", direction.name()),
        None => format!("{prefix}_{state}"),
    }
}

/// An in-memory table of known images, used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    images: HashMap<String, UVec2>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, width: u32, height: u32) {
        self.images.insert(key.into(), UVec2::new(width, height));
    }

    pub fn with_image(mut self, key: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(key, width, height);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<UVec2> {
        self.images.remove(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetProbe for AssetCatalog {
    fn image_size(&self, key: &str) -> Option<UVec2> {
        self.images.get(key).copied()
    }
}
