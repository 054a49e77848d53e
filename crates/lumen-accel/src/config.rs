//! Acceleration structure configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AccelError, Result};

/// Largest leaf capacity accepted by [`BvhConfig::validate`].
pub const MAX_LEAF_CAPACITY: usize = 64;

/// Traversal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Pointer tree traversed recursively.
    #[default]
    Tree,
    /// Index array traversed with an explicit stack.
    Flat,
}

/// How primitives are grouped into leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafLayout {
    /// One primitive per leaf. Spans of one primitive get twin leaves.
    #[default]
    Binary,
    /// Up to `leaf_capacity` primitives per leaf.
    Packed,
}

/// BVH build parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhConfig {
    /// Traversal backend.
    pub backend: Backend,
    /// Leaf layout.
    pub leaf_layout: LeafLayout,
    /// Maximum primitives per leaf in the packed layout.
    pub leaf_capacity: usize,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Tree,
            leaf_layout: LeafLayout::Binary,
            leaf_capacity: 8,
        }
    }
}

impl BvhConfig {
    /// Packed layout with the given capacity on the given backend.
    pub fn packed(backend: Backend, leaf_capacity: usize) -> Self {
        Self {
            backend,
            leaf_layout: LeafLayout::Packed,
            leaf_capacity,
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.leaf_capacity == 0 || self.leaf_capacity > MAX_LEAF_CAPACITY {
            return Err(AccelError::InvalidConfig(format!(
                "leaf_capacity must be between 1 and {MAX_LEAF_CAPACITY}, got {}",
                self.leaf_capacity
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AccelError::InvalidConfig(e.to_string()))
    }
}
