//! Model library for the Full graphics preset
//!
//! Models are small sets of flat parts described in `assets/models.json`,
//! embedded at build time. A model that is missing or fails to parse is never
//! fatal: callers fall back to a primitive placeholder.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Embedded model library
const MODELS_JSON: &str = include_str!("../assets/models.json");

/// Asset loading failures
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The library document could not be parsed
    Parse(String),
    /// No model with this name
    MissingModel(String),
    /// The model exists but has nothing to draw
    EmptyModel(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Parse(e) => write!(f, "failed to parse model library: {}", e),
            AssetError::MissingModel(name) => write!(f, "model '{}' not found", name),
            AssetError::EmptyModel(name) => write!(f, "model '{}' has no parts", name),
        }
    }
}

impl std::error::Error for AssetError {}

/// Flat shape of a model part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartShape {
    /// Axis-aligned box; `size` holds the half extents
    Rect,
    /// Ellipse; `size` holds the radii
    Circle,
    /// Base centred on `offset`, apex at `offset + size`, base half-width `base`
    Triangle,
}

fn default_base() -> f32 {
    0.5
}

/// One part of a model, in model units (scaled by the node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPart {
    pub shape: PartShape,
    pub offset: [f32; 2],
    pub size: [f32; 2],
    #[serde(default = "default_base")]
    pub base: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

/// Named models
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetLibrary {
    models: HashMap<String, Model>,
}

impl AssetLibrary {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(|e| AssetError::Parse(e.to_string()))
    }

    /// The library shipped with the game, or an empty one if it is broken
    pub fn embedded() -> Self {
        match Self::from_json(MODELS_JSON) {
            Ok(library) => {
                log::info!("Loaded {} models", library.len());
                library
            }
            Err(e) => {
                log::warn!("{}; using primitive shapes", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn model(&self, name: &str) -> Result<&Model, AssetError> {
        let model = self
            .models
            .get(name)
            .ok_or_else(|| AssetError::MissingModel(name.to_string()))?;
        if model.parts.is_empty() {
            return Err(AssetError::EmptyModel(name.to_string()));
        }
        Ok(model)
    }
}
