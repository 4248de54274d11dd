//=========================================================================
// Asset Bundle
//=========================================================================
//
// Immutable set of loaded assets, looked up by name.
//
// Delivered through the readiness gate as `Arc<AssetBundle>`; states take
// what they need and share the rest. A lookup for an absent name is an
// error rather than a silent default.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::audio::SoundBuffer;
use crate::core::render::{Model, Texture};
use crate::error::AssetError;

//=== AssetBundle =========================================================

/// Named models, textures and sound buffers.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    models: HashMap<String, Arc<Model>>,
    textures: HashMap<String, Arc<Texture>>,
    sounds: HashMap<String, Arc<SoundBuffer>>,
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Builder ----------------------------------------------------------

    pub fn with_model(mut self, name: &str, model: Model) -> Self {
        self.models.insert(name.to_string(), Arc::new(model));
        self
    }

    pub fn with_texture(mut self, name: &str, texture: Texture) -> Self {
        self.textures.insert(name.to_string(), Arc::new(texture));
        self
    }

    pub fn with_sound(mut self, name: &str, sound: SoundBuffer) -> Self {
        self.sounds.insert(name.to_string(), Arc::new(sound));
        self
    }

    //--- Lookup -----------------------------------------------------------

    pub fn model(&self, name: &str) -> Result<Arc<Model>, AssetError> {
        lookup(&self.models, "model", name)
    }

    pub fn texture(&self, name: &str) -> Result<Arc<Texture>, AssetError> {
        lookup(&self.textures, "texture", name)
    }

    pub fn sound(&self, name: &str) -> Result<Arc<SoundBuffer>, AssetError> {
        lookup(&self.sounds, "sound", name)
    }

    /// Total number of assets across all kinds.
    pub fn len(&self) -> usize {
        self.models.len() + self.textures.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lookup<T>(table: &HashMap<String, Arc<T>>, kind: &'static str, name: &str) -> Result<Arc<T>, AssetError> {
    table.get(name).cloned().ok_or_else(|| AssetError::Missing {
        kind,
        name: name.to_string(),
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
