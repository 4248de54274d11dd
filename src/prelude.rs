//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::config::EngineConfig;
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::{AssetError, ConfigError, EngineError, PlatformError, StateError};

// Global systems and context
pub use crate::core::globals::{FrameClock, GlobalContext, GlobalSystems};

// Input
pub use crate::core::input::{InputEvent, MouseButton};

// Screen states
pub use crate::core::state::{
    Construction, Emitter, EventId, MachinePolicy, Retention, ScreenState, StateKey, StateMachine, TransitionTable,
};

// Interaction
pub use crate::core::interaction::{normalize, probe, NormalizedPosition};

// Assets
pub use crate::core::assets::{AssetBundle, AssetGate, AssetLoader};

// Collaborators
pub use crate::core::animation::{AnimationService, Easing, Property, Repeat, Tween, Tweens};
pub use crate::core::audio::{AudioListener, Sound, SoundBuffer, SoundSlot};
pub use crate::core::render::{
    surface, BloomPass, Color, Composer, HeadlessTarget, HitRecord, Material, Model, Node, NodeId, PerspectiveCamera,
    RenderPass, SceneGraph, SurfaceHandle, Texture, Transform, Viewport,
};
