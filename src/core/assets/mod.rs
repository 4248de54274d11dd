//=========================================================================
// Asset Readiness
//=========================================================================
//
// Asynchronous asset delivery to screen states.
//
// Architecture:
//   AssetLoader ──(thread)──► ReadinessGate<Arc<AssetBundle>> ──► on_ready callbacks
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Module Declarations =================================================

mod bundle;
mod gate;
mod loader;

//=== Public API ==========================================================

pub use bundle::AssetBundle;
pub use gate::{ReadinessGate, ReadyCallback};
pub use loader::{spawn_loader, AssetLoader};

/// Gate carrying the shared asset bundle.
pub type AssetGate = ReadinessGate<Arc<AssetBundle>>;
