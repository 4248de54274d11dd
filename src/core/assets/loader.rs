//=========================================================================
// Asset Loader
//=========================================================================
//
// Background loading that ends in exactly one gate fire.
//
// Flow:
//   spawn_loader(loader, gate)
//     └─ "asset-loader" thread: loader.load()
//          ├─ Ok(bundle) → gate.try_fire(Arc<bundle>)
//          └─ Err(e)     → logged, gate never fires
//
// A failed load leaves every waiter pending; screen states keep running
// in their not-ready mode.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::sync::Arc;
use std::thread;

use log::{error, info};

//=== Internal Dependencies ===============================================

use super::{AssetBundle, AssetGate};
use crate::error::AssetError;

//=== AssetLoader =========================================================

/// Produces the asset bundle, usually slowly.
pub trait AssetLoader: Send + 'static {
    fn load(&mut self) -> Result<AssetBundle, AssetError>;
}

impl<F> AssetLoader for F
where
    F: FnMut() -> Result<AssetBundle, AssetError> + Send + 'static,
{
    fn load(&mut self) -> Result<AssetBundle, AssetError> {
        self()
    }
}

//=== spawn_loader() ======================================================

/// Runs `loader` on a named thread and fires `gate` with the result.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_loader<L: AssetLoader>(mut loader: L, gate: Arc<AssetGate>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("asset-loader".into()).spawn(move || match loader.load() {
        Ok(bundle) => {
            info!("Assets loaded ({} item(s))", bundle.len());
            if let Err(e) = gate.try_fire(Arc::new(bundle)) {
                error!("Asset delivery rejected: {}", e);
            }
        }
        Err(e) => error!("Asset loading failed: {}", e),
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::SoundBuffer;

    #[test]
    fn successful_load_fires_gate() {
        let gate = Arc::new(AssetGate::new());
        let loader = || Ok(AssetBundle::new().with_sound("hum", SoundBuffer::tone("hum", 100.0, 0.01, 8000)));

        spawn_loader(loader, Arc::clone(&gate)).unwrap().join().unwrap();

        let bundle = gate.payload().expect("gate fired");
        assert!(bundle.sound("hum").is_ok());
    }

    #[test]
    fn failed_load_leaves_gate_pending() {
        let gate = Arc::new(AssetGate::new());
        gate.on_ready(|_| panic!("must not fire"));
        let loader = || Err(AssetError::Load("disk on fire".into()));

        spawn_loader(loader, Arc::clone(&gate)).unwrap().join().unwrap();

        assert!(!gate.is_ready());
        assert_eq!(gate.pending_count(), 1);
    }

    #[test]
    fn loader_on_fired_gate_does_not_panic() {
        let gate = Arc::new(AssetGate::new());
        gate.fire(Arc::new(AssetBundle::new()));

        spawn_loader(|| Ok(AssetBundle::new()), Arc::clone(&gate)).unwrap().join().unwrap();

        assert!(gate.is_ready());
    }
}
