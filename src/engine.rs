//=========================================================================
// Aetheric Stage Engine
//
// Main entry point and coordinator for the stage.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──────────>  [Runtime]
//         │                          │                            │
//         ├─ with_tps()              ├─ init(|systems| ...)       ├─ audio thread
//         ├─ with_channel_capacity() └─ run_headless(ticks)       ├─ asset-loader thread
//         ├─ with_config()                                        ├─ core thread
//         ├─ with_assets()                                        └─ platform (main)
//         └─ with_surface()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::{EngineConfig, WindowSection};
use crate::core::assets::{spawn_loader, AssetGate, AssetLoader};
use crate::core::audio::{audio_channel, spawn_audio_thread, AudioCmd, AudioListener};
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::platform_bridge::PlatformEvent;
use crate::core::render::{surface, HeadlessTarget, SurfaceHandle, Viewport};
use crate::core::state::{EventId, MachinePolicy, StateKey};
use crate::core::CoreSystemsOrchestrator;
use crate::error::EngineError;
use crate::platform::Platform;

/// Deferred `spawn_loader` call, bound to the loader type at `with_assets`.
type LoaderLaunch = Box<dyn FnOnce(Arc<AssetGate>) -> io::Result<JoinHandle<()>> + Send>;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Window**: "Aetheric Stage", 800×600
/// - **Machine policy**: lenient, keep resident, lazy construction
/// - **Surface**: a [`HeadlessTarget`] sized like the window
/// - **Assets**: none (the gate never fires)
///
/// # Examples
///
/// ```no_run
/// use aetheric_stage::prelude::*;
/// use aetheric_stage::showroom::{self, ProceduralAssets, ShowroomEvent, ShowroomScreen};
///
/// EngineBuilder::<ShowroomScreen, ShowroomEvent>::new()
///     .with_tps(120.0)
///     .with_assets(ProceduralAssets::new())
///     .build()
///     .init(showroom::install)
///     .run()
///     .expect("stage failed");
/// ```
pub struct EngineBuilder<K: StateKey, E: EventId> {
    tps: f64,
    channel_capacity: usize,
    window: WindowSection,
    policy: MachinePolicy,
    surface: Option<SurfaceHandle>,
    loader: Option<LoaderLaunch>,
    _phantom: PhantomData<(K, E)>,
}

impl<K: StateKey, E: EventId> EngineBuilder<K, E> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = EngineConfig::default();
        Self {
            tps: defaults.engine.tps,
            channel_capacity: defaults.engine.channel_capacity,
            window: defaults.window,
            policy: defaults.machine,
            surface: None,
            loader: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Applies every section of a loaded config.
    ///
    /// # Panics
    ///
    /// Panics on values [`EngineConfig::validate`] would reject.
    pub fn with_config(self, config: EngineConfig) -> Self {
        let EngineConfig { engine, window, machine } = config;
        let mut builder = self.with_tps(engine.tps).with_channel_capacity(engine.channel_capacity);
        builder.window = window;
        builder.policy = machine;
        builder
    }

    /// Loads assets on a background thread once the engine runs.
    pub fn with_assets<L: AssetLoader>(mut self, loader: L) -> Self {
        self.loader = Some(Box::new(move |gate| spawn_loader(loader, gate)));
        self
    }

    /// Renders into `surface` instead of the default headless target.
    pub fn with_surface(mut self, surface: SurfaceHandle) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Builds the engine instance.
    ///
    /// The state machine starts out with the configured policy; register
    /// states and transitions through [`Engine::init`].
    pub fn build(self) -> Engine<K, E> {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let target = self.surface.unwrap_or_else(|| {
            let viewport = Viewport::new(self.window.width as f32, self.window.height as f32);
            surface(HeadlessTarget::new(viewport))
        });
        let gate = Arc::new(AssetGate::new());
        let (audio, audio_commands) = audio_channel();

        let context = GlobalContext::new(target, Arc::clone(&gate), audio.clone());
        let mut orchestrator = CoreSystemsOrchestrator::new(context);
        let policy = self.policy;
        orchestrator.init_systems(|systems| systems.state_machine.set_policy(policy));

        Engine {
            orchestrator,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.window,
            gate,
            audio,
            audio_commands,
            loader: self.loader,
        }
    }
}

impl<K: StateKey, E: EventId> Default for EngineBuilder<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Aetheric Stage runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► StateMachine → active ScreenState
///   ├─► Asset loader thread ──fire──► AssetGate
///   ├─► Audio thread ◄── AudioCmd
///   └─► Platform (Event Loop)
///         └─► Window, pointer input
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine<K: StateKey, E: EventId> {
    orchestrator: CoreSystemsOrchestrator<K, E>,
    tps: f64,
    channel_capacity: usize,
    window: WindowSection,
    gate: Arc<AssetGate>,
    audio: AudioListener,
    audio_commands: Receiver<AudioCmd>,
    loader: Option<LoaderLaunch>,
}

impl<K: StateKey, E: EventId> Engine<K, E> {
    //--- Initialization ---------------------------------------------------

    /// Registers states and transitions before execution.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use aetheric_stage::prelude::*;
    /// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// # enum Screen { Title, Play }
    /// # impl StateKey for Screen {}
    /// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// # enum Signal { Start }
    /// # impl EventId for Signal {}
    /// # struct Title;
    /// # impl ScreenState<Signal> for Title {
    /// #     fn update(&mut self, _: &GlobalContext, _: &mut Emitter<Signal>) {}
    /// # }
    /// # struct Play;
    /// # impl ScreenState<Signal> for Play {
    /// #     fn update(&mut self, _: &GlobalContext, _: &mut Emitter<Signal>) {}
    /// # }
    /// EngineBuilder::<Screen, Signal>::new()
    ///     .build()
    ///     .init(|systems| {
    ///         systems.state_machine.register_initial(Screen::Title, Title);
    ///         systems.state_machine.register(Screen::Play, Play);
    ///         systems.state_machine.on(Screen::Title, Signal::Start, Screen::Play);
    ///     })
    ///     .run()
    ///     .unwrap();
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems<K, E>),
    {
        info!("Initializing engine systems");

        self.orchestrator.init_systems(init_fn);

        info!("Engine initialization complete");
        self
    }

    /// Readiness gate the loader fires; also usable to deliver assets by hand.
    pub fn assets(&self) -> Arc<AssetGate> {
        Arc::clone(&self.gate)
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the audio and asset-loader threads
    /// 2. Validates the state machine and enters the initial state
    /// 3. Creates the bounded channel and spawns the core thread
    /// 4. Runs the platform event loop (blocks here)
    /// 5. On window close: core thread exits the active state and terminates
    ///
    /// # Errors
    ///
    /// - [`EngineError::State`] if the state machine setup is invalid
    /// - [`EngineError::Spawn`] if a worker thread cannot be started
    /// - [`EngineError::Platform`] if the event loop fails
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let Engine {
            mut orchestrator,
            tps,
            channel_capacity,
            window,
            gate,
            audio,
            audio_commands,
            loader,
        } = self;

        //--- 1. Background services ---------------------------------------
        let audio_handle = spawn_audio_thread(audio_commands).map_err(|source| EngineError::Spawn { name: "audio", source })?;
        launch_loader(loader, gate)?;

        //--- 2. Enter the initial state -----------------------------------
        if let Err(e) = orchestrator.start() {
            stop_audio(&audio, audio_handle);
            return Err(e.into());
        }

        //--- 3. Channel and core thread -----------------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) = bounded(channel_capacity);
        info!("Platform channel created (capacity: {})", channel_capacity);

        let core_handle = match orchestrator.spawn_core_thread(rx, tps) {
            Ok(handle) => handle,
            Err(source) => {
                stop_audio(&audio, audio_handle);
                return Err(EngineError::Spawn { name: "core", source });
            }
        };
        info!("Core logic thread spawned");

        //--- 4. Platform event loop ---------------------------------------
        let platform = Platform::new(tx, window);
        info!("Platform initialized, entering event loop");
        let platform_result = platform.run();
        info!("Platform event loop exited");

        //--- 5. Cleanup ----------------------------------------------------
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }
        stop_audio(&audio, audio_handle);

        info!("Engine shutdown complete");
        platform_result.map_err(EngineError::from)
    }

    /// Runs `ticks` paced ticks on the calling thread without a window.
    ///
    /// No input is delivered; the active state sees an idle pointer.
    ///
    /// # Errors
    ///
    /// Same setup errors as [`Engine::run`], minus the platform.
    pub fn run_headless(self, ticks: u64) -> Result<(), EngineError> {
        info!("Starting headless run ({} ticks @ {} TPS)", ticks, self.tps);

        let Engine {
            mut orchestrator,
            tps,
            gate,
            audio,
            audio_commands,
            loader,
            ..
        } = self;

        let audio_handle = spawn_audio_thread(audio_commands).map_err(|source| EngineError::Spawn { name: "audio", source })?;
        launch_loader(loader, gate)?;

        if let Err(e) = orchestrator.start() {
            stop_audio(&audio, audio_handle);
            return Err(e.into());
        }

        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let delta = frame_duration.as_secs_f32();

        for _ in 0..ticks {
            let frame_start = Instant::now();
            orchestrator.tick(Vec::new(), delta);

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        orchestrator.shutdown();
        stop_audio(&audio, audio_handle);

        info!("Headless run complete");
        Ok(())
    }
}

//=== Helpers =============================================================

fn launch_loader(loader: Option<LoaderLaunch>, gate: Arc<AssetGate>) -> Result<(), EngineError> {
    match loader {
        // Detached: a slow load must not hold up shutdown.
        Some(launch) => launch(gate).map(drop).map_err(|source| EngineError::Spawn { name: "asset-loader", source }),
        None => {
            warn!("No asset loader configured; asset-dependent behavior stays disabled");
            Ok(())
        }
    }
}

fn stop_audio(audio: &AudioListener, handle: JoinHandle<()>) {
    audio.shutdown();
    if let Err(e) = handle.join() {
        error!("Audio thread panicked: {:?}", e);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
