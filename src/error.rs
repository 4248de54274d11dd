//=========================================================================
// Error Types
//=========================================================================
//
// Typed errors for the fallible setup paths of the stage.
//
// Per-tick lifecycle calls never return errors: missing resources are
// skipped and unmapped transitions are ignored. Errors here cover driver
// setup, asset lookup, readiness-gate misuse, configuration loading and
// the windowed runtime.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== StateError ==========================================================

/// Errors raised while validating or starting the state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// `start` was called without an initial state.
    #[error("no initial state was set")]
    NoInitialState,

    /// A key was referenced (initial state or transition table) but never registered.
    #[error("state {0} is referenced but not registered")]
    Unregistered(String),

    /// `start` was called on a machine that is already running.
    #[error("state machine already started (active state {0})")]
    AlreadyStarted(String),
}

//=== AssetError ==========================================================

/// Errors raised by the asset collaborator and the readiness gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Named lookup failed.
    #[error("{kind} asset '{name}' not found in bundle")]
    Missing { kind: &'static str, name: String },

    /// The readiness gate was fired a second time.
    #[error("readiness gate fired more than once")]
    AlreadyFired,

    /// The loader failed to produce a bundle.
    #[error("asset load failed: {0}")]
    Load(String),
}

//=== ConfigError =========================================================

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== PlatformError =======================================================

/// Windowing failures. Fatal for a windowed run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== EngineError =========================================================

/// Anything that stops [`Engine`](crate::Engine) from running.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A worker thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

//=========================================================================
// Unit Tests
//=========================================================================
