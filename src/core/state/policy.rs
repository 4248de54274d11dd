//=========================================================================
// Machine Policy
//=========================================================================
//
// Driver behavior knobs, settable in code or from the `[machine]` config
// section.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== Retention ===========================================================

/// What happens to a state's resources when it is exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Stay constructed; the next entry reuses everything.
    #[default]
    KeepResident,
    /// Call `dispose` after `exit` and reconstruct on the next entry.
    DisposeOnExit,
}

//=== Construction ========================================================

/// When states are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    /// On first entry.
    #[default]
    Lazy,
    /// Every registered state at `start`.
    Eager,
}

//=== MachinePolicy =======================================================

/// Complete driver policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachinePolicy {
    /// Panic on events with no transition instead of ignoring them.
    pub strict_transitions: bool,
    pub retention: Retention,
    pub construction: Construction,
}
