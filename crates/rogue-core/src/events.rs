//! Simulation events published to observers and collected into snapshots.
//!
//! Presentation (effects, trails, audio, UI) is driven entirely by these;
//! the core never waits on a reply.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{
    AgentKind, Ambience, BrainState, EffectKind, PickupKind, SlowmoState, WeaponType,
};

/// Tactical pause notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SlowmoEvent {
    Started,
    /// `with_sound` is false for forced termination.
    Ended { with_sound: bool },
    StateChanged { state: SlowmoState },
    TargetMarked { target: u32, point: Vec3 },
    /// The tag was shown for its full duration during execution.
    TagExpired { target: u32 },
    /// The tagged target no longer exists.
    TagDropped { target: u32 },
    /// Remaining budget crossed the warning threshold.
    DurationWarning,
    AmbienceChanged { ambience: Ambience },
}

/// Everything the simulation reports to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    StateChanged {
        agent: u32,
        state: BrainState,
    },
    WeaponStarted {
        agent: u32,
    },
    WeaponStopped {
        agent: u32,
    },
    /// A charge weapon crossed its about-to-fire threshold.
    WeaponCharging {
        agent: u32,
    },
    WeaponTypeChanged {
        agent: u32,
        previous: WeaponType,
        current: WeaponType,
    },
    Trail {
        from: Vec3,
        to: Vec3,
        speed: f32,
        fade_out: f32,
    },
    Damaged {
        agent: u32,
        amount: f32,
        health: f32,
        source: Option<u32>,
    },
    Killed {
        agent: u32,
        kind: AgentKind,
        by_player: bool,
    },
    Effect {
        effect: EffectKind,
        at: Vec3,
        lifetime: f32,
    },
    FuseLit {
        agent: u32,
    },
    FuseAborted {
        agent: u32,
    },
    PickupDropped {
        kind: PickupKind,
        at: Vec3,
    },
    PickupCollected {
        kind: PickupKind,
    },
    GoalActivated,
    DoorUnlocked {
        at: Vec3,
    },
    KeysDenied,
    Slowmo(SlowmoEvent),
    PlayerDied,
    RunWon,
}
