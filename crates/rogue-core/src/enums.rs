//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which kind of actor an agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Player,
    Pursuer,
    Kamikaze,
    Turret,
}

/// Pursue-and-fire enemy states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerState {
    #[default]
    Idle,
    Pursuing,
    Firing,
    MovingToLastKnown,
}

/// Proximity-fuse (kamikaze) enemy states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KamikazeState {
    #[default]
    Idle,
    Pursuing,
    AboutToExplode,
    MovingToLastKnown,
}

/// Stationary turret states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretState {
    #[default]
    Idle,
    FacingTarget,
    Firing,
}

/// The current state of any enemy controller, tagged by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "state")]
pub enum BrainState {
    Pursuer(PursuerState),
    Kamikaze(KamikazeState),
    Turret(TurretState),
}

/// Tactical pause (slowmo) state. Exactly one is current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlowmoState {
    #[default]
    Inactive,
    /// Time is dilated and the player may mark targets.
    Slowdown,
    /// Marked targets are presented one at a time.
    Executing,
}

/// Damage classification carried by a weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    None,
    Laser,
    /// Anti-armor classification; the only damage turrets accept.
    AntiTurret,
}

/// Firing mechanism of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    ChargeBurst,
    Beam,
    RapidFire,
}

/// Which clock drives a countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBase {
    /// Simulation time, dilated by the tactical pause.
    #[default]
    Scaled,
    /// Real time.
    Unscaled,
}

/// Whether a spatial query reports trigger colliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerInteraction {
    /// Defer to the scene-wide setting.
    #[default]
    UseGlobal,
    Collide,
    Ignore,
}

/// Collectible item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Key,
    DataCard,
    AntiTurretLens,
    Goal,
}

/// Transient visual effects requested from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    DeathExplosion,
    KamikazeExplosion,
    PlayerDeath,
}

/// Ambient audio/visual snapshot selected by the tactical pause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ambience {
    #[default]
    Normal,
    Slowmo,
}

/// Overall run phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    Ready,
    Running,
    Paused,
    GameOver,
    Victory,
}

impl RunPhase {
    /// Whether the world keeps simulating in this phase.
    pub fn simulates(self) -> bool {
        matches!(self, Self::Running | Self::GameOver | Self::Victory)
    }
}
