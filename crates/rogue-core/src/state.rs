//! Snapshot views of the simulation, produced once per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AgentKind, BrainState, RunPhase, SlowmoState, WeaponType};
use crate::events::SimEvent;
use crate::types::SimClock;

/// Complete per-frame view for presentation and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub clock: SimClock,
    pub phase: RunPhase,
    pub time_scale: f32,
    pub slowmo: SlowmoView,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub stats: StatsView,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowmoView {
    pub state: SlowmoState,
    pub remaining: f32,
    pub max: f32,
    pub tags: Vec<TagView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagView {
    pub target: u32,
    /// Marked point, following the target.
    pub point: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u32,
    pub position: Vec3,
    pub forward: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub weapon_type: WeaponType,
    pub firing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: AgentKind,
    pub position: Vec3,
    pub forward: Vec3,
    pub health: f32,
    pub state: BrainState,
    pub firing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsView {
    pub score: u32,
    pub keys: u32,
    pub lifetime_keys: u32,
    pub enemies_killed: u32,
    pub time_taken: f32,
}
