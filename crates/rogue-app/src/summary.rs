//! End-of-run summary printed by the binary.

use serde::Serialize;

use rogue_core::enums::{RunPhase, SlowmoState};
use rogue_core::state::SimSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub frames: u64,
    pub elapsed_secs: f32,
    pub phase: RunPhase,
    pub score: u32,
    pub enemies_killed: u32,
    pub enemies_left: usize,
    pub keys: u32,
    pub time_taken: f32,
    pub player_health: Option<f32>,
    pub slowmo_state: SlowmoState,
    pub slowmo_remaining: f32,
}

impl RunSummary {
    pub fn from_snapshot(seed: u64, snapshot: &SimSnapshot) -> Self {
        Self {
            seed,
            frames: snapshot.clock.frame,
            elapsed_secs: snapshot.clock.unscaled_elapsed_secs,
            phase: snapshot.phase,
            score: snapshot.stats.score,
            enemies_killed: snapshot.stats.enemies_killed,
            enemies_left: snapshot.enemies.len(),
            keys: snapshot.stats.keys,
            time_taken: snapshot.stats.time_taken,
            player_health: snapshot.player.as_ref().map(|p| p.health),
            slowmo_state: snapshot.slowmo.state,
            slowmo_remaining: snapshot.slowmo.remaining,
        }
    }
}
