//! Run statistics: the single owner of score, keys, kills and run phase.
//!
//! Created with the engine at run start and passed explicitly to every
//! system that needs it. Fields are private; mutation goes through the
//! increment/decrement methods below.

use rogue_core::enums::RunPhase;
use rogue_core::state::StatsView;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    score: u32,
    keys: u32,
    lifetime_keys: u32,
    enemies_killed: u32,
    time_taken: f32,
    phase: RunPhase,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn keys(&self) -> u32 {
        self.keys
    }

    pub fn lifetime_keys(&self) -> u32 {
        self.lifetime_keys
    }

    pub fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    pub fn time_taken(&self) -> f32 {
        self.time_taken
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn increment_keys(&mut self) {
        self.keys += 1;
        self.lifetime_keys += 1;
    }

    /// Spend one key. Returns false when there are none.
    pub fn try_spend_key(&mut self) -> bool {
        if self.keys == 0 {
            return false;
        }
        self.keys -= 1;
        true
    }

    pub fn increment_enemy_kill_count(&mut self) {
        self.enemies_killed += 1;
    }

    /// Accumulate run time while the run is live.
    pub fn advance_clock(&mut self, dt: f32) {
        if self.phase == RunPhase::Running {
            self.time_taken += dt;
        }
    }

    pub fn start(&mut self) -> bool {
        if self.phase != RunPhase::Ready {
            return false;
        }
        self.phase = RunPhase::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != RunPhase::Paused {
            return false;
        }
        self.phase = RunPhase::Running;
        true
    }

    /// End the run in defeat. Only a live run can end.
    pub fn mark_game_over(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::GameOver;
        true
    }

    pub fn mark_victory(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Victory;
        true
    }

    pub fn view(&self) -> StatsView {
        StatsView {
            score: self.score,
            keys: self.keys,
            lifetime_keys: self.lifetime_keys,
            enemies_killed: self.enemies_killed,
            time_taken: self.time_taken,
        }
    }
}
