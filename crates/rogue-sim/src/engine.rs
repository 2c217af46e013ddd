//! Simulation engine: owns the world and runs the frame loop.
//!
//! `SimulationEngine` owns the hecs ECS world, the tactical pause controller
//! and the run statistics, processes player commands, runs all systems, and
//! produces `SimSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rogue_core::commands::PlayerCommand;
use rogue_core::config::TuningConfig;
use rogue_core::enums::{PickupKind, RunPhase};
use rogue_core::events::{SimEvent, SlowmoEvent};
use rogue_core::observer::{ListenerId, Observers};
use rogue_core::state::SimSnapshot;
use rogue_core::types::{FrameTime, SimClock};

use crate::damage::{self, DamageContext, DamageRequest};
use crate::run_stats::RunStats;
use crate::slowmo::SlowmoController;
use crate::systems;
use crate::systems::enemy_ai::AiFrame;
use crate::systems::pickups::PickupFrame;
use crate::systems::player::{PlayerFrame, PlayerInput};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub tuning: TuningConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: TuningConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    tuning: TuningConfig,
    clock: SimClock,
    rng: ChaCha8Rng,
    next_agent_id: u32,
    stats: RunStats,
    slowmo: SlowmoController,
    player: Option<Entity>,
    input: PlayerInput,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    observers: Observers<SimEvent>,
    /// Unscaled seconds not yet consumed by fixed sub-steps.
    fixed_accumulator: f32,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config. The world
    /// starts empty; `StartRun` builds the default arena if nothing was
    /// spawned beforehand.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            slowmo: SlowmoController::new(config.tuning.slowmo.clone()),
            tuning: config.tuning,
            clock: SimClock::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_agent_id: 0,
            stats: RunStats::new(),
            player: None,
            input: PlayerInput::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            observers: Observers::new(),
            fixed_accumulator: 0.0,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Register a listener for every published event. Listeners run in
    /// registration order at the end of each frame.
    pub fn subscribe(&mut self, listener: impl FnMut(&SimEvent) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Advance by `real_dt` seconds of wall-clock time.
    ///
    /// Fixed sub-steps run first, as many as the unscaled accumulator allows
    /// (capped), each covering `fixed_delta * time_scale` simulation seconds.
    /// The frame tick follows.
    pub fn step(&mut self, real_dt: f32) -> SimSnapshot {
        let time_scale = self.slowmo.time_scale();
        if self.stats.phase().simulates() {
            let sim = &self.tuning.simulation;
            let (fixed_delta, max_steps) = (sim.fixed_delta, sim.max_fixed_steps);
            self.fixed_accumulator += real_dt;
            let mut steps = 0;
            while self.fixed_accumulator >= fixed_delta && steps < max_steps {
                self.fixed_tick(fixed_delta * time_scale);
                self.fixed_accumulator -= fixed_delta;
                steps += 1;
            }
            if steps == max_steps {
                // Drop the backlog instead of spiralling.
                self.fixed_accumulator = self.fixed_accumulator.min(fixed_delta);
            }
        }
        self.tick(FrameTime::new(real_dt, time_scale))
    }

    /// Advance one frame and return the resulting snapshot.
    pub fn tick(&mut self, time: FrameTime) -> SimSnapshot {
        self.process_commands();

        if self.stats.phase().simulates() {
            self.run_systems(time);
            self.clock.advance(time);
        } else {
            self.input.clear_edges();
        }

        let events = std::mem::take(&mut self.events);
        for event in &events {
            self.observers.notify(event);
        }
        systems::snapshot::build_snapshot(
            &self.world,
            self.clock,
            self.stats.phase(),
            &self.slowmo,
            &self.stats,
            events,
        )
    }

    /// One physics sub-step of `dt` simulation seconds: player movement and
    /// facing, and the firing pursuers' turn toward their targets.
    pub fn fixed_tick(&mut self, dt: f32) {
        systems::player::fixed_step(&mut self.world, dt);
        systems::enemy_ai::fixed_step(&mut self.world);
    }

    pub fn phase(&self) -> RunPhase {
        self.stats.phase()
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    /// Current global time scale.
    pub fn time_scale(&self) -> f32 {
        self.slowmo.time_scale()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn slowmo(&self) -> &SlowmoController {
        &self.slowmo
    }

    pub fn slowmo_mut(&mut self) -> &mut SlowmoController {
        &mut self.slowmo
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    /// The player entity, while it exists.
    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|player| self.world.contains(*player))
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scenario setup.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Build the demonstration arena into the world.
    pub fn setup_arena(&mut self) -> world_setup::Arena {
        let arena = world_setup::setup_arena(&mut self.world, &mut self.next_agent_id, &self.tuning);
        self.player = Some(arena.player);
        arena
    }

    pub fn spawn_player(&mut self, position: Vec3) -> Entity {
        let player =
            world_setup::spawn_player(&mut self.world, &mut self.next_agent_id, &self.tuning, position);
        self.player = Some(player);
        player
    }

    /// Spawn a pursuer hunting the player.
    pub fn spawn_pursuer(&mut self, position: Vec3) -> Entity {
        world_setup::spawn_pursuer(
            &mut self.world,
            &mut self.next_agent_id,
            &self.tuning,
            position,
            self.player,
        )
    }

    /// Spawn a kamikaze hunting the player.
    pub fn spawn_kamikaze(&mut self, position: Vec3) -> Entity {
        world_setup::spawn_kamikaze(
            &mut self.world,
            &mut self.next_agent_id,
            &self.tuning,
            position,
            self.player,
        )
    }

    /// Spawn a turret watching the player, optionally guarding a goal.
    pub fn spawn_turret(&mut self, position: Vec3, objective: Option<Entity>) -> Entity {
        world_setup::spawn_turret(
            &mut self.world,
            &mut self.next_agent_id,
            &self.tuning,
            position,
            self.player,
            objective,
        )
    }

    pub fn spawn_wall(&mut self, center: Vec3, half_extents: Vec3) -> Entity {
        world_setup::spawn_wall(&mut self.world, center, half_extents)
    }

    pub fn spawn_door(&mut self, center: Vec3, half_extents: Vec3) -> Entity {
        world_setup::spawn_door(&mut self.world, center, half_extents)
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, position: Vec3) -> Entity {
        world_setup::spawn_pickup(&mut self.world, &self.tuning, kind, position)
    }

    pub fn spawn_goal(&mut self, position: Vec3) -> Entity {
        world_setup::spawn_goal(&mut self.world, &self.tuning, position)
    }

    /// Dispatch one damage request immediately, with full death handling.
    /// Returns true if it killed the target.
    pub fn apply_damage(&mut self, request: DamageRequest) -> bool {
        let killed = damage::dispatch(
            &mut self.world,
            &request,
            &mut DamageContext {
                stats: &mut self.stats,
                slowmo: &mut self.slowmo,
                rng: &mut self.rng,
                events: &mut self.events,
                tuning: &self.tuning,
            },
        );
        self.drain_slowmo_events();
        killed
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartRun => {
                if self.stats.phase() == RunPhase::Ready {
                    if self.world.is_empty() {
                        self.setup_arena();
                    }
                    self.stats.start();
                    self.fixed_accumulator = 0.0;
                    info!(agents = self.next_agent_id, "run started");
                }
            }
            PlayerCommand::Pause => {
                if self.stats.pause() {
                    debug!("run paused");
                }
            }
            PlayerCommand::Resume => {
                if self.stats.resume() {
                    debug!("run resumed");
                }
            }
            PlayerCommand::Move { axis } => {
                self.input.axis = axis.clamp_length_max(1.0);
            }
            PlayerCommand::AimAt { point } => {
                self.input.aim_point = Some(point);
            }
            PlayerCommand::FirePressed => self.input.fire_pressed = true,
            PlayerCommand::FireReleased => self.input.fire_released = true,
            PlayerCommand::ToggleSlowmo => self.input.toggle_pressed = true,
            PlayerCommand::UnlockDoors => self.input.unlock_pressed = true,
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, time: FrameTime) {
        self.stats.advance_clock(time.delta);
        let player = self.player();

        // 1. Player input, gated by the tactical pause state
        if let Some(player) = player {
            systems::player::run(
                &mut self.world,
                player,
                time,
                &mut PlayerFrame {
                    input: &self.input,
                    slowmo: &mut self.slowmo,
                    stats: &mut self.stats,
                    tuning: &self.tuning,
                    events: &mut self.events,
                },
            );
        }
        self.input.clear_edges();

        // 2. Tactical pause timers, on real time
        let world = &self.world;
        self.slowmo
            .tick(time.unscaled_delta, |entity| systems::position_of(world, entity));
        self.drain_slowmo_events();

        // 3. Enemy AI, then kamikaze blasts
        let ai = systems::enemy_ai::run(
            &mut self.world,
            AiFrame {
                time,
                queries_hit_triggers: self.tuning.simulation.queries_hit_triggers,
                explosion_lifetime: self.tuning.effects.kamikaze_explosion_lifetime,
            },
            &mut self.events,
        );
        self.resolve_damage(ai.requests);
        for entity in ai.detonated {
            let _ = self.world.despawn(entity);
        }

        // 4. Weapons
        let strikes = systems::weapons::run(
            &mut self.world,
            time,
            self.tuning.simulation.queries_hit_triggers,
            &mut self.events,
        );
        self.resolve_damage(strikes);

        // 5. Navigation
        systems::navigation::run(&mut self.world, time.delta);

        // 6. Pickups
        if let Some(player) = self.player() {
            systems::pickups::run(
                &mut self.world,
                player,
                &mut PickupFrame {
                    stats: &mut self.stats,
                    slowmo_state: self.slowmo.state(),
                    tuning: &self.tuning,
                    events: &mut self.events,
                },
            );
        }

        // 7. Anything death handling did to the tactical pause
        self.drain_slowmo_events();
    }

    fn resolve_damage(&mut self, requests: Vec<DamageRequest>) {
        if requests.is_empty() {
            return;
        }
        damage::resolve_all(
            &mut self.world,
            requests,
            &mut DamageContext {
                stats: &mut self.stats,
                slowmo: &mut self.slowmo,
                rng: &mut self.rng,
                events: &mut self.events,
                tuning: &self.tuning,
            },
        );
    }

    /// Forward tactical pause notifications. Every end of the pause stops
    /// the player's weapon.
    fn drain_slowmo_events(&mut self) {
        for event in self.slowmo.drain_events() {
            if matches!(event, SlowmoEvent::Ended { .. }) {
                if let Some(player) = self.player() {
                    systems::player::stop_weapon(&mut self.world, player, &mut self.events);
                }
            }
            self.events.push(SimEvent::Slowmo(event));
        }
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Movement axis pointing from `from` toward `to` on the ground plane.
pub fn axis_toward(from: Vec3, to: Vec3) -> Vec2 {
    let delta = to - from;
    Vec2::new(delta.x, delta.z).normalize_or_zero()
}
