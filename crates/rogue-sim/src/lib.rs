//! Simulation engine for AI Gone Rogue.
//!
//! Owns the hecs ECS world, runs perception, enemy AI, weapons and the
//! tactical pause each frame, and produces SimSnapshots for the frontend.

pub mod components;
pub mod damage;
pub mod engine;
pub mod perception;
pub mod run_stats;
pub mod slowmo;
pub mod spatial;
pub mod systems;
pub mod weapon;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use rogue_core as core;

#[cfg(test)]
mod tests;
