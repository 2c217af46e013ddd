//! Headless host for the AI Gone Rogue combat core.
//!
//! Runs the simulation on a real-time game loop thread, feeds it player
//! commands over a channel and reports the outcome.

pub mod game_loop;
pub mod logging;
pub mod script;
pub mod state;
pub mod summary;

pub use rogue_core as core;
