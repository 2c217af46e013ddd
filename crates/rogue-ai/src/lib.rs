//! Enemy AI for AI Gone Rogue.
//!
//! Implements the pursue-and-fire, kamikaze and turret state machines
//! and per-variant enemy profiles.

pub mod fsm;
pub mod kamikaze;
pub mod profiles;
pub mod pursuer;
pub mod turret;

pub use rogue_core as core;
