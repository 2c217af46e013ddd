//! Core types and definitions for the AI Gone Rogue combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, tuning, layers, the damage contract, events and
//! snapshots. It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod damage;
pub mod enums;
pub mod events;
pub mod layers;
pub mod observer;
pub mod state;
pub mod types;
