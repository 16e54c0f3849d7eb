//! Simulation engine for tileworld.
//!
//! Owns the hecs ECS world, runs systems once per tick,
//! and produces GameStateSnapshots for the frontend.

pub mod config;
pub mod engine;
pub mod pathfinding;
pub mod systems;
pub mod world_setup;

pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use tileworld_core as core;
pub use tileworld_terrain as terrain;
