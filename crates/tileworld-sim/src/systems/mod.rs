//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They own no state. Everything lives in components, the map and the
//! unit index.

pub mod camera;
pub mod combat;
pub mod input;
pub mod movement;
pub mod snapshot;
pub mod units;
