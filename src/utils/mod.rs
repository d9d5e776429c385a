//! # Utilities Module
//!
//! Arithmetic helpers and cost-aware board searches.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
