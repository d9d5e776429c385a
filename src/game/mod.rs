//! # Game Module
//!
//! Core simulation: the board, heroes, movement, combat and the turn machine.
//!
//! This module contains the fundamental building blocks of Dicebound:
//! - Board and terrain representation
//! - Characters, classes and items
//! - Movement budget, reachable sets and battles
//! - The turn/phase state machine that ties them together

pub mod autoplay;
pub mod board;
pub mod cards;
pub mod character;
pub mod clock;
pub mod combat;
pub mod dice;
pub mod events;
pub mod items;
pub mod movement;
pub mod state;

pub use autoplay::*;
pub use board::*;
pub use cards::*;
pub use character::*;
pub use clock::*;
pub use combat::*;
pub use dice::*;
pub use events::*;
pub use items::*;
pub use movement::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a cell coordinate on the board.
///
/// # Examples
///
/// ```
/// use dicebound::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the 4 cardinal adjacent positions (no diagonals).
    ///
    /// The board never allows diagonal steps, so this is the only
    /// adjacency used by the engine.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| self + direction.to_delta())
            .collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions for single-step movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None if the delta is not a single cardinal step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns all 4 directions, east and west first.
    pub fn all() -> Vec<Direction> {
        vec![
            Direction::East,
            Direction::West,
            Direction::South,
            Direction::North,
        ]
    }
}

/// Stable identifier for a character.
pub type CharacterId = Uuid;

/// Identifier for an item on the board or in an inventory.
pub type ItemId = Uuid;

/// Creates a new unique character ID.
pub fn new_character_id() -> CharacterId {
    Uuid::new_v4()
}

/// Creates a new unique item ID.
pub fn new_item_id() -> ItemId {
    Uuid::new_v4()
}
