//! # Dicebound
//!
//! A turn-based fantasy board game engine. Heroes roll dice to cross a
//! procedurally generated map, pick up treasures, spring traps, draw chance
//! cards and duel anyone who ends up on their cell.
//!
//! ## Architecture Overview
//!
//! The crate is the simulation core only. A presentation layer reads state
//! through the query surface of [`GameState`] and reacts to the
//! [`GameEvent`]s returned by every command; it never mutates the game.
//!
//! - **Generation**: map recipes, safe spawn points and item placement
//! - **Board**: cells with terrain, occupants and items
//! - **Movement**: dice budget, reachable set and cost-aware paths
//! - **Combat**: three-round opposed d20 duels
//! - **State**: the Selection / Movement / Action turn machine, timer and victory
//! - **Input**: text commands and a simple autoplay driver

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

/// Core error type for the Dicebound engine.
///
/// Most variants describe a rejected command. A rejected command never
/// mutates game state, so callers are free to ignore the error and keep
/// the turn flowing.
#[derive(thiserror::Error, Debug)]
pub enum DiceboundError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Command issued in the wrong phase of the turn
    #[error("{command} is not allowed during the {phase:?} phase")]
    WrongPhase {
        command: &'static str,
        phase: TurnPhase,
    },

    /// No character currently holds the turn
    #[error("No active character")]
    NoActiveCharacter,

    /// The referenced character does not exist
    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    /// The referenced character is dead
    #[error("Character {0} is dead")]
    CharacterDead(CharacterId),

    /// Dice were already rolled this turn
    #[error("Movement dice already rolled this turn")]
    AlreadyRolled,

    /// Movement attempted without an active roll
    #[error("No movement roll is active")]
    NoActiveRoll,

    /// Destination is outside the reachable set
    #[error("Position {0:?} is not reachable")]
    Unreachable(Position),

    /// Path is more expensive than the remaining budget
    #[error("Path costs {cost} but only {remaining} movement points remain")]
    InsufficientMovement { cost: u32, remaining: u32 },

    /// Pickup attempted on an empty cell
    #[error("No item at {0:?}")]
    NoItemHere(Position),

    /// Ability already used during this turn
    #[error("Ability already used this turn")]
    AbilityUsed,

    /// Ability still recharging
    #[error("Ability on cooldown ({remaining_secs}s remaining)")]
    AbilityOnCooldown { remaining_secs: u64 },

    /// The game has already finished
    #[error("The game is over")]
    GameOver,

    /// Text command could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Dicebound codebase.
pub type DiceboundResult<T> = Result<T, DiceboundError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default board width in cells
    pub const DEFAULT_BOARD_WIDTH: u32 = 25;

    /// Default board height in cells
    pub const DEFAULT_BOARD_HEIGHT: u32 = 25;

    /// Number of heroes placed at game setup
    pub const HERO_COUNT: usize = 4;

    /// Default hero health before class bonuses
    pub const DEFAULT_HERO_HEALTH: u32 = 100;

    /// Wall-clock budget of a single turn in milliseconds
    pub const TURN_DURATION_MS: u64 = 35_000;

    /// Number of items the board is kept stocked with
    pub const ITEM_TARGET: usize = 10;

    /// Treasures needed to win
    pub const VICTORY_TREASURES: usize = 5;

    /// Rounds fought in every battle
    pub const BATTLE_ROUNDS: usize = 3;

    /// Damage dealt to the loser of a battle round
    pub const BASE_ROUND_DAMAGE: u32 = 10;

    /// Extra round damage dealt by a Mage
    pub const MAGE_ROUND_BONUS: u32 = 5;
}
