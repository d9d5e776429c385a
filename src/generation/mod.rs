//! # Generation Module
//!
//! Procedural content for a new game: terrain from a map recipe, hero spawn
//! points and item placement.
//!
//! Every generator draws from a caller-supplied `StdRng`, so a game built
//! from the same [`GameConfig`] seed is reproducible.

pub mod items;
pub mod spawn;
pub mod terrain;

pub use items::*;
pub use spawn::*;
pub use terrain::*;

use crate::config;
use crate::game::{MovementRules, Position, TerrainKind};
use crate::{DiceboundError, DiceboundResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Terrain assignment produced by a recipe.
pub type TerrainMap = HashMap<Position, TerrainKind>;

/// Smallest board edge the generators support.
pub const MIN_BOARD_SIZE: u32 = 5;

/// Largest board edge the generators support.
pub const MAX_BOARD_SIZE: u32 = 200;

/// Configuration for a new game.
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for reproducible generation and play
    pub seed: u64,
    /// Board width in cells
    pub width: u32,
    /// Board height in cells
    pub height: u32,
    /// Map recipe; a random classic recipe when absent
    pub recipe: Option<MapRecipe>,
    /// Wall-clock budget of one turn in milliseconds
    pub turn_duration_ms: u64,
    /// Number of items kept on the board
    pub item_target: usize,
    /// Treasures needed to win
    pub victory_treasures: usize,
    /// Movement rule switches
    pub rules: MovementRules,
}

impl GameConfig {
    /// Creates a default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::GameConfig;
    ///
    /// let config = GameConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!((config.width, config.height), (25, 25));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_BOARD_WIDTH,
            height: config::DEFAULT_BOARD_HEIGHT,
            recipe: None,
            turn_duration_ms: config::TURN_DURATION_MS,
            item_target: config::ITEM_TARGET,
            victory_treasures: config::VICTORY_TREASURES,
            rules: MovementRules::default(),
        }
    }

    /// Creates a small, fixed-recipe configuration for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 11,
            height: 11,
            recipe: Some(MapRecipe::RoyalPlains),
            ..Self::new(seed)
        }
    }

    pub fn with_recipe(mut self, recipe: MapRecipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_millis(self.turn_duration_ms)
    }

    /// Checks that the configuration can produce a playable game.
    pub fn validate(&self) -> DiceboundResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&value) {
                return Err(DiceboundError::InvalidConfig(format!(
                    "{} must be between {} and {}, got {}",
                    name, MIN_BOARD_SIZE, MAX_BOARD_SIZE, value
                )));
            }
        }
        if self.turn_duration_ms == 0 {
            return Err(DiceboundError::InvalidConfig(
                "turn duration must be positive".to_string(),
            ));
        }
        if self.victory_treasures == 0 {
            return Err(DiceboundError::InvalidConfig(
                "victory treasure count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> DiceboundResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> DiceboundResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural content generators.
///
/// All generation systems implement this trait, so a game can be assembled
/// from independent, individually testable pieces.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GameConfig, rng: &mut StdRng) -> DiceboundResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GameConfig) -> DiceboundResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GameConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Checks that a terrain map covers every coordinate of the board.
    pub fn validate_terrain(terrain: &TerrainMap, width: u32, height: u32) -> DiceboundResult<()> {
        let expected = width as usize * height as usize;
        if terrain.len() != expected {
            return Err(DiceboundError::GenerationFailed(format!(
                "terrain covers {} of {} cells",
                terrain.len(),
                expected
            )));
        }
        Ok(())
    }
}
