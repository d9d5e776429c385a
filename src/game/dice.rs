//! # Dice
//!
//! Injectable random source for movement and battle rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Something that can roll an n-sided die.
pub trait DiceRoller: std::fmt::Debug {
    /// Rolls a die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    fn d6(&mut self) -> u32 {
        self.roll(6)
    }

    fn d20(&mut self) -> u32 {
        self.roll(20)
    }
}

/// Seeded pseudo-random dice.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl DiceRoller for RandomDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Dice that return a fixed script of values, for deterministic play.
///
/// Values are clamped into `1..=sides`. Once the script runs out every
/// roll returns 1.
///
/// # Examples
///
/// ```
/// use dicebound::{DiceRoller, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([4, 18, 25]);
/// assert_eq!(dice.d6(), 4);
/// assert_eq!(dice.d20(), 18);
/// assert_eq!(dice.d20(), 20);
/// assert_eq!(dice.d6(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
        }
    }

    /// Appends more values to the end of the script.
    pub fn push(&mut self, values: impl IntoIterator<Item = u32>) {
        self.script.extend(values);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let value = self.script.pop_front().unwrap_or(1);
        value.clamp(1, sides.max(1))
    }
}
