//! # Movement
//!
//! Dice-driven movement budget, reachable sets and move execution.

use crate::utils::{cheapest_path, costs_within, modified_roll};
use crate::{Board, Cell, Character, CharacterId, DiceRoller, DiceboundError, DiceboundResult, Position, TerrainKind};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Board rules that affect where characters may walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRules {
    /// Treat Water as impassable instead of merely expensive.
    #[serde(default)]
    pub water_blocks: bool,
}

impl MovementRules {
    /// Whether a character may step onto `cell`.
    pub fn passable(&self, cell: &Cell) -> bool {
        if self.water_blocks && cell.terrain() == TerrainKind::Water {
            return false;
        }
        cell.is_enterable()
    }
}

/// Result of a validated, executed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    pub path: Vec<Position>,
    pub cost: u32,
    pub remaining: u32,
    /// Character already standing on the destination, if any
    pub opponent: Option<CharacterId>,
    /// Terrain damage applied when no battle follows
    pub hazard_damage: u32,
    pub died: bool,
}

/// Rolls the movement die and stores the result on the character.
///
/// The roll is `d6 + (speed - 3)` with the class modifier on top, never
/// less than 1.
pub fn roll_movement(character: &mut Character, dice: &mut dyn DiceRoller) -> u32 {
    let roll = dice.d6();
    let modifier = (character.speed - 3)
        + character
            .class
            .movement_modifier(character.equipment.has_armor());
    let points = modified_roll(roll, modifier, 1);

    character.movement_points = Some(points);
    character.has_rolled = true;
    debug!(
        "{} rolled {} for movement ({} points)",
        character.name, roll, points
    );
    points
}

/// Every coordinate the character can reach with its remaining points.
///
/// The character's own cell is never included. Empty when no roll is active.
pub fn compute_reachable(board: &Board, character: &Character, rules: &MovementRules) -> HashSet<Position> {
    let Some(budget) = character.movement_points else {
        return HashSet::new();
    };
    costs_within(board, character.position, budget, |cell| rules.passable(cell))
        .into_keys()
        .filter(|&pos| pos != character.position)
        .collect()
}

/// Cheapest path and its cost between two cells under the given rules.
pub fn compute_cost(board: &Board, from: Position, to: Position, rules: &MovementRules) -> Option<(Vec<Position>, u32)> {
    cheapest_path(board, from, to, |cell| rules.passable(cell))
}

/// Checks that `character` may move to `destination`, returning the path and
/// its cost. Nothing is mutated.
pub fn plan_move(
    board: &Board,
    character: &Character,
    destination: Position,
    rules: &MovementRules,
) -> DiceboundResult<(Vec<Position>, u32)> {
    let remaining = character.movement_points.ok_or(DiceboundError::NoActiveRoll)?;
    if !character.reachable.contains(&destination) {
        return Err(DiceboundError::Unreachable(destination));
    }
    let (path, cost) = compute_cost(board, character.position, destination, rules)
        .ok_or(DiceboundError::Unreachable(destination))?;
    if cost > remaining {
        return Err(DiceboundError::InsufficientMovement { cost, remaining });
    }
    Ok((path, cost))
}

/// Moves a character to `destination`.
///
/// On success the mover leaves its cell, joins the destination cell and
/// spends the path cost. If someone else already stands there the outcome
/// names them as the opponent and no hazard applies; otherwise the
/// destination's terrain hazard is dealt. The reachable set is recomputed
/// from the new position. On error nothing changes.
pub fn execute_move(
    board: &mut Board,
    character: &mut Character,
    destination: Position,
    rules: &MovementRules,
) -> DiceboundResult<MoveOutcome> {
    let (path, cost) = plan_move(board, character, destination, rules)?;
    let from = character.position;

    let opponent = board
        .cell(destination)
        .and_then(|cell| cell.occupants().iter().copied().find(|&id| id != character.id));

    board.relocate_occupant(from, destination, character.id);
    character.position = destination;
    let remaining = character.movement_points.unwrap_or(0).saturating_sub(cost);
    character.movement_points = Some(remaining);

    let mut hazard_damage = 0;
    let mut died = false;
    if opponent.is_none() {
        hazard_damage = board
            .cell(destination)
            .map(|cell| cell.terrain().hazard_damage())
            .unwrap_or(0);
        if hazard_damage > 0 {
            died = character.take_damage(hazard_damage);
        }
    }

    character.reachable = compute_reachable(board, character, rules);
    debug!(
        "{} moved {} -> {} (cost {}, {} left)",
        character.name, from, destination, cost, remaining
    );

    Ok(MoveOutcome {
        from,
        to: destination,
        path,
        cost,
        remaining,
        opponent,
        hazard_damage,
        died,
    })
}

/// Clears the roll and reachable set of one character.
pub fn reset_movement(character: &mut Character) {
    character.movement_points = None;
    character.reachable.clear();
}

pub fn reset_all<'a>(characters: impl IntoIterator<Item = &'a mut Character>) {
    for character in characters {
        reset_movement(character);
    }
}
