//! # Autoplay Module
//!
//! A simple driver that plays every character: roll, walk toward the
//! nearest item, pick it up, pass.

use crate::input::Command;
use crate::{CharacterClass, DiceboundResult, GameEvent, GameState, Position, TurnPhase};
use log::debug;

/// Autoplay state and command selection.
#[derive(Debug, Clone, Default)]
pub struct AutoplayState {
    /// Whether cells holding another character are valid destinations
    pub aggressive: bool,
    /// Current destination
    pub target: Option<Position>,
    /// Commands issued so far
    pub commands_issued: usize,
}

impl AutoplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An autoplayer that seeks out battles.
    pub fn aggressive() -> Self {
        Self {
            aggressive: true,
            ..Self::default()
        }
    }

    /// Picks the next command for the active character, or None when the
    /// game has no active character.
    pub fn next_command(&mut self, game: &GameState) -> Option<Command> {
        if game.is_over() {
            return None;
        }
        let active = game.active_character()?;
        let here = game.cell(active.position);
        let has_item_here = here.is_some_and(|cell| !cell.items().is_empty());

        let command = match game.phase() {
            TurnPhase::Selection => {
                let ability_ready = !active.ability_used
                    && active.ability_cooldown_remaining(game.now()).is_none();
                let wants_ability = match active.class {
                    CharacterClass::Cleric => active.health() < active.max_health(),
                    _ => true,
                };
                if ability_ready && wants_ability {
                    Command::UseAbility
                } else {
                    Command::Roll
                }
            }
            TurnPhase::Movement => {
                if has_item_here {
                    Command::EndMovement
                } else {
                    match self.choose_destination(game, active.position, &active.reachable) {
                        Some(destination) => Command::Move(destination),
                        None => Command::EndMovement,
                    }
                }
            }
            TurnPhase::Action => {
                if has_item_here {
                    Command::Pickup
                } else {
                    Command::EndTurn
                }
            }
        };

        self.commands_issued += 1;
        debug!("Autoplay chose {:?}", command);
        Some(command)
    }

    /// Applies the next command. A rejected command passes the turn instead
    /// so the driver can never stall.
    pub fn step(&mut self, game: &mut GameState) -> DiceboundResult<Vec<GameEvent>> {
        let Some(command) = self.next_command(game) else {
            return Ok(Vec::new());
        };
        match game.apply(command) {
            Ok(events) => Ok(events),
            Err(err) => {
                debug!("Autoplay command {:?} rejected: {}", command, err);
                self.target = None;
                game.end_turn()
            }
        }
    }

    /// Plays until the game ends or `max_turns` turns have been played.
    /// Every event is passed to `on_event`.
    pub fn play(
        &mut self,
        game: &mut GameState,
        max_turns: u32,
        mut on_event: impl FnMut(&GameEvent),
    ) -> DiceboundResult<()> {
        while !game.is_over() && game.turn_number() <= max_turns {
            let events = self.step(game)?;
            if events.is_empty() && game.active_character().is_none() {
                break;
            }
            events.iter().for_each(&mut on_event);
        }
        Ok(())
    }

    /// Best reachable cell: one holding an item, else the one closest to
    /// any item. Ties break on position so play is reproducible.
    fn choose_destination(
        &mut self,
        game: &GameState,
        origin: Position,
        reachable: &std::collections::HashSet<Position>,
    ) -> Option<Position> {
        let candidates: Vec<Position> = reachable
            .iter()
            .copied()
            .filter(|&pos| {
                self.aggressive || game.cell(pos).is_some_and(|cell| !cell.is_occupied())
            })
            .collect();

        let with_items = candidates
            .iter()
            .copied()
            .filter(|&pos| game.cell(pos).is_some_and(|cell| !cell.items().is_empty()))
            .min_by_key(|&pos| (origin.manhattan_distance(pos), pos));
        if with_items.is_some() {
            self.target = with_items;
            return with_items;
        }

        let items: Vec<Position> = game
            .board()
            .cells()
            .filter(|cell| !cell.items().is_empty())
            .map(|cell| cell.position)
            .collect();
        let distance_to_item =
            |pos: Position| items.iter().map(|&item| pos.manhattan_distance(item)).min();

        let current = distance_to_item(origin)?;
        let best = candidates
            .into_iter()
            .filter_map(|pos| distance_to_item(pos).map(|distance| (distance, pos)))
            .min()?;
        if best.0 >= current {
            return None;
        }
        self.target = Some(best.1);
        Some(best.1)
    }
}
