//! # Input Module
//!
//! Text input handling for the interactive CLI.

pub mod commands;

pub use commands::*;

use crate::game::{Direction, GameState};
use crate::{DiceboundError, DiceboundResult};

/// Input handler for processing player lines.
///
/// Turns a line of text into a [`PlayerInput`]; single-step shortcuts are
/// resolved against the active character's position.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether compass letters (n/s/e/w) step one cell
    pub compass_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::{InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse("quit").unwrap(), PlayerInput::Quit);
    /// ```
    pub fn new() -> Self {
        Self {
            compass_keys_enabled: true,
        }
    }

    /// Parses one line of player input.
    pub fn parse(&self, line: &str) -> DiceboundResult<PlayerInput> {
        let word = line.trim().to_lowercase();
        let input = match word.as_str() {
            "quit" | "exit" | "q" => PlayerInput::Quit,
            "help" | "?" => PlayerInput::Help,
            "status" | "stat" => PlayerInput::Status,
            "s" if !self.compass_keys_enabled => PlayerInput::Status,
            "board" | "map" => PlayerInput::ShowBoard,
            "n" | "north" if self.compass_keys_enabled => PlayerInput::Step(Direction::North),
            "s" | "south" if self.compass_keys_enabled => PlayerInput::Step(Direction::South),
            "e" | "east" if self.compass_keys_enabled => PlayerInput::Step(Direction::East),
            "w" | "west" if self.compass_keys_enabled => PlayerInput::Step(Direction::West),
            _ => PlayerInput::Command(parse_command(&word)?),
        };
        Ok(input)
    }

    /// Converts player input to a game command.
    ///
    /// Inputs that only concern the presentation return `None`.
    pub fn input_to_command(
        &self,
        input: PlayerInput,
        game_state: &GameState,
    ) -> DiceboundResult<Option<Command>> {
        match input {
            PlayerInput::Command(command) => Ok(Some(command)),
            PlayerInput::Step(direction) => {
                let active = game_state
                    .active_character()
                    .ok_or(DiceboundError::NoActiveCharacter)?;
                Ok(Some(Command::Move(active.position + direction.to_delta())))
            }
            _ => Ok(None),
        }
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// A game command
    Command(Command),
    /// Move one cell in a direction
    Step(Direction),
    /// Show the active character and timer
    Status,
    /// Redraw the board
    ShowBoard,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

/// Help text for the interactive CLI.
pub const HELP_TEXT: &str = "\
Commands:
  roll                 roll movement dice
  move X Y             move to a reachable cell
  n / s / e / w        step one cell
  done                 stop moving
  pickup               pick up the first item here
  ability              use the class ability
  pass                 end the turn
  select N             hand the turn to turn-order slot N
  status | board       show the game
  help | quit";
