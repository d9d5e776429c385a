//! # Command Definitions
//!
//! Game commands and their text syntax.

use crate::game::Position;
use crate::{DiceboundError, DiceboundResult};
use serde::{Deserialize, Serialize};

/// A command addressed to the active character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Roll the movement dice
    Roll,
    /// Move to an absolute board position
    Move(Position),
    /// Stop moving and enter the Action phase
    EndMovement,
    /// Pick up the first item in the current cell
    Pickup,
    /// Use the class ability
    UseAbility,
    /// Pass the turn
    EndTurn,
    /// Hand the turn to the character in this turn-order slot
    Select(usize),
}

/// Parses a game command.
///
/// Words are case-insensitive. Coordinates may be separated by spaces or
/// a comma.
///
/// # Examples
///
/// ```
/// use dicebound::{parse_command, Command, Position};
///
/// assert_eq!(parse_command("roll").unwrap(), Command::Roll);
/// assert_eq!(parse_command("move 3,4").unwrap(), Command::Move(Position::new(3, 4)));
/// assert_eq!(parse_command("Select 2").unwrap(), Command::Select(2));
/// assert!(parse_command("dance").is_err());
/// ```
pub fn parse_command(line: &str) -> DiceboundResult<Command> {
    let lowered = line.trim().to_lowercase();
    let mut words = lowered.split_whitespace();
    let verb = words
        .next()
        .ok_or_else(|| DiceboundError::InvalidCommand("empty command".to_string()))?;
    let args: Vec<&str> = words.collect();

    let command = match verb {
        "roll" | "r" => Command::Roll,
        "move" | "m" | "goto" => Command::Move(parse_position(&args)?),
        "stop" | "done" => Command::EndMovement,
        "pickup" | "take" | "p" => Command::Pickup,
        "ability" | "a" => Command::UseAbility,
        "end" | "pass" => Command::EndTurn,
        "select" => {
            let slot = args
                .first()
                .ok_or_else(|| DiceboundError::InvalidCommand("select needs a slot".to_string()))?;
            Command::Select(parse_number(slot)?)
        }
        other => {
            return Err(DiceboundError::InvalidCommand(format!(
                "unknown command '{}'",
                other
            )))
        }
    };
    Ok(command)
}

fn parse_position(args: &[&str]) -> DiceboundResult<Position> {
    let joined = args.join(" ");
    let parts: Vec<&str> = joined
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [x, y] => Ok(Position::new(parse_number(x)?, parse_number(y)?)),
        _ => Err(DiceboundError::InvalidCommand(
            "expected two coordinates".to_string(),
        )),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> DiceboundResult<T> {
    text.parse()
        .map_err(|_| DiceboundError::InvalidCommand(format!("'{}' is not a number", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("ROLL").unwrap(), Command::Roll);
        assert_eq!(parse_command("  pass ").unwrap(), Command::EndTurn);
        assert_eq!(parse_command("done").unwrap(), Command::EndMovement);
        assert_eq!(parse_command("take").unwrap(), Command::Pickup);
        assert_eq!(parse_command("ability").unwrap(), Command::UseAbility);
    }

    #[test]
    fn test_parse_move_forms() {
        let expected = Command::Move(Position::new(3, 12));
        assert_eq!(parse_command("move 3 12").unwrap(), expected);
        assert_eq!(parse_command("move 3,12").unwrap(), expected);
        assert_eq!(parse_command("m 3, 12").unwrap(), expected);
        assert!(parse_command("move 3").is_err());
        assert!(parse_command("move a b").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_command(""), Err(DiceboundError::InvalidCommand(_))));
        assert!(parse_command("select").is_err());
        assert!(parse_command("select -1").is_err());
        assert!(parse_command("jump").is_err());
    }
}
