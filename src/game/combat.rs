//! # Combat
//!
//! Battles between two characters that end up on the same cell. A battle is
//! always three rounds of opposed d20 rolls.

use crate::config;
use crate::utils::ceil_half;
use crate::{Character, CharacterClass, CharacterId, DiceRoller, Item};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Which side won a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Attacker,
    Defender,
    Tie,
}

/// One round of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRound {
    pub number: usize,
    pub attacker_roll: u32,
    pub defender_roll: u32,
    pub result: RoundResult,
    /// Damage actually dealt (zero on ties and evasions)
    pub damage: u32,
    /// Character hit this round, if anyone
    pub target: Option<CharacterId>,
    pub evaded: bool,
}

/// Full account of a resolved battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub attacker: CharacterId,
    pub defender: CharacterId,
    pub rounds: Vec<BattleRound>,
    pub attacker_wins: usize,
    pub defender_wins: usize,
    /// None on a draw
    pub winner: Option<CharacterId>,
    pub loser: Option<CharacterId>,
    /// Combatants dead at the end of the battle
    pub casualties: Vec<CharacterId>,
}

impl BattleRecord {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// True when exactly one combatant died.
    pub fn is_decisive(&self) -> bool {
        self.casualties.len() == 1
    }
}

/// Fights a full battle, applying damage and consuming ability modifiers.
///
/// A round's loser takes the base damage plus the winner's pending bonus
/// (consumed even if the hit is evaded) plus the Mage bonus. An active
/// evasion cancels the whole hit and is used up.
///
/// When exactly one side is dead afterwards, that side is the loser
/// regardless of round counts.
pub fn resolve_battle(
    attacker: &mut Character,
    defender: &mut Character,
    dice: &mut dyn DiceRoller,
) -> BattleRecord {
    info!("Battle: {} attacks {}", attacker.name, defender.name);

    let mut rounds = Vec::with_capacity(config::BATTLE_ROUNDS);
    let mut attacker_wins = 0;
    let mut defender_wins = 0;

    for number in 1..=config::BATTLE_ROUNDS {
        let attacker_roll = dice.d20();
        let defender_roll = dice.d20();

        let round = if attacker_roll > defender_roll {
            attacker_wins += 1;
            strike(number, attacker_roll, defender_roll, RoundResult::Attacker, attacker, defender)
        } else if defender_roll > attacker_roll {
            defender_wins += 1;
            strike(number, attacker_roll, defender_roll, RoundResult::Defender, defender, attacker)
        } else {
            BattleRound {
                number,
                attacker_roll,
                defender_roll,
                result: RoundResult::Tie,
                damage: 0,
                target: None,
                evaded: false,
            }
        };
        debug!(
            "Round {}: {} vs {} -> {:?} ({} damage)",
            number, attacker_roll, defender_roll, round.result, round.damage
        );
        rounds.push(round);
    }

    let casualties: Vec<CharacterId> = [&*attacker, &*defender]
        .into_iter()
        .filter(|character| !character.is_alive())
        .map(|character| character.id)
        .collect();

    let (winner, loser) = match (attacker.is_alive(), defender.is_alive()) {
        (true, false) => (Some(attacker.id), Some(defender.id)),
        (false, true) => (Some(defender.id), Some(attacker.id)),
        _ if attacker_wins > defender_wins => (Some(attacker.id), Some(defender.id)),
        _ if defender_wins > attacker_wins => (Some(defender.id), Some(attacker.id)),
        _ => (None, None),
    };

    match winner {
        Some(id) if id == attacker.id => info!("{} wins the battle", attacker.name),
        Some(_) => info!("{} wins the battle", defender.name),
        None => info!("Battle between {} and {} is a draw", attacker.name, defender.name),
    }

    BattleRecord {
        attacker: attacker.id,
        defender: defender.id,
        rounds,
        attacker_wins,
        defender_wins,
        winner,
        loser,
        casualties,
    }
}

fn strike(
    number: usize,
    attacker_roll: u32,
    defender_roll: u32,
    result: RoundResult,
    winner: &mut Character,
    loser: &mut Character,
) -> BattleRound {
    let mut damage = config::BASE_ROUND_DAMAGE + std::mem::take(&mut winner.pending_bonus);
    if winner.class == CharacterClass::Mage {
        damage += config::MAGE_ROUND_BONUS;
    }

    let evaded = std::mem::take(&mut loser.evasion_active);
    if evaded {
        damage = 0;
    } else {
        loser.take_damage(damage);
    }

    BattleRound {
        number,
        attacker_roll,
        defender_roll,
        result,
        damage,
        target: Some(loser.id),
        evaded,
    }
}

/// Moves `ceil(n / 2)` of the loser's treasures to the winner, oldest first.
/// Returns the transferred items.
pub fn transfer_spoils(winner: &mut Character, loser: &mut Character) -> Vec<Item> {
    let count = ceil_half(loser.treasure_count());
    let spoils = loser.take_treasures(count);
    for item in &spoils {
        let mut item = item.clone();
        item.position = winner.position;
        winner.inventory.push(item);
    }
    spoils
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, ScriptedDice};

    fn pair(attacker: CharacterClass, defender: CharacterClass) -> (Character, Character) {
        let pos = Position::new(1, 1);
        (
            Character::new("Attacker", attacker, pos),
            Character::new("Defender", defender, pos),
        )
    }

    #[test]
    fn test_rounds_and_damage() {
        let (mut a, mut d) = pair(CharacterClass::Warrior, CharacterClass::Cleric);
        let mut dice = ScriptedDice::new([18, 5, 3, 20, 10, 10]);

        let record = resolve_battle(&mut a, &mut d, &mut dice);
        assert_eq!(record.rounds.len(), 3);
        assert_eq!(record.rounds[0].result, RoundResult::Attacker);
        assert_eq!(record.rounds[1].result, RoundResult::Defender);
        assert_eq!(record.rounds[2].result, RoundResult::Tie);
        assert_eq!(record.rounds[2].damage, 0);
        assert_eq!(d.health(), 90);
        assert_eq!(a.health(), 90);
        assert_eq!((record.attacker_wins, record.defender_wins), (1, 1));
        assert!(record.is_draw());
        assert!(record.casualties.is_empty());
    }

    #[test]
    fn test_mage_bonus() {
        let (mut a, mut d) = pair(CharacterClass::Mage, CharacterClass::Rogue);
        let mut dice = ScriptedDice::new([18, 5, 18, 5, 1, 2]);
        let record = resolve_battle(&mut a, &mut d, &mut dice);
        assert_eq!(d.health(), 70);
        assert_eq!(a.health(), 90);
        assert_eq!(record.winner, Some(a.id));
        assert_eq!(record.loser, Some(d.id));
    }

    #[test]
    fn test_pending_bonus_used_once() {
        let (mut a, mut d) = pair(CharacterClass::Warrior, CharacterClass::Cleric);
        a.pending_bonus = 20;
        let mut dice = ScriptedDice::new([20, 1, 20, 1, 20, 1]);
        let record = resolve_battle(&mut a, &mut d, &mut dice);
        assert_eq!(record.rounds[0].damage, 30);
        assert_eq!(record.rounds[1].damage, 10);
        assert_eq!(a.pending_bonus, 0);
        assert_eq!(d.health(), 50);
    }

    #[test]
    fn test_evasion_consumes_bonus_and_one_round() {
        let (mut a, mut d) = pair(CharacterClass::Warrior, CharacterClass::Rogue);
        a.pending_bonus = 20;
        d.evasion_active = true;
        let mut dice = ScriptedDice::new([20, 1, 20, 1, 5, 5]);
        let record = resolve_battle(&mut a, &mut d, &mut dice);

        assert!(record.rounds[0].evaded);
        assert_eq!(record.rounds[0].damage, 0);
        assert_eq!(a.pending_bonus, 0);
        assert!(!d.evasion_active);
        assert_eq!(record.rounds[1].damage, 10);
        assert_eq!(d.health(), 90);
    }

    #[test]
    fn test_dead_side_loses_regardless_of_rounds() {
        let (mut a, mut d) = pair(CharacterClass::Warrior, CharacterClass::Mage);
        a.take_damage(85);
        // Defender wins once with the Mage bonus; attacker wins twice
        let mut dice = ScriptedDice::new([1, 20, 20, 1, 20, 1]);
        let record = resolve_battle(&mut a, &mut d, &mut dice);

        assert_eq!(record.attacker_wins, 2);
        assert_eq!(record.casualties, vec![a.id]);
        assert!(record.is_decisive());
        assert_eq!(record.winner, Some(d.id));
        assert_eq!(record.loser, Some(a.id));
    }

    #[test]
    fn test_transfer_spoils_half_rounded_up() {
        let (mut winner, mut loser) = pair(CharacterClass::Rogue, CharacterClass::Cleric);
        for _ in 0..3 {
            loser.inventory.push(Item::treasure(Position::new(0, 0)));
        }
        let spoils = transfer_spoils(&mut winner, &mut loser);
        assert_eq!(spoils.len(), 2);
        assert_eq!(winner.treasure_count(), 2);
        assert_eq!(loser.treasure_count(), 1);

        let (mut winner, mut loser) = pair(CharacterClass::Rogue, CharacterClass::Cleric);
        assert!(transfer_spoils(&mut winner, &mut loser).is_empty());
    }
}
