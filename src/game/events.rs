//! # Game Events
//!
//! Notifications returned by every command. The presentation layer reacts to
//! these; it never has to diff game state.

use crate::{
    Ability, BattleRecord, ChanceCard, CharacterId, Item, MapRecipe, Position, TerrainKind,
    TurnPhase,
};
use serde::{Deserialize, Serialize};

/// Something that happened in the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted {
        seed: u64,
        recipe: MapRecipe,
        width: u32,
        height: u32,
        turn_order: Vec<CharacterId>,
    },
    TurnStarted {
        character: CharacterId,
        turn: u32,
    },
    PhaseChanged {
        phase: TurnPhase,
    },
    DiceRolled {
        character: CharacterId,
        points: u32,
    },
    CharacterMoved {
        character: CharacterId,
        from: Position,
        to: Position,
        cost: u32,
        remaining: u32,
    },
    HazardDamage {
        character: CharacterId,
        terrain: TerrainKind,
        damage: u32,
    },
    BattleStarted {
        attacker: CharacterId,
        defender: CharacterId,
        position: Position,
    },
    BattleResolved {
        record: BattleRecord,
    },
    TreasureTransferred {
        from: CharacterId,
        to: CharacterId,
        count: usize,
    },
    CharacterDied {
        character: CharacterId,
        position: Position,
    },
    ItemPickedUp {
        character: CharacterId,
        item: Item,
    },
    TrapTriggered {
        character: CharacterId,
        damage: u32,
    },
    Healed {
        character: CharacterId,
        amount: u32,
    },
    ChanceCardDrawn {
        character: CharacterId,
        card: ChanceCard,
    },
    Teleported {
        character: CharacterId,
        from: Position,
        to: Position,
    },
    AbilityUsed {
        character: CharacterId,
        ability: Ability,
    },
    ItemsReplenished {
        count: usize,
    },
    TimerExpired {
        character: CharacterId,
    },
    TurnEnded {
        character: CharacterId,
        turn: u32,
    },
    Victory {
        winner: CharacterId,
        treasures: usize,
    },
    AllDefeated,
}

impl GameEvent {
    /// Whether the event ends the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Victory { .. } | GameEvent::AllDefeated)
    }
}

/// Running totals over a game's events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Turns that have ended
    pub turns_played: u32,
    pub moves_made: u32,
    /// Movement points spent on moves
    pub movement_spent: u64,
    pub battles_fought: u32,
    pub battle_draws: u32,
    /// Damage dealt in battle rounds
    pub battle_damage: u64,
    pub hazard_damage: u64,
    pub trap_damage: u64,
    pub health_restored: u64,
    pub characters_died: u32,
    pub items_collected: u32,
    pub treasures_transferred: u32,
    pub cards_drawn: u32,
    pub abilities_used: u32,
    pub timer_expirations: u32,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CharacterMoved { cost, .. } => {
                self.moves_made += 1;
                self.movement_spent += *cost as u64;
            }
            GameEvent::HazardDamage { damage, .. } => {
                self.hazard_damage += *damage as u64;
            }
            GameEvent::BattleResolved { record } => {
                self.battles_fought += 1;
                if record.is_draw() {
                    self.battle_draws += 1;
                }
                self.battle_damage += record
                    .rounds
                    .iter()
                    .map(|round| round.damage as u64)
                    .sum::<u64>();
            }
            GameEvent::TreasureTransferred { count, .. } => {
                self.treasures_transferred += *count as u32;
            }
            GameEvent::CharacterDied { .. } => {
                self.characters_died += 1;
            }
            GameEvent::ItemPickedUp { .. } => {
                self.items_collected += 1;
            }
            GameEvent::TrapTriggered { damage, .. } => {
                self.trap_damage += *damage as u64;
            }
            GameEvent::Healed { amount, .. } => {
                self.health_restored += *amount as u64;
            }
            GameEvent::ChanceCardDrawn { .. } => {
                self.cards_drawn += 1;
            }
            GameEvent::AbilityUsed { .. } => {
                self.abilities_used += 1;
            }
            GameEvent::TimerExpired { .. } => {
                self.timer_expirations += 1;
            }
            GameEvent::TurnEnded { .. } => {
                self.turns_played += 1;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_character_id;

    #[test]
    fn test_statistics_track_events() {
        let character = new_character_id();
        let mut stats = GameStatistics::new();

        stats.update_from_event(&GameEvent::CharacterMoved {
            character,
            from: Position::new(0, 0),
            to: Position::new(1, 0),
            cost: 2,
            remaining: 1,
        });
        stats.update_from_event(&GameEvent::Healed { character, amount: 25 });
        stats.update_from_event(&GameEvent::TurnEnded { character, turn: 1 });
        stats.update_from_event(&GameEvent::AllDefeated);

        assert_eq!(stats.moves_made, 1);
        assert_eq!(stats.movement_spent, 2);
        assert_eq!(stats.health_restored, 25);
        assert_eq!(stats.turns_played, 1);
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = GameEvent::ItemsReplenished { count: 3 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"ItemsReplenished\""));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(GameEvent::AllDefeated.is_terminal());
    }
}
