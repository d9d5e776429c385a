//! # Characters
//!
//! Heroes, their classes and class abilities.
//!
//! Per-turn movement state (rolled points and reachable set) and ability
//! state live on the character itself so that nothing outside the roster
//! needs to be keyed by character.

use crate::config;
use crate::game::{new_character_id, CharacterId, Item, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Hero classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Class abilities, one per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    /// +20 damage on the next won battle round
    ExtraStrength,
    /// +5 damage on the next won battle round
    ArcaneStrike,
    /// Ignore the damage of the next lost battle round
    Evasion,
    /// Restore 25 health
    SelfHeal,
}

impl CharacterClass {
    /// All classes in setup order.
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn ability(self) -> Ability {
        match self {
            CharacterClass::Warrior => Ability::ExtraStrength,
            CharacterClass::Mage => Ability::ArcaneStrike,
            CharacterClass::Rogue => Ability::Evasion,
            CharacterClass::Cleric => Ability::SelfHeal,
        }
    }

    /// Wall-clock time before the ability can be used again.
    pub fn ability_cooldown(self) -> Duration {
        let secs = match self {
            CharacterClass::Warrior => 60,
            CharacterClass::Mage => 90,
            CharacterClass::Rogue => 110,
            CharacterClass::Cleric => 98,
        };
        Duration::from_secs(secs)
    }

    /// One-time (max health, speed) bonus applied at game setup.
    pub fn setup_bonus(self) -> (u32, i32) {
        match self {
            CharacterClass::Warrior => (30, 1),
            CharacterClass::Mage => (0, 1),
            CharacterClass::Rogue => (0, 2),
            CharacterClass::Cleric => (10, 0),
        }
    }

    /// Movement roll adjustment on top of `speed - 3`.
    pub fn movement_modifier(self, armored: bool) -> i32 {
        match self {
            CharacterClass::Rogue => 1,
            CharacterClass::Warrior if armored => -1,
            _ => 0,
        }
    }
}

impl Ability {
    pub const EXTRA_STRENGTH_BONUS: u32 = 20;
    pub const ARCANE_STRIKE_BONUS: u32 = 5;
    pub const SELF_HEAL_AMOUNT: u32 = 25;

    pub fn name(self) -> &'static str {
        match self {
            Ability::ExtraStrength => "Extra Strength",
            Ability::ArcaneStrike => "Arcane Strike",
            Ability::Evasion => "Evasion",
            Ability::SelfHeal => "Self Heal",
        }
    }
}

/// Worn gear. Armor slows Warriors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub armor: Option<String>,
}

impl Equipment {
    pub fn has_armor(&self) -> bool {
        self.armor.is_some()
    }
}

/// A hero on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub position: Position,
    health: u32,
    max_health: u32,
    pub speed: i32,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,

    // Per-turn transient state
    pub has_rolled: bool,
    pub ability_used: bool,
    pub movement_points: Option<u32>,
    pub reachable: HashSet<Position>,

    // Battle modifiers set by abilities
    pub pending_bonus: u32,
    pub evasion_active: bool,

    /// Game-clock timestamp of the last ability use
    pub last_ability_use: Option<Duration>,
    alive: bool,
}

impl Character {
    /// Creates a hero with base stats and no class bonus applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::{Character, CharacterClass, Position};
    ///
    /// let hero = Character::new("Hero", CharacterClass::Mage, Position::new(2, 2));
    /// assert_eq!(hero.health(), 100);
    /// assert_eq!(hero.speed, 3);
    /// assert!(hero.is_alive());
    /// ```
    pub fn new(name: impl Into<String>, class: CharacterClass, position: Position) -> Self {
        Self {
            id: new_character_id(),
            name: name.into(),
            class,
            position,
            health: config::DEFAULT_HERO_HEALTH,
            max_health: config::DEFAULT_HERO_HEALTH,
            speed: 3,
            equipment: Equipment::default(),
            inventory: Vec::new(),
            has_rolled: false,
            ability_used: false,
            movement_points: None,
            reachable: HashSet::new(),
            pending_bonus: 0,
            evasion_active: false,
            last_ability_use: None,
            alive: true,
        }
    }

    /// Creates a hero and applies the class setup bonus.
    pub fn with_class_bonuses(
        name: impl Into<String>,
        class: CharacterClass,
        position: Position,
    ) -> Self {
        let mut character = Self::new(name, class, position);
        let (health_bonus, speed_bonus) = class.setup_bonus();
        character.max_health += health_bonus;
        character.health += health_bonus;
        character.speed += speed_bonus;
        character
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Applies damage, flooring health at 0. Returns true if this killed
    /// the character.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Heals up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    pub fn treasure_count(&self) -> usize {
        self.inventory.iter().filter(|item| item.is_treasure()).count()
    }

    /// Removes up to `count` treasures from the inventory, oldest first.
    pub fn take_treasures(&mut self, count: usize) -> Vec<Item> {
        let mut taken = Vec::new();
        let mut index = 0;
        while taken.len() < count && index < self.inventory.len() {
            if self.inventory[index].is_treasure() {
                taken.push(self.inventory.remove(index));
            } else {
                index += 1;
            }
        }
        taken
    }

    /// Remaining cooldown at `now`, or None if the ability is ready.
    pub fn ability_cooldown_remaining(&self, now: Duration) -> Option<Duration> {
        let last = self.last_ability_use?;
        let ready_at = last + self.class.ability_cooldown();
        if now >= ready_at {
            None
        } else {
            Some(ready_at - now)
        }
    }

    /// Applies the class ability. Cooldown and once-per-turn checks are the
    /// caller's responsibility. Returns the health restored, if any.
    pub fn activate_ability(&mut self, now: Duration) -> u32 {
        self.ability_used = true;
        self.last_ability_use = Some(now);
        match self.class.ability() {
            Ability::ExtraStrength => {
                self.pending_bonus += Ability::EXTRA_STRENGTH_BONUS;
                0
            }
            Ability::ArcaneStrike => {
                self.pending_bonus += Ability::ARCANE_STRIKE_BONUS;
                0
            }
            Ability::Evasion => {
                self.evasion_active = true;
                0
            }
            Ability::SelfHeal => self.heal(Ability::SELF_HEAL_AMOUNT),
        }
    }

    /// Clears the per-turn flags. Battle modifiers persist until consumed.
    pub fn reset_turn(&mut self) {
        self.has_rolled = false;
        self.ability_used = false;
        self.movement_points = None;
        self.reachable.clear();
    }
}
