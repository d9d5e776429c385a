//! # Items
//!
//! Things lying on the board: treasures, traps, potions and mystery cards.

use crate::game::{new_item_id, ItemId, Position};
use serde::{Deserialize, Serialize};

/// Treasure value used by generated treasures.
pub const DEFAULT_TREASURE_VALUE: u32 = 50;

/// Damage dealt by generated traps.
pub const DEFAULT_TRAP_DAMAGE: u32 = 20;

/// Health restored by generated potions.
pub const DEFAULT_POTION_HEAL: u32 = 20;

/// Item kind together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Treasure { value: u32 },
    Trap { damage: u32 },
    HealthPotion { heal: u32 },
    /// Draws a chance card when picked up
    MysteryCard,
}

impl ItemKind {
    /// Default display name for an item of this kind.
    pub fn default_name(&self) -> &'static str {
        match self {
            ItemKind::Treasure { .. } => "Treasure",
            ItemKind::Trap { .. } => "Trap",
            ItemKind::HealthPotion { .. } => "Health Potion",
            ItemKind::MysteryCard => "Mystery Card",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            ItemKind::Treasure { .. } => '$',
            ItemKind::Trap { .. } => '!',
            ItemKind::HealthPotion { .. } => '+',
            ItemKind::MysteryCard => '?',
        }
    }
}

/// An item on the board or in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub position: Position,
}

impl Item {
    /// Creates an item with the default name for its kind.
    pub fn new(kind: ItemKind, position: Position) -> Self {
        Self {
            id: new_item_id(),
            name: kind.default_name().to_string(),
            kind,
            position,
        }
    }

    pub fn treasure(position: Position) -> Self {
        Self::new(
            ItemKind::Treasure {
                value: DEFAULT_TREASURE_VALUE,
            },
            position,
        )
    }

    pub fn trap(position: Position) -> Self {
        Self::new(
            ItemKind::Trap {
                damage: DEFAULT_TRAP_DAMAGE,
            },
            position,
        )
    }

    pub fn health_potion(position: Position) -> Self {
        Self::new(
            ItemKind::HealthPotion {
                heal: DEFAULT_POTION_HEAL,
            },
            position,
        )
    }

    pub fn mystery_card(position: Position) -> Self {
        Self::new(ItemKind::MysteryCard, position)
    }

    pub fn is_treasure(&self) -> bool {
        matches!(self.kind, ItemKind::Treasure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payloads() {
        let pos = Position::new(1, 2);
        assert_eq!(Item::treasure(pos).kind, ItemKind::Treasure { value: 50 });
        assert_eq!(Item::trap(pos).kind, ItemKind::Trap { damage: 20 });
        assert_eq!(Item::health_potion(pos).kind, ItemKind::HealthPotion { heal: 20 });
        assert_eq!(Item::mystery_card(pos).name, "Mystery Card");
    }

    #[test]
    fn test_only_treasures_count_as_treasure() {
        let pos = Position::new(0, 0);
        assert!(Item::treasure(pos).is_treasure());
        assert!(!Item::trap(pos).is_treasure());
        assert!(!Item::mystery_card(pos).is_treasure());
    }
}
