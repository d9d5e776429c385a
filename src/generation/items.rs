//! # Item Generation
//!
//! Stocks the board with items, both at setup and after every pickup.

use crate::config;
use crate::game::{Board, Item, ItemKind, Position, TerrainKind};
use crate::game::{DEFAULT_POTION_HEAL, DEFAULT_TRAP_DAMAGE, DEFAULT_TREASURE_VALUE};
use crate::utils::weighted_index;
use log::debug;
use rand::Rng;

/// Percent chances of potion, treasure, mystery card and trap.
pub const ITEM_KIND_WEIGHTS: [u32; 4] = [10, 30, 50, 10];

/// Places items until the board holds a target count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemGenerator {
    pub target: usize,
}

impl ItemGenerator {
    pub fn new(target: usize) -> Self {
        Self { target }
    }

    /// Rolls an item kind from [`ITEM_KIND_WEIGHTS`].
    pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> ItemKind {
        match weighted_index(&ITEM_KIND_WEIGHTS, rng.gen_range(0..100)) {
            0 => ItemKind::HealthPotion {
                heal: DEFAULT_POTION_HEAL,
            },
            1 => ItemKind::Treasure {
                value: DEFAULT_TREASURE_VALUE,
            },
            2 => ItemKind::MysteryCard,
            _ => ItemKind::Trap {
                damage: DEFAULT_TRAP_DAMAGE,
            },
        }
    }

    /// Cells an item may be placed on: inside the border, dry, with no
    /// occupant and no item.
    pub fn candidates(board: &Board) -> Vec<Position> {
        board
            .cells()
            .filter(|cell| {
                !cell.is_occupied()
                    && cell.items().is_empty()
                    && cell.terrain() != TerrainKind::Water
                    && !board.is_border(cell.position)
            })
            .map(|cell| cell.position)
            .collect()
    }

    /// Tops the board up to the target count. Stops early when no candidate
    /// cell is left. Returns the items placed.
    pub fn replenish<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) -> Vec<Item> {
        let mut placed = Vec::new();
        let mut candidates = Self::candidates(board);

        while board.item_count() < self.target && !candidates.is_empty() {
            let pos = candidates.swap_remove(rng.gen_range(0..candidates.len()));
            let item = Item::new(Self::random_kind(rng), pos);
            if board.add_item(item.clone()) {
                placed.push(item);
            }
        }

        if !placed.is_empty() {
            debug!(
                "Placed {} items ({} on board)",
                placed.len(),
                board.item_count()
            );
        }
        placed
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new(config::ITEM_TARGET)
    }
}
