//! # Board
//!
//! The fixed grid of cells the game is played on. Terrain is set once at
//! generation; occupants and items change through the board only.

use crate::game::{CharacterId, Item, ItemId, Position};
use crate::generation::{MapRecipe, TerrainMap};
use serde::{Deserialize, Serialize};

/// Terrain kinds a cell can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Plain,
    Forest,
    Mountain,
    Water,
    Dungeon,
    Lava,
    Ice,
}

impl TerrainKind {
    /// Movement points spent to enter a cell of this terrain.
    pub fn movement_cost(self) -> u32 {
        match self {
            TerrainKind::Plain | TerrainKind::Dungeon => 1,
            TerrainKind::Forest | TerrainKind::Ice | TerrainKind::Lava => 2,
            TerrainKind::Mountain | TerrainKind::Water => 3,
        }
    }

    /// Damage taken when a move ends on this terrain without a battle.
    pub fn hazard_damage(self) -> u32 {
        match self {
            TerrainKind::Lava => 5,
            TerrainKind::Ice => 3,
            TerrainKind::Water => 2,
            _ => 0,
        }
    }

    /// Relative movement difficulty, kept for presentation and tooling.
    pub fn movement_modifier(self) -> f32 {
        match self {
            TerrainKind::Plain | TerrainKind::Dungeon => 1.0,
            TerrainKind::Forest => 1.5,
            TerrainKind::Mountain => 2.0,
            TerrainKind::Water => 2.5,
            TerrainKind::Lava => 1.8,
            TerrainKind::Ice => 1.3,
        }
    }

    /// Relative combat advantage of fighting on this terrain.
    pub fn combat_modifier(self) -> f32 {
        match self {
            TerrainKind::Forest => 0.8,
            TerrainKind::Mountain => 1.2,
            TerrainKind::Lava => 1.3,
            TerrainKind::Ice => 0.9,
            _ => 1.0,
        }
    }

    /// Single-character glyph for text output.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Plain => '.',
            TerrainKind::Forest => '♣',
            TerrainKind::Mountain => '^',
            TerrainKind::Water => '~',
            TerrainKind::Dungeon => '#',
            TerrainKind::Lava => '%',
            TerrainKind::Ice => '*',
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    terrain: TerrainKind,
    pub movement_modifier: f32,
    pub combat_modifier: f32,
    occupants: Vec<CharacterId>,
    items: Vec<Item>,
}

impl Cell {
    /// Creates an empty cell with the given terrain.
    pub fn new(position: Position, terrain: TerrainKind) -> Self {
        Self {
            position,
            terrain,
            movement_modifier: terrain.movement_modifier(),
            combat_modifier: terrain.combat_modifier(),
            occupants: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    pub fn occupants(&self) -> &[CharacterId] {
        &self.occupants
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    /// Whether a character may step onto this cell.
    ///
    /// One occupant is allowed (stepping onto them starts a battle);
    /// a cell already holding a collision is closed.
    pub fn is_enterable(&self) -> bool {
        self.occupants.len() <= 1
    }

    fn add_occupant(&mut self, id: CharacterId) {
        self.occupants.push(id);
    }

    fn remove_occupant(&mut self, id: CharacterId) -> bool {
        match self.occupants.iter().position(|&occupant| occupant == id) {
            Some(index) => {
                self.occupants.remove(index);
                true
            }
            None => false,
        }
    }

    fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

/// The game board: a fixed `width × height` grid with one cell per coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    pub recipe: MapRecipe,
    /// Cells indexed as `cells[y][x]`
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Builds a board from generated terrain. Coordinates the map leaves
    /// unassigned become Plain.
    pub fn from_terrain(width: u32, height: u32, recipe: MapRecipe, terrain: &TerrainMap) -> Self {
        let cells = (0..height as i32)
            .map(|y| {
                (0..width as i32)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        let kind = terrain.get(&pos).copied().unwrap_or(TerrainKind::Plain);
                        Cell::new(pos, kind)
                    })
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            recipe,
            cells,
        }
    }

    /// Creates a board covered entirely by one terrain kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::{Board, Position, TerrainKind};
    ///
    /// let board = Board::filled(5, 5, TerrainKind::Plain);
    /// assert_eq!(board.cell(Position::new(4, 4)).unwrap().terrain(), TerrainKind::Plain);
    /// assert!(board.cell(Position::new(5, 0)).is_none());
    /// ```
    pub fn filled(width: u32, height: u32, terrain: TerrainKind) -> Self {
        let map: TerrainMap = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| (Position::new(x, y), terrain)))
            .collect();
        Self::from_terrain(width, height, MapRecipe::Custom, &map)
    }

    /// Checks if a position is inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the cell at a position, or None when out of range.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get(pos.y as usize)?.get(pos.x as usize)
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get_mut(pos.y as usize)?.get_mut(pos.x as usize)
    }

    /// Returns the in-grid cardinal neighbors of a position.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&neighbor| self.in_bounds(neighbor))
            .collect()
    }

    /// Iterates over every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Iterates over every coordinate, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().map(|cell| cell.position)
    }

    pub fn center(&self) -> Position {
        Position::new(self.width as i32 / 2, self.height as i32 / 2)
    }

    pub fn is_border(&self, pos: Position) -> bool {
        pos.x == 0
            || pos.y == 0
            || pos.x == self.width as i32 - 1
            || pos.y == self.height as i32 - 1
    }

    /// Total number of items lying on the board.
    pub fn item_count(&self) -> usize {
        self.cells().map(|cell| cell.items.len()).sum()
    }

    /// Adds a character to a cell. Returns false when out of range.
    pub fn add_occupant(&mut self, pos: Position, id: CharacterId) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.add_occupant(id);
                true
            }
            None => false,
        }
    }

    /// Removes a character from a cell if present.
    pub fn remove_occupant(&mut self, pos: Position, id: CharacterId) -> bool {
        self.cell_mut(pos)
            .map(|cell| cell.remove_occupant(id))
            .unwrap_or(false)
    }

    /// Moves a character between cells.
    pub fn relocate_occupant(&mut self, from: Position, to: Position, id: CharacterId) -> bool {
        if !self.in_bounds(to) {
            return false;
        }
        self.remove_occupant(from, id);
        self.add_occupant(to, id)
    }

    /// Places an item on the cell at its own position.
    pub fn add_item(&mut self, item: Item) -> bool {
        match self.cell_mut(item.position) {
            Some(cell) => {
                cell.add_item(item);
                true
            }
            None => false,
        }
    }

    /// Removes an item from a cell if present.
    pub fn remove_item(&mut self, pos: Position, id: ItemId) -> Option<Item> {
        self.cell_mut(pos)?.remove_item(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_character_id;

    #[test]
    fn test_terrain_costs() {
        assert_eq!(TerrainKind::Plain.movement_cost(), 1);
        assert_eq!(TerrainKind::Dungeon.movement_cost(), 1);
        assert_eq!(TerrainKind::Forest.movement_cost(), 2);
        assert_eq!(TerrainKind::Ice.movement_cost(), 2);
        assert_eq!(TerrainKind::Lava.movement_cost(), 2);
        assert_eq!(TerrainKind::Mountain.movement_cost(), 3);
        assert_eq!(TerrainKind::Water.movement_cost(), 3);
    }

    #[test]
    fn test_hazards() {
        assert_eq!(TerrainKind::Lava.hazard_damage(), 5);
        assert_eq!(TerrainKind::Ice.hazard_damage(), 3);
        assert_eq!(TerrainKind::Water.hazard_damage(), 2);
        assert_eq!(TerrainKind::Forest.hazard_damage(), 0);
    }

    #[test]
    fn test_cell_lookup_out_of_range() {
        let board = Board::filled(4, 3, TerrainKind::Plain);
        assert!(board.cell(Position::new(3, 2)).is_some());
        assert!(board.cell(Position::new(4, 0)).is_none());
        assert!(board.cell(Position::new(0, 3)).is_none());
        assert!(board.cell(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_neighbors_clip_to_grid() {
        let board = Board::filled(3, 3, TerrainKind::Plain);
        assert_eq!(board.neighbors(Position::new(1, 1)).len(), 4);
        assert_eq!(board.neighbors(Position::new(0, 0)).len(), 2);
        assert_eq!(board.neighbors(Position::new(2, 1)).len(), 3);
        assert!(board.neighbors(Position::new(10, 10)).is_empty());
    }

    #[test]
    fn test_missing_terrain_defaults_to_plain() {
        let mut terrain = TerrainMap::new();
        terrain.insert(Position::new(0, 0), TerrainKind::Lava);
        let board = Board::from_terrain(2, 2, MapRecipe::Custom, &terrain);
        assert_eq!(board.cell(Position::new(0, 0)).unwrap().terrain(), TerrainKind::Lava);
        assert_eq!(board.cell(Position::new(1, 1)).unwrap().terrain(), TerrainKind::Plain);
    }

    #[test]
    fn test_occupant_remove_is_idempotent() {
        let mut board = Board::filled(3, 3, TerrainKind::Plain);
        let id = new_character_id();
        let pos = Position::new(1, 1);

        assert!(board.add_occupant(pos, id));
        assert!(board.cell(pos).unwrap().is_occupied());
        assert!(board.remove_occupant(pos, id));
        assert!(!board.remove_occupant(pos, id));
        assert!(!board.cell(pos).unwrap().is_occupied());
    }

    #[test]
    fn test_enterable_allows_single_occupant() {
        let mut board = Board::filled(3, 3, TerrainKind::Plain);
        let pos = Position::new(1, 1);
        board.add_occupant(pos, new_character_id());
        assert!(board.cell(pos).unwrap().is_enterable());
        board.add_occupant(pos, new_character_id());
        assert!(!board.cell(pos).unwrap().is_enterable());
    }

    #[test]
    fn test_items_are_counted_and_removed() {
        let mut board = Board::filled(3, 3, TerrainKind::Plain);
        let item = Item::treasure(Position::new(2, 2));
        let id = item.id;
        assert!(board.add_item(item));
        assert_eq!(board.item_count(), 1);
        assert!(board.remove_item(Position::new(2, 2), id).is_some());
        assert!(board.remove_item(Position::new(2, 2), id).is_none());
        assert_eq!(board.item_count(), 0);
    }

    #[test]
    fn test_border_detection() {
        let board = Board::filled(5, 4, TerrainKind::Plain);
        assert!(board.is_border(Position::new(0, 2)));
        assert!(board.is_border(Position::new(4, 2)));
        assert!(board.is_border(Position::new(2, 3)));
        assert!(!board.is_border(Position::new(2, 2)));
        assert_eq!(board.center(), Position::new(2, 2));
    }
}
