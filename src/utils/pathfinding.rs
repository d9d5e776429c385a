//! # Pathfinding Algorithms
//!
//! Cost-aware searches over the board. Entering a cell costs its terrain's
//! movement cost; which cells may be entered is decided by the caller.

use crate::{Board, Cell, Position};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Minimum cost of reaching every cell within `budget` of `origin`.
///
/// Runs Dijkstra from `origin`, expanding only into cells accepted by
/// `passable`. The origin itself is included with cost 0.
pub fn costs_within<F>(board: &Board, origin: Position, budget: u32, passable: F) -> HashMap<Position, u32>
where
    F: Fn(&Cell) -> bool,
{
    let mut best: HashMap<Position, u32> = HashMap::new();
    if board.cell(origin).is_none() {
        return best;
    }

    let mut open_set = BinaryHeap::new();
    best.insert(origin, 0);
    open_set.push(CostNode {
        position: origin,
        cost: 0,
    });

    while let Some(CostNode { position, cost }) = open_set.pop() {
        // Stale heap entry
        if best.get(&position).is_some_and(|&known| cost > known) {
            continue;
        }

        for neighbor in board.neighbors(position) {
            let Some(cell) = board.cell(neighbor) else {
                continue;
            };
            if !passable(cell) {
                continue;
            }

            let next_cost = cost + cell.terrain().movement_cost();
            if next_cost > budget {
                continue;
            }
            if best.get(&neighbor).map_or(true, |&known| next_cost < known) {
                best.insert(neighbor, next_cost);
                open_set.push(CostNode {
                    position: neighbor,
                    cost: next_cost,
                });
            }
        }
    }

    best
}

/// Cheapest path from `from` to `to` using A* with a Manhattan heuristic.
///
/// The returned path starts at `from` and ends at `to`. `from == to` yields
/// `([to], 0)`. Returns None when `to` cannot be reached.
pub fn cheapest_path<F>(board: &Board, from: Position, to: Position, passable: F) -> Option<(Vec<Position>, u32)>
where
    F: Fn(&Cell) -> bool,
{
    if from == to {
        return Some((vec![to], 0));
    }
    board.cell(from)?;
    if !passable(board.cell(to)?) {
        return None;
    }

    ::pathfinding::prelude::astar(
        &from,
        |&position| {
            board
                .neighbors(position)
                .into_iter()
                .filter_map(|neighbor| {
                    let cell = board.cell(neighbor)?;
                    passable(cell).then(|| (neighbor, cell.terrain().movement_cost()))
                })
                .collect::<Vec<_>>()
        },
        // Every step costs at least 1, so Manhattan distance never overestimates
        |&position| position.manhattan_distance(to),
        |&position| position == to,
    )
}

/// Open-set entry for the Dijkstra expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CostNode {
    position: Position,
    cost: u32,
}

impl PartialOrd for CostNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.position.cmp(&other.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_character_id, MapRecipe, TerrainKind, TerrainMap};

    fn open(_: &Cell) -> bool {
        true
    }

    fn board_with(width: u32, height: u32, cells: &[(i32, i32, TerrainKind)]) -> Board {
        let mut map = TerrainMap::new();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                map.insert(Position::new(x, y), TerrainKind::Plain);
            }
        }
        for &(x, y, kind) in cells {
            map.insert(Position::new(x, y), kind);
        }
        Board::from_terrain(width, height, MapRecipe::Custom, &map)
    }

    #[test]
    fn test_costs_within_plain_diamond() {
        let board = Board::filled(5, 5, TerrainKind::Plain);
        let costs = costs_within(&board, Position::new(2, 2), 2, open);
        // Origin plus the 12 cells within Manhattan distance 2
        assert_eq!(costs.len(), 13);
        assert_eq!(costs[&Position::new(2, 2)], 0);
        assert_eq!(costs[&Position::new(0, 2)], 2);
        assert!(!costs.contains_key(&Position::new(0, 0)));
    }

    #[test]
    fn test_costs_through_mountain() {
        // Crossing the mountain and walking around it both cost 4
        let board = board_with(4, 3, &[(1, 1, TerrainKind::Mountain)]);
        let costs = costs_within(&board, Position::new(0, 1), 10, open);
        assert_eq!(costs[&Position::new(1, 1)], 3);
        assert_eq!(costs[&Position::new(2, 1)], 4);
    }

    #[test]
    fn test_passable_filter_blocks_cells() {
        let mut board = Board::filled(3, 1, TerrainKind::Plain);
        board.add_occupant(Position::new(1, 0), new_character_id());
        board.add_occupant(Position::new(1, 0), new_character_id());
        let costs = costs_within(&board, Position::new(0, 0), 5, Cell::is_enterable);
        assert_eq!(costs.len(), 1);
    }

    #[test]
    fn test_cheapest_path_same_cell() {
        let board = Board::filled(3, 3, TerrainKind::Plain);
        let pos = Position::new(1, 1);
        assert_eq!(cheapest_path(&board, pos, pos, open), Some((vec![pos], 0)));
    }

    #[test]
    fn test_cheapest_path_through_forest() {
        let board = board_with(
            3,
            3,
            &[(1, 0, TerrainKind::Forest), (1, 1, TerrainKind::Forest)],
        );
        let (path, cost) =
            cheapest_path(&board, Position::new(0, 0), Position::new(2, 0), open).unwrap();
        // Through the forest costs 2 + 1; around it via row 2 costs 6.
        assert_eq!(cost, 3);
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(2, 0)));
    }

    #[test]
    fn test_cheapest_path_unreachable() {
        let board = board_with(3, 1, &[(1, 0, TerrainKind::Water)]);
        let dry = |cell: &Cell| cell.terrain() != TerrainKind::Water;
        assert!(cheapest_path(&board, Position::new(0, 0), Position::new(2, 0), dry).is_none());
        assert!(cheapest_path(&board, Position::new(0, 0), Position::new(9, 0), open).is_none());
    }
}
