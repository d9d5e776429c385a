//! # Spawn Points
//!
//! Starting cells for the heroes, one per board edge.

use super::border_midpoints;
use crate::config;
use crate::game::{Board, Position, TerrainKind};
use log::warn;

/// Finds one dry, free starting cell per edge: left, right, top, bottom.
///
/// Each probe starts at the edge midpoint and walks inward until it finds a
/// non-Water cell that is unoccupied and not already chosen. Edges with no
/// such cell take the free dry cell nearest the board center instead. When
/// the board has fewer free dry cells than heroes, the rest share the
/// center, so the result always holds exactly four points.
///
/// # Examples
///
/// ```
/// use dicebound::{safe_spawn_points, Board, Position, TerrainKind};
///
/// let board = Board::filled(7, 5, TerrainKind::Plain);
/// let points = safe_spawn_points(&board);
/// assert_eq!(points[0], Position::new(0, 2));
/// assert_eq!(points[3], Position::new(3, 4));
/// ```
pub fn safe_spawn_points(board: &Board) -> Vec<Position> {
    let mut points: Vec<Position> = Vec::with_capacity(config::HERO_COUNT);
    let max_steps = board.width.max(board.height);

    for (start, step) in border_midpoints(board.width, board.height) {
        let mut pos = start;
        for _ in 0..max_steps {
            let Some(cell) = board.cell(pos) else {
                break;
            };
            if cell.terrain() != TerrainKind::Water && !cell.is_occupied() && !points.contains(&pos) {
                points.push(pos);
                break;
            }
            pos = pos + step;
        }
    }

    if points.len() < config::HERO_COUNT {
        warn!(
            "Only {} edge spawn points found; falling back toward the board center",
            points.len()
        );
    }
    while points.len() < config::HERO_COUNT {
        let fallback = nearest_free_to_center(board, &points).unwrap_or_else(|| board.center());
        points.push(fallback);
    }
    points
}

/// Closest unoccupied, unchosen, non-Water cell to the center.
fn nearest_free_to_center(board: &Board, chosen: &[Position]) -> Option<Position> {
    let center = board.center();
    board
        .cells()
        .filter(|cell| {
            cell.terrain() != TerrainKind::Water
                && !cell.is_occupied()
                && !chosen.contains(&cell.position)
        })
        .map(|cell| cell.position)
        .min_by_key(|&pos| (center.manhattan_distance(pos), pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_character_id, MapRecipe, TerrainMap};

    #[test]
    fn test_spawn_points_on_plain_board() {
        let board = Board::filled(9, 9, TerrainKind::Plain);
        assert_eq!(
            safe_spawn_points(&board),
            vec![
                Position::new(0, 4),
                Position::new(8, 4),
                Position::new(4, 0),
                Position::new(4, 8),
            ]
        );
    }

    #[test]
    fn test_spawn_probe_skips_water_and_occupants() {
        let mut map: TerrainMap = (0..9)
            .flat_map(|x| (0..9).map(move |y| (Position::new(x, y), TerrainKind::Plain)))
            .collect();
        map.insert(Position::new(0, 4), TerrainKind::Water);
        map.insert(Position::new(1, 4), TerrainKind::Water);
        let mut board = Board::from_terrain(9, 9, MapRecipe::Custom, &map);
        board.add_occupant(Position::new(4, 0), new_character_id());

        let points = safe_spawn_points(&board);
        assert_eq!(points[0], Position::new(2, 4));
        assert_eq!(points[2], Position::new(4, 1));
    }

    #[test]
    fn test_fallback_prefers_free_dry_cells_near_center() {
        // The bottom probe finds only cells the other edges already took
        let mut map: TerrainMap = (0..7)
            .flat_map(|x| (0..7).map(move |y| (Position::new(x, y), TerrainKind::Water)))
            .collect();
        for pos in [
            Position::new(3, 3),
            Position::new(2, 3),
            Position::new(3, 2),
            Position::new(4, 4),
        ] {
            map.insert(pos, TerrainKind::Plain);
        }
        let board = Board::from_terrain(7, 7, MapRecipe::Custom, &map);

        let points = safe_spawn_points(&board);
        let unique: std::collections::HashSet<_> = points.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(points.contains(&Position::new(4, 4)));
    }

    #[test]
    fn test_spawn_points_fall_back_to_center() {
        let board = Board::filled(5, 5, TerrainKind::Water);
        let points = safe_spawn_points(&board);
        assert_eq!(points, vec![Position::new(2, 2); 4]);
    }
}
