//! # Terrain Generation
//!
//! Map recipes that turn an empty grid into typed terrain.
//!
//! Each recipe writes every coordinate of the grid. Afterwards the spawn
//! lanes are checked: a border midpoint whose whole inward line is Water is
//! turned into Plain, so every edge offers at least one dry spawn cell.

use super::{utils, GameConfig, Generator, TerrainMap};
use crate::game::{Position, TerrainKind};
use crate::{DiceboundError, DiceboundResult};
use log::debug;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named map layouts. Numeric ids 1-15 are the classic recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapRecipe {
    Archipelago,
    MountainRanges,
    DenseForest,
    CentralKingdom,
    TotalChaos,
    DesertOasis,
    DeepCavern,
    AncientRuins,
    Volcano,
    MysticSwamp,
    FrozenLands,
    RoyalPlains,
    AncientCity,
    LavaFields,
    IceFortress,
    /// Perlin-noise height bands
    Highlands,
    /// Hand-built board, not produced by a recipe
    Custom,
}

impl MapRecipe {
    /// The fifteen classic recipes, in id order.
    pub const CLASSIC: [MapRecipe; 15] = [
        MapRecipe::Archipelago,
        MapRecipe::MountainRanges,
        MapRecipe::DenseForest,
        MapRecipe::CentralKingdom,
        MapRecipe::TotalChaos,
        MapRecipe::DesertOasis,
        MapRecipe::DeepCavern,
        MapRecipe::AncientRuins,
        MapRecipe::Volcano,
        MapRecipe::MysticSwamp,
        MapRecipe::FrozenLands,
        MapRecipe::RoyalPlains,
        MapRecipe::AncientCity,
        MapRecipe::LavaFields,
        MapRecipe::IceFortress,
    ];

    /// Looks a recipe up by id. Unknown ids give Central Kingdom.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::MapRecipe;
    ///
    /// assert_eq!(MapRecipe::from_id(9), MapRecipe::Volcano);
    /// assert_eq!(MapRecipe::from_id(16), MapRecipe::Highlands);
    /// assert_eq!(MapRecipe::from_id(99), MapRecipe::CentralKingdom);
    /// ```
    pub fn from_id(id: u32) -> MapRecipe {
        match id {
            1..=15 => Self::CLASSIC[id as usize - 1],
            16 => MapRecipe::Highlands,
            _ => MapRecipe::CentralKingdom,
        }
    }

    /// Numeric id; 0 for custom boards.
    pub fn id(self) -> u32 {
        match self {
            MapRecipe::Highlands => 16,
            MapRecipe::Custom => 0,
            recipe => Self::CLASSIC
                .iter()
                .position(|&classic| classic == recipe)
                .map(|index| index as u32 + 1)
                .unwrap_or(0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MapRecipe::Archipelago => "Archipelago",
            MapRecipe::MountainRanges => "Mountain Ranges",
            MapRecipe::DenseForest => "Dense Forest",
            MapRecipe::CentralKingdom => "Central Kingdom",
            MapRecipe::TotalChaos => "Total Chaos",
            MapRecipe::DesertOasis => "Desert Oasis",
            MapRecipe::DeepCavern => "Deep Cavern",
            MapRecipe::AncientRuins => "Ancient Ruins",
            MapRecipe::Volcano => "Volcano",
            MapRecipe::MysticSwamp => "Mystic Swamp",
            MapRecipe::FrozenLands => "Frozen Lands",
            MapRecipe::RoyalPlains => "Royal Plains",
            MapRecipe::AncientCity => "Ancient City",
            MapRecipe::LavaFields => "Lava Fields",
            MapRecipe::IceFortress => "Ice Fortress",
            MapRecipe::Highlands => "Highlands",
            MapRecipe::Custom => "Custom",
        }
    }

    /// Picks one of the classic recipes uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> MapRecipe {
        Self::CLASSIC
            .choose(rng)
            .copied()
            .unwrap_or(MapRecipe::CentralKingdom)
    }
}

impl fmt::Display for MapRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MapRecipe {
    type Err = DiceboundError;

    /// Accepts a numeric id or a recipe name, ignoring case, spaces,
    /// dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.trim().parse::<u32>() {
            return Ok(MapRecipe::from_id(id));
        }
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        Self::CLASSIC
            .iter()
            .copied()
            .chain([MapRecipe::Highlands])
            .find(|recipe| {
                let name: String = recipe
                    .name()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .collect();
                name == wanted
            })
            .ok_or_else(|| DiceboundError::InvalidConfig(format!("unknown map recipe '{}'", s)))
    }
}

/// Generates terrain for a recipe and applies the spawn-lane guarantee.
pub fn generate_terrain<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    recipe: MapRecipe,
    rng: &mut R,
) -> TerrainMap {
    let grid = Grid::new(width, height);
    let mut map = match recipe {
        MapRecipe::Archipelago => grid.archipelago(),
        MapRecipe::MountainRanges => grid.mountain_ranges(),
        MapRecipe::DenseForest => grid.dense_forest(rng),
        MapRecipe::CentralKingdom | MapRecipe::Custom => grid.central_kingdom(rng),
        MapRecipe::TotalChaos => grid.total_chaos(rng),
        MapRecipe::DesertOasis => grid.desert_oasis(rng),
        MapRecipe::DeepCavern => grid.deep_cavern(rng),
        MapRecipe::AncientRuins => grid.ancient_ruins(rng),
        MapRecipe::Volcano => grid.volcano(rng),
        MapRecipe::MysticSwamp => grid.mystic_swamp(rng),
        MapRecipe::FrozenLands => grid.frozen_lands(rng),
        MapRecipe::RoyalPlains => grid.royal_plains(rng),
        MapRecipe::AncientCity => grid.ancient_city(rng),
        MapRecipe::LavaFields => grid.lava_fields(rng),
        MapRecipe::IceFortress => grid.ice_fortress(rng),
        MapRecipe::Highlands => grid.highlands(rng.gen()),
    };
    let opened = open_spawn_lanes(&mut map, width, height);
    if opened > 0 {
        debug!("{}: opened {} flooded spawn lanes", recipe, opened);
    }
    map
}

/// Border midpoints paired with the inward step direction: left, right,
/// top, bottom.
pub fn border_midpoints(width: u32, height: u32) -> [(Position, Position); 4] {
    let (w, h) = (width as i32, height as i32);
    [
        (Position::new(0, h / 2), Position::new(1, 0)),
        (Position::new(w - 1, h / 2), Position::new(-1, 0)),
        (Position::new(w / 2, 0), Position::new(0, 1)),
        (Position::new(w / 2, h - 1), Position::new(0, -1)),
    ]
}

/// Rewrites the midpoint of every all-Water spawn lane to Plain. Returns the
/// number of lanes opened.
///
/// Lanes are judged on the map as the recipe left it, so opening one lane
/// never hides a flooded lane that crosses it.
fn open_spawn_lanes(map: &mut TerrainMap, width: u32, height: u32) -> usize {
    let flooded: Vec<Position> = border_midpoints(width, height)
        .into_iter()
        .filter(|&(start, step)| map.contains_key(&start) && lane_is_flooded(map, start, step))
        .map(|(start, _)| start)
        .collect();

    for &start in &flooded {
        map.insert(start, TerrainKind::Plain);
    }
    flooded.len()
}

fn lane_is_flooded(map: &TerrainMap, start: Position, step: Position) -> bool {
    let mut pos = start;
    while let Some(&terrain) = map.get(&pos) {
        if terrain != TerrainKind::Water {
            return false;
        }
        pos = pos + step;
    }
    true
}

/// Grid dimensions plus the recipe implementations.
struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    fn coords(&self) -> impl Iterator<Item = (i32, i32)> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn fill(&self, terrain: TerrainKind) -> TerrainMap {
        self.coords()
            .map(|(x, y)| (Position::new(x, y), terrain))
            .collect()
    }

    /// Assigns every coordinate from a per-cell rule.
    fn paint<F>(&self, mut rule: F) -> TerrainMap
    where
        F: FnMut(i32, i32) -> TerrainKind,
    {
        self.coords()
            .map(|(x, y)| (Position::new(x, y), rule(x, y)))
            .collect()
    }

    fn archipelago(&self) -> TerrainMap {
        let mut map = self.fill(TerrainKind::Water);
        let (cx, cy) = self.center();
        let islands = [
            (3, 3),
            (self.width - 4, 3),
            (3, self.height - 4),
            (self.width - 4, self.height - 4),
        ];
        let radius = 4.0;

        for (ix, iy) in islands {
            for (x, y) in self.coords() {
                let dist = euclidean(x, y, ix, iy);
                if dist <= radius {
                    let terrain = if dist < 1.5 {
                        TerrainKind::Mountain
                    } else if dist < 3.0 {
                        TerrainKind::Forest
                    } else {
                        TerrainKind::Plain
                    };
                    map.insert(Position::new(x, y), terrain);
                }
            }
        }

        // Bridges along the middle row and column
        for x in 0..self.width {
            map.insert(Position::new(x, cy), TerrainKind::Plain);
        }
        for y in 0..self.height {
            map.insert(Position::new(cx, y), TerrainKind::Plain);
        }
        map
    }

    fn mountain_ranges(&self) -> TerrainMap {
        self.paint(|x, y| {
            let ridge_a = ((x + y).rem_euclid(8) - 4).abs();
            let ridge_b = ((x - y).rem_euclid(6) - 3).abs();
            if ridge_a <= 1 || ridge_b <= 1 {
                TerrainKind::Mountain
            } else if (x + y).rem_euclid(11) < 2 {
                TerrainKind::Water
            } else if (x * y).rem_euclid(13) < 4 {
                TerrainKind::Forest
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn dense_forest<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let (cx, cy) = self.center();
        self.paint(|x, y| {
            if euclidean(x, y, cx, cy) < 3.0 {
                TerrainKind::Plain
            } else if (x % 3 != 0 || y % 3 != 0) && rng.gen::<f64>() < 0.7 {
                TerrainKind::Forest
            } else if (x + y) % 9 == 0 {
                TerrainKind::Mountain
            } else if rng.gen::<f64>() < 0.05 {
                TerrainKind::Water
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn central_kingdom<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let (cx, cy) = self.center();
        self.paint(|x, y| match chebyshev(x, y, cx, cy) {
            0..=2 => TerrainKind::Dungeon,
            // Outer wall with gaps
            5 | 6 if (x + y) % 3 != 0 => TerrainKind::Mountain,
            7 => TerrainKind::Water,
            dist if dist > 7 && rng.gen::<f64>() < 0.3 => TerrainKind::Forest,
            _ => TerrainKind::Plain,
        })
    }

    fn total_chaos<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        const KINDS: [TerrainKind; 5] = [
            TerrainKind::Plain,
            TerrainKind::Forest,
            TerrainKind::Mountain,
            TerrainKind::Water,
            TerrainKind::Dungeon,
        ];
        self.paint(|_, _| KINDS[rng.gen_range(0..KINDS.len())])
    }

    fn desert_oasis<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let mut map = self.fill(TerrainKind::Plain);

        let oases = rng.gen_range(3..=4);
        for _ in 0..oases {
            let ox = between(rng, 4, self.width - 5);
            let oy = between(rng, 4, self.height - 5);
            for (x, y) in self.coords() {
                let dist = euclidean(x, y, ox, oy);
                if dist < 1.5 {
                    map.insert(Position::new(x, y), TerrainKind::Water);
                } else if dist < 3.0 {
                    map.insert(Position::new(x, y), TerrainKind::Forest);
                }
            }
        }

        // Dunes
        for (x, y) in self.coords() {
            let pos = Position::new(x, y);
            if x % 7 == 0 && y % 5 == 0 && map.get(&pos) == Some(&TerrainKind::Plain) {
                map.insert(pos, TerrainKind::Mountain);
            }
        }
        map
    }

    fn deep_cavern<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let mut map = self.fill(TerrainKind::Dungeon);

        // Tunnels: double-height rows, single-width columns
        for row in (0..self.height).step_by(3) {
            for x in 0..self.width {
                if rng.gen::<f64>() < 0.8 {
                    map.insert(Position::new(x, row), TerrainKind::Plain);
                    if row + 1 < self.height {
                        map.insert(Position::new(x, row + 1), TerrainKind::Plain);
                    }
                }
            }
        }
        for column in (0..self.width).step_by(4) {
            for y in 0..self.height {
                if rng.gen::<f64>() < 0.7 {
                    map.insert(Position::new(column, y), TerrainKind::Plain);
                }
            }
        }

        // Underground lakes
        for _ in 0..3 {
            let lx = between(rng, 2, self.width - 3);
            let ly = between(rng, 2, self.height - 3);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    if self.in_bounds(lx + dx, ly + dy) {
                        map.insert(Position::new(lx + dx, ly + dy), TerrainKind::Water);
                    }
                }
            }
        }

        // Crystal outcrops
        for (x, y) in self.coords() {
            let pos = Position::new(x, y);
            if map.get(&pos) == Some(&TerrainKind::Dungeon) && rng.gen::<f64>() < 0.08 {
                map.insert(pos, TerrainKind::Mountain);
            }
        }
        map
    }

    fn ancient_ruins<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let mut map = self.fill(TerrainKind::Plain);

        for i in (3..self.width - 3).step_by(6) {
            for j in (3..self.height - 3).step_by(6) {
                for dx in -2..=2_i32 {
                    for dy in -2..=2_i32 {
                        let (x, y) = (i + dx, j + dy);
                        if !self.in_bounds(x, y) {
                            continue;
                        }
                        let pos = Position::new(x, y);
                        if dx.abs() == 2 || dy.abs() == 2 {
                            // Broken walls
                            if rng.gen::<f64>() < 0.7 {
                                map.insert(pos, TerrainKind::Mountain);
                            }
                        } else if rng.gen::<f64>() < 0.3 {
                            map.insert(pos, TerrainKind::Dungeon);
                        }
                    }
                }
            }
        }

        // Overgrowth
        for (x, y) in self.coords() {
            let pos = Position::new(x, y);
            if map.get(&pos) == Some(&TerrainKind::Plain) && rng.gen::<f64>() < 0.2 {
                map.insert(pos, TerrainKind::Forest);
            }
        }
        map
    }

    fn volcano<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let (cx, cy) = self.center();
        self.paint(|x, y| {
            let dist = euclidean(x, y, cx, cy);
            if dist < 2.0 {
                TerrainKind::Lava
            } else if dist < 4.0 {
                TerrainKind::Mountain
            } else if dist < 6.0 {
                TerrainKind::Water
            } else if dist < 8.0 && rng.gen::<f64>() < 0.4 {
                TerrainKind::Forest
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn mystic_swamp<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        self.paint(|x, y| {
            let roll = rng.gen::<f64>();
            if (x + y) % 5 < 2 {
                TerrainKind::Water
            } else if roll < 0.4 {
                TerrainKind::Forest
            } else if roll < 0.5 {
                // Dead trees
                TerrainKind::Dungeon
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn frozen_lands<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        self.paint(|x, y| {
            if (x + y) % 6 < 2 {
                TerrainKind::Mountain
            } else if (x - y).rem_euclid(8) < 2 {
                TerrainKind::Ice
            } else if rng.gen::<f64>() < 0.15 {
                TerrainKind::Water
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn royal_plains<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        self.paint(|_, _| {
            let roll = rng.gen::<f64>();
            if roll < 0.75 {
                TerrainKind::Plain
            } else if roll < 0.85 {
                TerrainKind::Forest
            } else if roll < 0.90 {
                TerrainKind::Water
            } else {
                TerrainKind::Mountain
            }
        })
    }

    fn ancient_city<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        self.paint(|x, y| {
            if x % 6 == 0 || y % 6 == 0 {
                // Canals
                TerrainKind::Water
            } else if x % 6 == 3 && y % 6 == 3 {
                TerrainKind::Plain
            } else if rng.gen::<f64>() < 0.3 {
                TerrainKind::Dungeon
            } else if rng.gen::<f64>() < 0.2 {
                TerrainKind::Forest
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn lava_fields<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let (width, height) = (self.width, self.height);
        self.paint(|x, y| {
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                TerrainKind::Mountain
            } else if x % 5 == 2 || y % 7 == 3 {
                TerrainKind::Lava
            } else if rng.gen::<f64>() < 0.3 {
                TerrainKind::Mountain
            } else if rng.gen::<f64>() < 0.15 {
                TerrainKind::Dungeon
            } else {
                TerrainKind::Plain
            }
        })
    }

    fn ice_fortress<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainMap {
        let (cx, cy) = self.center();
        self.paint(|x, y| match chebyshev(x, y, cx, cy) {
            0 | 1 => TerrainKind::Ice,
            4 | 5 if (x + y) % 2 == 0 => TerrainKind::Mountain,
            4 | 5 => TerrainKind::Ice,
            6 => TerrainKind::Water,
            _ if rng.gen::<f64>() < 0.3 => TerrainKind::Ice,
            _ => TerrainKind::Plain,
        })
    }

    fn highlands(&self, seed: u32) -> TerrainMap {
        const SCALE: f64 = 0.15;
        let perlin = Perlin::new(seed);
        self.paint(|x, y| {
            let height = perlin.get([x as f64 * SCALE, y as f64 * SCALE]);
            if height < -0.4 {
                TerrainKind::Water
            } else if height < 0.0 {
                TerrainKind::Plain
            } else if height < 0.25 {
                TerrainKind::Forest
            } else if height < 0.45 {
                TerrainKind::Mountain
            } else {
                TerrainKind::Ice
            }
        })
    }
}

fn euclidean(x: i32, y: i32, ox: i32, oy: i32) -> f64 {
    let dx = (x - ox) as f64;
    let dy = (y - oy) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn chebyshev(x: i32, y: i32, ox: i32, oy: i32) -> i32 {
    (x - ox).abs().max((y - oy).abs())
}

/// Uniform integer in `lo..=hi`, or the midpoint when the range is empty.
fn between<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if lo > hi {
        (lo + hi) / 2
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// Terrain generator for a fixed recipe.
#[derive(Debug, Clone, Copy)]
pub struct TerrainGenerator {
    pub recipe: MapRecipe,
}

impl TerrainGenerator {
    pub fn new(recipe: MapRecipe) -> Self {
        Self { recipe }
    }
}

impl Generator<TerrainMap> for TerrainGenerator {
    fn generate(&self, config: &GameConfig, rng: &mut StdRng) -> DiceboundResult<TerrainMap> {
        let map = generate_terrain(config.width, config.height, self.recipe, rng);
        self.validate(&map, config)?;
        Ok(map)
    }

    fn validate(&self, content: &TerrainMap, config: &GameConfig) -> DiceboundResult<()> {
        utils::validate_terrain(content, config.width, config.height)
    }

    fn generator_type(&self) -> &'static str {
        "TerrainGenerator"
    }
}
