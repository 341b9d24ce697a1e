// Procedural terrain generation.
//
// Every mode yields both wall masks and materials so the same layout can feed
// connectivity checks (walls) and the live simulation (materials).

use super::grid::{
    CellCoord, GridShape, Material, TerrainLayout, Walls, materials_from_walls,
    walls_from_materials,
};
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Side length of one pattern tile.
pub const TILE_SIZE: usize = 10;

/// Predefined tiles for pattern mode. `#` is rock, `.` is free.
///
/// Tile edges are kept open so neighbouring tiles always connect.
const TILE_PATTERNS: [[&str; TILE_SIZE]; 4] = [
    [
        "..........",
        "..........",
        "..##..##..",
        "..##..##..",
        "..........",
        "..........",
        "..##..##..",
        "..##..##..",
        "..........",
        "..........",
    ],
    [
        "..........",
        ".########.",
        "..........",
        "..........",
        "....##....",
        "....##....",
        "..........",
        "..........",
        ".########.",
        "..........",
    ],
    [
        "..........",
        "..........",
        "..........",
        "...####...",
        "...#..#...",
        "...#......",
        "...####...",
        "..........",
        "..........",
        "..........",
    ],
    [
        "..........",
        ".#......#.",
        "..#....#..",
        "...#..#...",
        "..........",
        "..........",
        "...#..#...",
        "..#....#..",
        ".#......#.",
        "..........",
    ],
];

/// How terrain is generated for a new arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainMode {
    /// Probabilistic walls between neighbouring cells.
    RandomWalls,
    /// Random 10×10 material tiles.
    PatternTiles,
    /// Cellular-automaton caves.
    Cave,
}

impl fmt::Display for TerrainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerrainMode::RandomWalls => "random_walls",
            TerrainMode::PatternTiles => "pattern_tiles",
            TerrainMode::Cave => "cave",
        };
        f.write_str(name)
    }
}

impl FromStr for TerrainMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random_walls" | "walls" => Ok(TerrainMode::RandomWalls),
            "pattern_tiles" | "tiles" => Ok(TerrainMode::PatternTiles),
            "cave" => Ok(TerrainMode::Cave),
            other => Err(format!("unknown terrain mode: {other}")),
        }
    }
}

/// Generator knobs; the mode decides which ones apply.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorSettings {
    pub size: usize,
    pub mode: TerrainMode,
    /// Chance of a wall on each internal edge (random-wall mode).
    pub wall_probability: f64,
    /// Patch walls until every cell is reachable instead of a single pass (random-wall mode).
    pub strict_connectivity: bool,
    /// Initial rock density (cave mode).
    pub cave_fill: f64,
    /// Smoothing iterations (cave mode).
    pub cave_smoothing_passes: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            size: 64,
            mode: TerrainMode::Cave,
            wall_probability: 0.5,
            strict_connectivity: true,
            cave_fill: 0.45,
            cave_smoothing_passes: 5,
        }
    }
}

/// Generates a layout for the configured mode.
pub fn generate<R: Rng>(settings: &GeneratorSettings, rng: &mut R) -> TerrainLayout {
    match settings.mode {
        TerrainMode::RandomWalls => random_walls(
            settings.size,
            settings.wall_probability,
            settings.strict_connectivity,
            rng,
        ),
        TerrainMode::PatternTiles => pattern_tiles(settings.size, rng),
        TerrainMode::Cave => cave(
            settings.size,
            settings.cave_fill,
            settings.cave_smoothing_passes,
            rng,
        ),
    }
}

/// Random-wall maze with forced boundary walls and a reachability fix.
pub fn random_walls<R: Rng>(
    size: usize,
    wall_probability: f64,
    strict_connectivity: bool,
    rng: &mut R,
) -> TerrainLayout {
    let shape = GridShape::new(size);
    let mut walls = vec![Walls::empty(); shape.len()];

    for row in 0..size {
        for col in 0..size {
            let here = shape.index(CellCoord::new(col, row));
            if col + 1 < size && rng.random_bool(wall_probability) {
                walls[here] |= Walls::RIGHT;
                walls[here + 1] |= Walls::LEFT;
            }
            if row + 1 < size && rng.random_bool(wall_probability) {
                walls[here] |= Walls::BOTTOM;
                walls[here + size] |= Walls::TOP;
            }
        }
    }

    for index in 0..shape.len() {
        let cell = shape.coord(index);
        if cell.row == 0 {
            walls[index] |= Walls::TOP;
        }
        if cell.row + 1 == size {
            walls[index] |= Walls::BOTTOM;
        }
        if cell.col == 0 {
            walls[index] |= Walls::LEFT;
        }
        if cell.col + 1 == size {
            walls[index] |= Walls::RIGHT;
        }
    }

    if !shape.is_empty() {
        open_unreached_tops(shape, &mut walls);
        if strict_connectivity {
            patch_until_connected(shape, &mut walls);
        }
    }

    let materials = materials_from_walls(&walls);
    TerrainLayout {
        shape,
        materials,
        walls,
    }
}

/// Single corrective pass: every cell the origin cannot reach loses its top wall.
fn open_unreached_tops(shape: GridShape, walls: &mut [Walls]) {
    let reached = reachable_through_walls(shape, walls, CellCoord::new(0, 0));
    for (index, seen) in reached.iter().enumerate() {
        if *seen {
            continue;
        }
        let cell = shape.coord(index);
        if cell.row == 0 {
            continue;
        }
        walls[index].remove(Walls::TOP);
        walls[index - shape.size].remove(Walls::BOTTOM);
    }
}

/// Opens walls between the reached region and its unreached neighbours until nothing is left out.
fn patch_until_connected(shape: GridShape, walls: &mut [Walls]) {
    loop {
        let reached = reachable_through_walls(shape, walls, CellCoord::new(0, 0));
        if reached.iter().all(|r| *r) {
            return;
        }
        for index in 0..shape.len() {
            if reached[index] {
                continue;
            }
            let cell = shape.coord(index);
            let door = shape
                .neighbours(cell)
                .find(|(_, n)| reached[shape.index(*n)]);
            if let Some((side, neighbour)) = door {
                walls[index].remove(side);
                walls[shape.index(neighbour)].remove(side.opposite());
            }
        }
    }
}

/// Flood fill from `start` following only open edges.
pub fn reachable_through_walls(shape: GridShape, walls: &[Walls], start: CellCoord) -> Vec<bool> {
    let mut reached = vec![false; shape.len()];
    let mut queue = VecDeque::from([start]);
    reached[shape.index(start)] = true;

    while let Some(cell) = queue.pop_front() {
        let open = walls[shape.index(cell)];
        for (side, neighbour) in shape.neighbours(cell) {
            let n = shape.index(neighbour);
            if open.contains(side) || reached[n] {
                continue;
            }
            reached[n] = true;
            queue.push_back(neighbour);
        }
    }
    reached
}

/// Pattern tiling with a forced rock boundary and mirrored walls.
pub fn pattern_tiles<R: Rng>(size: usize, rng: &mut R) -> TerrainLayout {
    let shape = GridShape::new(size);
    let mut materials = vec![Material::Free; shape.len()];
    let tiles_per_side = size.div_ceil(TILE_SIZE);

    for tile_row in 0..tiles_per_side {
        for tile_col in 0..tiles_per_side {
            let pattern = &TILE_PATTERNS[rng.random_range(0..TILE_PATTERNS.len())];
            for (dy, line) in pattern.iter().enumerate() {
                for (dx, c) in line.bytes().enumerate() {
                    let (col, row) = (tile_col * TILE_SIZE + dx, tile_row * TILE_SIZE + dy);
                    if col >= size || row >= size {
                        continue;
                    }
                    if c == b'#' {
                        materials[shape.index(CellCoord::new(col, row))] = Material::Rock;
                    }
                }
            }
        }
    }

    let mut walls = walls_from_materials(shape, &materials);
    for index in 0..shape.len() {
        if shape.is_border(shape.coord(index)) {
            materials[index] = Material::Rock;
            walls[index] = Walls::all();
        }
    }
    mirror_walls(shape, &mut walls);

    TerrainLayout {
        shape,
        materials,
        walls,
    }
}

/// Neighbour-consistency pass: a wall on one side is matched on the neighbour's opposing side.
fn mirror_walls(shape: GridShape, walls: &mut [Walls]) {
    for index in 0..shape.len() {
        let cell = shape.coord(index);
        for (side, neighbour) in shape.neighbours(cell) {
            if walls[index].contains(side) {
                walls[shape.index(neighbour)] |= side.opposite();
            }
        }
    }
}

/// Cellular-automaton caves.
///
/// Random fill, rock border, `passes` rounds of the 4-5 rule, then every free
/// pocket outside the largest free region is filled in.
pub fn cave<R: Rng>(size: usize, fill: f64, passes: usize, rng: &mut R) -> TerrainLayout {
    let shape = GridShape::new(size);
    let mut materials: Vec<Material> = (0..shape.len())
        .map(|index| {
            if shape.is_border(shape.coord(index)) || rng.random_bool(fill) {
                Material::Rock
            } else {
                Material::Free
            }
        })
        .collect();

    for _ in 0..passes {
        materials = smooth(shape, &materials);
    }
    keep_largest_region(shape, &mut materials);

    let walls = walls_from_materials(shape, &materials);
    TerrainLayout {
        shape,
        materials,
        walls,
    }
}

fn smooth(shape: GridShape, materials: &[Material]) -> Vec<Material> {
    (0..shape.len())
        .map(|index| {
            let cell = shape.coord(index);
            if shape.is_border(cell) {
                return Material::Rock;
            }
            match rock_neighbours(shape, materials, cell) {
                n if n >= 5 => Material::Rock,
                n if n <= 3 => Material::Free,
                _ => materials[index],
            }
        })
        .collect()
}

/// Rock count in the 8-neighbourhood; cells off the grid count as rock.
fn rock_neighbours(shape: GridShape, materials: &[Material], cell: CellCoord) -> usize {
    let (col, row) = (cell.col as i64, cell.row as i64);
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            match shape.checked(col + dx, row + dy) {
                Some(n) if !materials[shape.index(n)].is_solid() => {}
                _ => count += 1,
            }
        }
    }
    count
}

/// Labels 4-connected free regions; returns one label per cell (`None` for rock).
pub fn free_regions(shape: GridShape, materials: &[Material]) -> Vec<Option<usize>> {
    let mut labels = vec![None; shape.len()];
    let mut next = 0;

    for start in 0..shape.len() {
        if materials[start].is_solid() || labels[start].is_some() {
            continue;
        }
        labels[start] = Some(next);
        let mut queue = VecDeque::from([shape.coord(start)]);
        while let Some(cell) = queue.pop_front() {
            for (_, neighbour) in shape.neighbours(cell) {
                let n = shape.index(neighbour);
                if materials[n].is_solid() || labels[n].is_some() {
                    continue;
                }
                labels[n] = Some(next);
                queue.push_back(neighbour);
            }
        }
        next += 1;
    }
    labels
}

fn keep_largest_region(shape: GridShape, materials: &mut [Material]) {
    let labels = free_regions(shape, materials);
    let region_count = labels.iter().flatten().max().map_or(0, |m| m + 1);
    if region_count <= 1 {
        return;
    }

    let mut sizes = vec![0usize; region_count];
    for label in labels.iter().flatten() {
        sizes[*label] += 1;
    }
    // Ties go to the lowest label so the result stays deterministic.
    let largest = sizes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(label, _)| label)
        .unwrap_or(0);

    for (index, label) in labels.iter().enumerate() {
        if matches!(label, Some(l) if *l != largest) {
            materials[index] = Material::Rock;
        }
    }
}
