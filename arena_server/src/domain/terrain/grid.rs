// Grid addressing and per-cell terrain primitives.

use bitflags::bitflags;

/// Material occupying a single terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Free,
    Rock,
}

impl Material {
    /// Opaque cells stop line of sight and collide with craft.
    pub fn is_solid(self) -> bool {
        matches!(self, Material::Rock)
    }
}

bitflags! {
    /// Wall mask for one cell, one bit per side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Walls: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
    }
}

impl Walls {
    /// Side facing back from the neighbour across `self` (single-side masks only).
    pub fn opposite(self) -> Walls {
        let mut out = Walls::empty();
        if self.contains(Walls::TOP) {
            out |= Walls::BOTTOM;
        }
        if self.contains(Walls::BOTTOM) {
            out |= Walls::TOP;
        }
        if self.contains(Walls::LEFT) {
            out |= Walls::RIGHT;
        }
        if self.contains(Walls::RIGHT) {
            out |= Walls::LEFT;
        }
        out
    }

    /// A cell walled on every side is fully opaque.
    pub fn is_closed(self) -> bool {
        self == Walls::all()
    }
}

/// Column/row address of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub col: usize,
    pub row: usize,
}

impl CellCoord {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Shape of the square terrain grid; all flat arrays are row-major over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub size: usize,
}

impl GridShape {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Total number of cells.
    pub fn len(self) -> usize {
        self.size * self.size
    }

    pub fn is_empty(self) -> bool {
        self.size == 0
    }

    pub fn index(self, cell: CellCoord) -> usize {
        cell.row * self.size + cell.col
    }

    pub fn coord(self, index: usize) -> CellCoord {
        CellCoord::new(index % self.size, index / self.size)
    }

    /// Bounds-checked lookup for signed coordinates.
    pub fn checked(self, col: i64, row: i64) -> Option<CellCoord> {
        let size = self.size as i64;
        if col < 0 || row < 0 || col >= size || row >= size {
            return None;
        }
        Some(CellCoord::new(col as usize, row as usize))
    }

    /// In-grid orthogonal neighbours, tagged with the side of `cell` they touch.
    pub fn neighbours(self, cell: CellCoord) -> impl Iterator<Item = (Walls, CellCoord)> {
        let (col, row) = (cell.col as i64, cell.row as i64);
        [
            (Walls::TOP, col, row - 1),
            (Walls::RIGHT, col + 1, row),
            (Walls::BOTTOM, col, row + 1),
            (Walls::LEFT, col - 1, row),
        ]
        .into_iter()
        .filter_map(move |(side, c, r)| self.checked(c, r).map(|n| (side, n)))
    }

    /// True when `cell` sits on the outer ring of the grid.
    pub fn is_border(self, cell: CellCoord) -> bool {
        cell.col == 0 || cell.row == 0 || cell.col + 1 == self.size || cell.row + 1 == self.size
    }

    /// Cells whose centre lies within `radius` cells (Euclidean) of `center`, row-major.
    pub fn cells_within(self, center: CellCoord, radius: usize) -> impl Iterator<Item = CellCoord> {
        let r = radius as i64;
        let (cx, cy) = (center.col as i64, center.row as i64);
        (cy - r..=cy + r).flat_map(move |row| {
            (cx - r..=cx + r).filter_map(move |col| {
                let (dx, dy) = (col - cx, row - cy);
                if dx * dx + dy * dy > r * r {
                    return None;
                }
                self.checked(col, row)
            })
        })
    }
}

/// Output of terrain generation: materials plus the wall masks they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainLayout {
    pub shape: GridShape,
    pub materials: Vec<Material>,
    pub walls: Vec<Walls>,
}

impl TerrainLayout {
    /// Open arena with no rock at all.
    pub fn empty(size: usize) -> Self {
        let shape = GridShape::new(size);
        Self {
            shape,
            materials: vec![Material::Free; shape.len()],
            walls: vec![Walls::empty(); shape.len()],
        }
    }

    pub fn material(&self, cell: CellCoord) -> Material {
        self.materials[self.shape.index(cell)]
    }

    /// Builds a layout from ASCII rows where `#` is rock; walls follow the materials.
    pub fn from_rows(rows: &[&str]) -> Self {
        let shape = GridShape::new(rows.len());
        let materials: Vec<Material> = rows
            .iter()
            .flat_map(|row| {
                row.chars().map(|c| match c {
                    '#' => Material::Rock,
                    _ => Material::Free,
                })
            })
            .collect();
        debug_assert_eq!(materials.len(), shape.len(), "rows must form a square grid");
        let walls = walls_from_materials(shape, &materials);
        Self {
            shape,
            materials,
            walls,
        }
    }
}

/// Rock cells are closed on every side; free cells are walled where they face rock.
pub fn walls_from_materials(shape: GridShape, materials: &[Material]) -> Vec<Walls> {
    (0..shape.len())
        .map(|index| {
            let cell = shape.coord(index);
            if materials[index].is_solid() {
                return Walls::all();
            }
            shape
                .neighbours(cell)
                .filter(|(_, n)| materials[shape.index(*n)].is_solid())
                .fold(Walls::empty(), |acc, (side, _)| acc | side)
        })
        .collect()
}

/// Fully closed cells become rock, everything else is free.
pub fn materials_from_walls(walls: &[Walls]) -> Vec<Material> {
    walls
        .iter()
        .map(|w| {
            if w.is_closed() {
                Material::Rock
            } else {
                Material::Free
            }
        })
        .collect()
}
