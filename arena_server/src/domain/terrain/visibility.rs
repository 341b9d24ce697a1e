// Line-of-sight over the cell grid.
//
// Visibility sets hold flat row-major cell indices in ascending order.

use super::grid::{CellCoord, GridShape, Material};

/// Cells visible from one source cell, as ascending flat indices.
pub type VisibilitySet = Vec<u32>;

/// Bresenham walk between two cells, origin and target included.
#[derive(Debug, Clone)]
pub struct LineCells {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    step_x: i64,
    step_y: i64,
    err: i64,
    done: bool,
}

impl LineCells {
    pub fn new(from: CellCoord, to: CellCoord) -> Self {
        let (x0, y0) = (from.col as i64, from.row as i64);
        let (x1, y1) = (to.col as i64, to.row as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            end_x: x1,
            end_y: y1,
            dx,
            dy,
            step_x: if x0 < x1 { 1 } else { -1 },
            step_y: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for LineCells {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        if self.done {
            return None;
        }
        let current = CellCoord::new(self.x as usize, self.y as usize);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }
        let doubled = 2 * self.err;
        if doubled >= self.dy {
            self.err += self.dy;
            self.x += self.step_x;
        }
        if doubled <= self.dx {
            self.err += self.dx;
            self.y += self.step_y;
        }
        Some(current)
    }
}

/// True when nothing solid lies strictly between `from` and `to`.
///
/// The target is visible even when solid: the first wall on a ray is seen,
/// anything behind it is not.
pub fn has_line_of_sight(
    shape: GridShape,
    materials: &[Material],
    from: CellCoord,
    to: CellCoord,
) -> bool {
    let mut crossed_solid = false;
    for cell in LineCells::new(from, to).skip(1) {
        if crossed_solid {
            return false;
        }
        if materials[shape.index(cell)].is_solid() {
            crossed_solid = true;
        }
    }
    true
}

/// Visibility set of a single source cell.
///
/// `radius` limits targets to a Euclidean disc around the source; `None` scans the whole grid.
pub fn visible_from(
    shape: GridShape,
    materials: &[Material],
    source: CellCoord,
    radius: Option<usize>,
) -> VisibilitySet {
    let candidates: Box<dyn Iterator<Item = CellCoord>> = match radius {
        Some(r) => Box::new(shape.cells_within(source, r)),
        None => Box::new((0..shape.len()).map(move |i| shape.coord(i))),
    };

    candidates
        .filter(|target| has_line_of_sight(shape, materials, source, *target))
        .map(|target| shape.index(target) as u32)
        .collect()
}

/// Visibility sets for every cell of the grid, indexed by flat source index.
pub fn compute_all(
    shape: GridShape,
    materials: &[Material],
    radius: Option<usize>,
) -> Vec<VisibilitySet> {
    (0..shape.len())
        .map(|index| visible_from(shape, materials, shape.coord(index), radius))
        .collect()
}
