// Live destructible terrain: materials, integrity and visibility.

use super::grid::{CellCoord, GridShape, Material, TerrainLayout};
use super::visibility::{self, VisibilitySet};
use tracing::debug;

/// One cell whose material or visibility set was just refreshed.
#[derive(Debug, Clone, Copy)]
pub struct CellChange<'a> {
    pub row: usize,
    pub col: usize,
    pub material: Material,
    pub visible: &'a [u32],
}

/// Receives every refreshed cell after terrain is destroyed.
pub type TerrainListener = Box<dyn FnMut(CellChange<'_>) + Send>;

/// Result of applying damage to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Cell was not rock (or off the grid); nothing changed.
    Ignored,
    /// Rock absorbed the damage and still stands.
    Damaged { remaining: i32 },
    /// Rock crumbled into free space.
    Destroyed,
}

pub struct TerrainState {
    shape: GridShape,
    materials: Vec<Material>,
    integrity: Vec<i32>,
    visibility: Vec<VisibilitySet>,
    visibility_radius: usize,
    listener: Option<TerrainListener>,
    /// Rock cells destroyed since creation.
    destroyed: u64,
}

impl TerrainState {
    /// Builds live terrain from a generated layout; every rock cell starts at `rock_integrity`.
    pub fn new(layout: TerrainLayout, rock_integrity: i32, visibility_radius: usize) -> Self {
        let TerrainLayout {
            shape, materials, ..
        } = layout;
        let integrity = materials
            .iter()
            .map(|m| if m.is_solid() { rock_integrity } else { 0 })
            .collect();
        let visibility = visibility::compute_all(shape, &materials, Some(visibility_radius));

        Self {
            shape,
            materials,
            integrity,
            visibility,
            visibility_radius,
            listener: None,
            destroyed: 0,
        }
    }

    /// Registers the change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: TerrainListener) {
        self.listener = Some(listener);
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.shape.size
    }

    pub fn visibility_radius(&self) -> usize {
        self.visibility_radius
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn integrity(&self) -> &[i32] {
        &self.integrity
    }

    pub fn visibility(&self) -> &[VisibilitySet] {
        &self.visibility
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }

    pub fn material(&self, cell: CellCoord) -> Material {
        self.materials[self.shape.index(cell)]
    }

    pub fn integrity_at(&self, cell: CellCoord) -> i32 {
        self.integrity[self.shape.index(cell)]
    }

    pub fn visible_from(&self, cell: CellCoord) -> &[u32] {
        &self.visibility[self.shape.index(cell)]
    }

    /// Material at a world position; anything off the grid reads as rock.
    pub fn material_at_world(&self, x: f64, y: f64, cell_size: f64) -> Material {
        let col = (x / cell_size).floor() as i64;
        let row = (y / cell_size).floor() as i64;
        self.shape
            .checked(col, row)
            .map_or(Material::Rock, |cell| self.material(cell))
    }

    /// Free cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.materials
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_solid())
            .map(|(index, _)| self.shape.coord(index))
    }

    /// Subtracts `damage` from a rock cell; at zero or below it turns into free space.
    ///
    /// Visibility is not refreshed here, see [`TerrainState::recalculate_visibility`].
    pub fn apply_damage(&mut self, cell: CellCoord, damage: i32) -> DamageOutcome {
        let index = self.shape.index(cell);
        if !self.materials[index].is_solid() {
            return DamageOutcome::Ignored;
        }

        self.integrity[index] -= damage;
        if self.integrity[index] > 0 {
            return DamageOutcome::Damaged {
                remaining: self.integrity[index],
            };
        }

        self.integrity[index] = 0;
        self.materials[index] = Material::Free;
        self.destroyed += 1;
        debug!(row = cell.row, col = cell.col, "rock destroyed");
        DamageOutcome::Destroyed
    }

    /// Recomputes visibility around a cell and reports every cell in the radius.
    ///
    /// Coordinates off the grid are ignored.
    pub fn recalculate_visibility(&mut self, row: i64, col: i64) {
        let Some(center) = self.shape.checked(col, row) else {
            return;
        };

        let affected: Vec<CellCoord> = self
            .shape
            .cells_within(center, self.visibility_radius)
            .collect();

        for cell in &affected {
            let index = self.shape.index(*cell);
            self.visibility[index] = visibility::visible_from(
                self.shape,
                &self.materials,
                *cell,
                Some(self.visibility_radius),
            );
        }

        let Some(listener) = self.listener.as_mut() else {
            return;
        };
        for cell in affected {
            let index = self.shape.index(cell);
            listener(CellChange {
                row: cell.row,
                col: cell.col,
                material: self.materials[index],
                visible: &self.visibility[index],
            });
        }
    }
}
