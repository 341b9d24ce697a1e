// Circle-vs-rock collision resolution with terrain damage.
//
// Only the first overlapping rock cell in row-major scan order is resolved per
// call; a circle wedged between two cells settles over consecutive ticks.

use crate::domain::terrain::{CellCoord, DamageOutcome, TerrainState};
use glam::DVec2;

/// One circle moving from `from` to `to` this tick.
#[derive(Debug, Clone, Copy)]
pub struct CircleMove {
    pub from: DVec2,
    pub to: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    /// Integrity removed from the rock cell that is hit.
    pub damage: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionOutcome {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Rock cell that was hit, if any.
    pub hit: Option<CellCoord>,
    /// True when the hit crumbled the cell.
    pub destroyed: bool,
}

impl CollisionOutcome {
    fn miss(mv: &CircleMove) -> Self {
        Self {
            position: mv.to,
            velocity: mv.velocity,
            hit: None,
            destroyed: false,
        }
    }
}

/// World-space bounds of a cell.
pub fn cell_bounds(cell: CellCoord, cell_size: f64) -> (DVec2, DVec2) {
    let min = DVec2::new(cell.col as f64 * cell_size, cell.row as f64 * cell_size);
    (min, min + DVec2::splat(cell_size))
}

/// How far the circle reaches into the box; 0 when they do not overlap.
pub fn penetration_depth(center: DVec2, radius: f64, min: DVec2, max: DVec2) -> f64 {
    let closest = center.clamp(min, max);
    if closest == center {
        let inside = (center.x - min.x)
            .min(max.x - center.x)
            .min(center.y - min.y)
            .min(max.y - center.y);
        return inside + radius;
    }
    (radius - (center - closest).length()).max(0.0)
}

/// Minimum translation that pushes the circle out of the box, or `None` without overlap.
///
/// A centre inside the box leaves through the face the circle came from when
/// `previous` lies beyond one, otherwise through the nearest face.
pub fn separation(
    center: DVec2,
    previous: DVec2,
    radius: f64,
    min: DVec2,
    max: DVec2,
) -> Option<DVec2> {
    let closest = center.clamp(min, max);
    if closest != center {
        let offset = center - closest;
        let distance_sq = offset.length_squared();
        if distance_sq >= radius * radius {
            return None;
        }
        let distance = distance_sq.sqrt();
        return Some(offset / distance * (radius - distance));
    }

    let faces = [
        (DVec2::NEG_X, center.x - min.x, previous.x < min.x),
        (DVec2::X, max.x - center.x, previous.x > max.x),
        (DVec2::NEG_Y, center.y - min.y, previous.y < min.y),
        (DVec2::Y, max.y - center.y, previous.y > max.y),
    ];
    let nearest = |only_entry: bool| {
        faces
            .iter()
            .filter(|(_, _, entered)| *entered || !only_entry)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(normal, depth, _)| *normal * (*depth + radius))
    };
    nearest(true).or_else(|| nearest(false))
}

/// Resolves the move against rock and damages the first cell hit.
pub fn resolve(terrain: &mut TerrainState, cell_size: f64, mv: CircleMove) -> CollisionOutcome {
    let shape = terrain.shape();
    if shape.is_empty() {
        return CollisionOutcome::miss(&mv);
    }
    let last = shape.size as i64 - 1;
    let span = |v: f64| ((v / cell_size).floor() as i64).clamp(0, last);
    let (col_min, col_max) = (span(mv.to.x - mv.radius), span(mv.to.x + mv.radius));
    let (row_min, row_max) = (span(mv.to.y - mv.radius), span(mv.to.y + mv.radius));

    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let cell = CellCoord::new(col as usize, row as usize);
            if !terrain.material(cell).is_solid() {
                continue;
            }
            let (min, max) = cell_bounds(cell, cell_size);
            let Some(push) = separation(mv.to, mv.from, mv.radius, min, max) else {
                continue;
            };

            let mut velocity = mv.velocity;
            let normal = push.normalize_or_zero();
            let into_surface = velocity.dot(normal);
            if into_surface < 0.0 {
                velocity -= normal * into_surface;
            }

            let destroyed = terrain.apply_damage(cell, mv.damage) == DamageOutcome::Destroyed;
            if destroyed {
                terrain.recalculate_visibility(row, col);
            }

            return CollisionOutcome {
                position: mv.to + push,
                velocity,
                hit: Some(cell),
                destroyed,
            };
        }
    }

    CollisionOutcome::miss(&mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terrain::{Material, TerrainLayout};
    use proptest::prelude::*;

    const CELL: f64 = 10.0;

    fn single_rock(integrity: i32) -> TerrainState {
        TerrainState::new(TerrainLayout::from_rows(&["...", ".#.", "..."]), integrity, 2)
    }

    #[test]
    fn when_circle_misses_rock_then_move_is_unchanged() {
        let mut terrain = single_rock(5);
        let mv = CircleMove {
            from: DVec2::new(2.0, 2.0),
            to: DVec2::new(4.0, 4.0),
            velocity: DVec2::new(1.0, 1.0),
            radius: 3.0,
            damage: 1,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        assert_eq!(outcome.hit, None);
        assert_eq!(outcome.position, mv.to);
        assert_eq!(outcome.velocity, mv.velocity);
        assert_eq!(terrain.integrity_at(CellCoord::new(1, 1)), 5);
    }

    #[test]
    fn when_moving_into_rock_face_then_normal_velocity_is_cancelled() {
        let mut terrain = single_rock(5);
        // Approach the left face of the rock at x = 10.
        let mv = CircleMove {
            from: DVec2::new(5.0, 15.0),
            to: DVec2::new(8.0, 15.0),
            velocity: DVec2::new(3.0, 0.5),
            radius: 3.0,
            damage: 1,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        assert_eq!(outcome.hit, Some(CellCoord::new(1, 1)));
        assert!((outcome.position.x - 7.0).abs() < 1e-9);
        assert_eq!(outcome.position.y, 15.0);
        assert!(outcome.velocity.x.abs() < 1e-12);
        assert_eq!(outcome.velocity.y, 0.5);
        assert_eq!(terrain.integrity_at(CellCoord::new(1, 1)), 4);
    }

    #[test]
    fn when_moving_away_from_rock_then_velocity_is_preserved() {
        let mut terrain = single_rock(5);
        let mv = CircleMove {
            from: DVec2::new(8.0, 15.0),
            to: DVec2::new(8.0, 15.0),
            velocity: DVec2::new(-2.0, 0.0),
            radius: 3.0,
            damage: 0,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        assert!(outcome.hit.is_some());
        assert_eq!(outcome.velocity, mv.velocity);
    }

    #[test]
    fn when_point_enters_rock_then_it_is_pushed_back_through_entry_face() {
        let mut terrain = single_rock(5);
        let mv = CircleMove {
            from: DVec2::new(15.0, 5.0),
            to: DVec2::new(15.0, 18.0),
            velocity: DVec2::new(0.0, 13.0),
            radius: 0.0,
            damage: 1,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        // Deeper to the bottom face, but the projectile came through the top.
        assert_eq!(outcome.position, DVec2::new(15.0, 10.0));
        assert_eq!(outcome.velocity, DVec2::ZERO);
    }

    #[test]
    fn when_final_hit_lands_then_rock_becomes_free() {
        let mut terrain = single_rock(2);
        let mv = CircleMove {
            from: DVec2::new(15.0, 5.0),
            to: DVec2::new(15.0, 12.0),
            velocity: DVec2::new(0.0, 7.0),
            radius: 0.0,
            damage: 2,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        assert!(outcome.destroyed);
        assert_eq!(terrain.material(CellCoord::new(1, 1)), Material::Free);
    }

    #[test]
    fn when_circle_overlaps_two_rocks_then_only_first_in_scan_order_is_resolved() {
        let mut terrain = TerrainState::new(TerrainLayout::from_rows(&["##.", "...", "..."]), 5, 2);
        let mv = CircleMove {
            from: DVec2::new(10.0, 15.0),
            to: DVec2::new(10.0, 12.0),
            velocity: DVec2::new(0.0, -1.0),
            radius: 3.0,
            damage: 1,
        };

        let outcome = resolve(&mut terrain, CELL, mv);

        assert_eq!(outcome.hit, Some(CellCoord::new(0, 0)));
        assert_eq!(terrain.integrity_at(CellCoord::new(0, 0)), 4);
        assert_eq!(terrain.integrity_at(CellCoord::new(1, 0)), 5);
    }

    proptest! {
        #[test]
        fn resolution_never_deepens_penetration(
            x in -5.0f64..35.0,
            y in -5.0f64..35.0,
            px in -5.0f64..35.0,
            py in -5.0f64..35.0,
            radius in 0.0f64..8.0,
        ) {
            let mut terrain = single_rock(1000);
            let (min, max) = cell_bounds(CellCoord::new(1, 1), CELL);
            let to = DVec2::new(x, y);
            let before = penetration_depth(to, radius, min, max);

            let outcome = resolve(&mut terrain, CELL, CircleMove {
                from: DVec2::new(px, py),
                to,
                velocity: DVec2::ZERO,
                radius,
                damage: 0,
            });

            let after = penetration_depth(outcome.position, radius, min, max);
            prop_assert!(after <= before + 1e-9, "before {} after {}", before, after);
        }
    }
}
