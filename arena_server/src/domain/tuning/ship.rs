// Ship-type profiles: read-only movement and armament rules shared by every
// ship of a type.

use super::projectile::ProjectileKind;

/// How a ship turns intents into motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    /// Forward thrust along the heading plus turning; momentum with drag.
    Rocket,
    /// Directly commanded strafe/throttle with an externally supplied heading.
    Tank,
}

#[derive(Debug, Clone)]
pub struct ShipProfile {
    pub name: String,
    pub control: ControlType,
    /// Collision radius in world units; also the projectile hit radius.
    pub radius: f64,
    /// Minimum time between shots in milliseconds.
    pub fire_delay: f64,
    pub projectile: ProjectileKind,
    /// Turn speed in radians per millisecond.
    pub turn_rate: f64,
    /// Forward acceleration added per tick while thrusting (rocket control).
    pub acceleration: f64,
    /// Commanded speed at full deflection in world units per millisecond (tank control).
    pub max_speed: f64,
}

/// Ordered catalogue of ship types; the first entry is the spawn default.
#[derive(Debug, Clone)]
pub struct ShipCatalogue {
    ships: Vec<ShipProfile>,
}

impl ShipCatalogue {
    pub fn new(ships: Vec<ShipProfile>) -> Self {
        Self { ships }
    }

    pub fn get(&self, name: &str) -> Option<&ShipProfile> {
        self.ships.iter().find(|s| s.name == name)
    }

    pub fn default_ship(&self) -> Option<&ShipProfile> {
        self.ships.first()
    }

    /// The type after `name`, wrapping around; unknown names restart at the default.
    pub fn next_after(&self, name: &str) -> Option<&ShipProfile> {
        let next = self
            .ships
            .iter()
            .position(|s| s.name == name)
            .map_or(0, |i| (i + 1) % self.ships.len());
        self.ships.get(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipProfile> {
        self.ships.iter()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}

impl Default for ShipCatalogue {
    fn default() -> Self {
        Self::new(vec![
            ShipProfile {
                name: "rocket".to_string(),
                control: ControlType::Rocket,
                radius: 10.0,
                fire_delay: 250.0,
                projectile: ProjectileKind::Laser,
                turn_rate: 0.004,
                acceleration: 0.01,
                max_speed: 0.0,
            },
            ShipProfile {
                name: "tank".to_string(),
                control: ControlType::Tank,
                radius: 12.0,
                fire_delay: 900.0,
                projectile: ProjectileKind::Cannonball,
                turn_rate: 0.003,
                acceleration: 0.0,
                max_speed: 0.15,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_cycling_ship_types_then_catalogue_wraps_around() {
        let ships = ShipCatalogue::default();

        let next = ships.next_after("rocket").expect("catalogue is not empty");
        let wrapped = ships.next_after("tank").expect("catalogue is not empty");

        assert_eq!(next.name, "tank");
        assert_eq!(wrapped.name, "rocket");
    }

    #[test]
    fn when_cycling_from_unknown_type_then_default_is_returned() {
        let ships = ShipCatalogue::default();

        let next = ships.next_after("submarine").expect("catalogue is not empty");

        assert_eq!(next.name, "rocket");
        assert!(ships.get("submarine").is_none());
    }
}
