// Player intents: the single control path shared by humans and AI.

use crate::domain::angles::wrap_angle;
use crate::domain::errors::SimError;
use crate::domain::state::SimEntity;
use crate::domain::tuning::ShipCatalogue;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::str::FromStr;

/// Discrete button edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEdge {
    TurnLeftDown,
    TurnLeftUp,
    TurnRightDown,
    TurnRightUp,
    AccelerateDown,
    AccelerateUp,
    FireDown,
    FireUp,
    ChangeShipType,
}

impl KeyEdge {
    pub fn token(self) -> &'static str {
        match self {
            KeyEdge::TurnLeftDown => "turn-left-down",
            KeyEdge::TurnLeftUp => "turn-left-up",
            KeyEdge::TurnRightDown => "turn-right-down",
            KeyEdge::TurnRightUp => "turn-right-up",
            KeyEdge::AccelerateDown => "accelerate-down",
            KeyEdge::AccelerateUp => "accelerate-up",
            KeyEdge::FireDown => "fire-down",
            KeyEdge::FireUp => "fire-up",
            KeyEdge::ChangeShipType => "change-ship-type",
        }
    }
}

impl FromStr for KeyEdge {
    type Err = SimError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let edge = match token {
            "turn-left-down" => KeyEdge::TurnLeftDown,
            "turn-left-up" => KeyEdge::TurnLeftUp,
            "turn-right-down" => KeyEdge::TurnRightDown,
            "turn-right-up" => KeyEdge::TurnRightUp,
            "accelerate-down" => KeyEdge::AccelerateDown,
            "accelerate-up" => KeyEdge::AccelerateUp,
            "fire-down" => KeyEdge::FireDown,
            "fire-up" => KeyEdge::FireUp,
            "change-ship-type" => KeyEdge::ChangeShipType,
            other => return Err(SimError::UnknownIntent(other.to_string())),
        };
        Ok(edge)
    }
}

/// A control action, independent of whether a human or the autopilot issued it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Key(KeyEdge),
    /// Turn amount; -1 full left, 1 full right.
    Turn(f64),
    /// Thrust amount along the heading.
    Accelerate(f64),
    /// Absolute heading; -1..=1 maps onto -π..=π.
    Heading(f64),
    /// Tank lateral axis (world x).
    Strafe(f64),
    /// Tank longitudinal axis (world y).
    Throttle(f64),
}

impl Intent {
    /// Continuous axes clamped into [-1, 1]; NaN reads as 0.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
        }
        match self {
            Intent::Key(edge) => Intent::Key(edge),
            Intent::Turn(v) => Intent::Turn(clamp(v)),
            Intent::Accelerate(v) => Intent::Accelerate(clamp(v)),
            Intent::Heading(v) => Intent::Heading(clamp(v)),
            Intent::Strafe(v) => Intent::Strafe(clamp(v)),
            Intent::Throttle(v) => Intent::Throttle(clamp(v)),
        }
    }
}

impl From<KeyEdge> for Intent {
    fn from(edge: KeyEdge) -> Self {
        Intent::Key(edge)
    }
}

/// FIFO of pending intents, drained once at the start of each tick.
#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<(u64, Intent)>,
}

impl IntentQueue {
    pub fn push(&mut self, player_id: u64, intent: Intent) {
        self.pending.push_back((player_id, intent));
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (u64, Intent)> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops everything queued for a player that is leaving.
    pub fn forget(&mut self, player_id: u64) {
        self.pending.retain(|(id, _)| *id != player_id);
    }
}

/// Applies one intent to an entity using its ship profile.
pub fn apply_intent(e: &mut SimEntity, intent: Intent, ships: &ShipCatalogue) -> Result<(), SimError> {
    if let Intent::Key(KeyEdge::ChangeShipType) = intent {
        let next = ships
            .next_after(&e.ship_type)
            .ok_or_else(|| SimError::UnknownShipType(e.ship_type.clone()))?;
        e.ship_type = next.name.clone();
        e.vr = 0.0;
        e.accel = 0.0;
        e.strafe = 0.0;
        e.throttle = 0.0;
        return Ok(());
    }

    let ship = ships
        .get(&e.ship_type)
        .ok_or_else(|| SimError::UnknownShipType(e.ship_type.clone()))?;

    match intent.clamped() {
        Intent::Key(KeyEdge::TurnLeftDown) => e.vr = -ship.turn_rate,
        Intent::Key(KeyEdge::TurnRightDown) => e.vr = ship.turn_rate,
        Intent::Key(KeyEdge::TurnLeftUp) => {
            if e.vr < 0.0 {
                e.vr = 0.0;
            }
        }
        Intent::Key(KeyEdge::TurnRightUp) => {
            if e.vr > 0.0 {
                e.vr = 0.0;
            }
        }
        Intent::Key(KeyEdge::AccelerateDown) => e.accel = ship.acceleration,
        Intent::Key(KeyEdge::AccelerateUp) => e.accel = 0.0,
        Intent::Key(KeyEdge::FireDown) => e.firing = true,
        Intent::Key(KeyEdge::FireUp) => e.firing = false,
        Intent::Key(KeyEdge::ChangeShipType) => {}
        Intent::Turn(amount) => e.vr = amount * ship.turn_rate,
        Intent::Accelerate(amount) => e.accel = amount * ship.acceleration,
        Intent::Heading(amount) => e.direction = wrap_angle(amount * PI),
        Intent::Strafe(amount) => e.strafe = amount,
        Intent::Throttle(amount) => e.throttle = amount,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rocket() -> SimEntity {
        SimEntity::new(1, "Pilot", "rocket", 100)
    }

    #[test]
    fn when_parsing_known_tokens_then_edges_round_trip() {
        for edge in [
            KeyEdge::TurnLeftDown,
            KeyEdge::AccelerateUp,
            KeyEdge::FireDown,
            KeyEdge::ChangeShipType,
        ] {
            assert_eq!(edge.token().parse::<KeyEdge>(), Ok(edge));
        }
    }

    #[test]
    fn when_parsing_unknown_token_then_returns_unknown_intent() {
        let result = "barrel-roll".parse::<KeyEdge>();

        assert_eq!(result, Err(SimError::UnknownIntent("barrel-roll".to_string())));
    }

    #[test]
    fn when_releasing_left_while_turning_right_then_turn_is_kept() {
        let ships = ShipCatalogue::default();
        let mut e = rocket();

        apply_intent(&mut e, KeyEdge::TurnRightDown.into(), &ships).expect("known ship");
        apply_intent(&mut e, KeyEdge::TurnLeftUp.into(), &ships).expect("known ship");

        assert!(e.vr > 0.0);

        apply_intent(&mut e, KeyEdge::TurnRightUp.into(), &ships).expect("known ship");
        assert_eq!(e.vr, 0.0);
    }

    #[test]
    fn when_axis_exceeds_range_then_it_is_clamped() {
        let ships = ShipCatalogue::default();
        let turn_rate = ships.get("rocket").expect("default ship").turn_rate;
        let mut e = rocket();

        apply_intent(&mut e, Intent::Turn(-7.5), &ships).expect("known ship");
        apply_intent(&mut e, Intent::Throttle(f64::NAN), &ships).expect("known ship");

        assert_eq!(e.vr, -turn_rate);
        assert_eq!(e.throttle, 0.0);
    }

    #[test]
    fn when_heading_axis_is_negative_then_direction_is_wrapped() {
        let ships = ShipCatalogue::default();
        let mut e = rocket();

        apply_intent(&mut e, Intent::Heading(-0.5), &ships).expect("known ship");

        assert!((e.direction - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn when_changing_ship_type_then_next_profile_is_selected() {
        let ships = ShipCatalogue::default();
        let mut e = rocket();
        e.accel = 0.5;

        apply_intent(&mut e, KeyEdge::ChangeShipType.into(), &ships).expect("catalogue not empty");

        assert_eq!(e.ship_type, "tank");
        assert_eq!(e.accel, 0.0);
    }

    #[test]
    fn when_ship_type_is_unknown_then_intent_is_rejected() {
        let ships = ShipCatalogue::default();
        let mut e = SimEntity::new(2, "Ghost", "submarine", 100);

        let result = apply_intent(&mut e, KeyEdge::FireDown.into(), &ships);

        assert!(matches!(result, Err(SimError::UnknownShipType(_))));
        assert!(!e.firing);
    }

    #[test]
    fn when_forgetting_player_then_only_their_intents_are_dropped() {
        let mut queue = IntentQueue::default();
        queue.push(1, KeyEdge::FireDown.into());
        queue.push(2, KeyEdge::FireDown.into());
        queue.push(1, KeyEdge::FireUp.into());

        queue.forget(1);

        let remaining: Vec<(u64, Intent)> = queue.drain().collect();
        assert_eq!(remaining, vec![(2, Intent::Key(KeyEdge::FireDown))]);
    }
}
