// AI pilot that steers by emitting the same key edges a human client sends.

use crate::domain::angles::signed_angle;
use crate::domain::intent::{Intent, KeyEdge};
use crate::domain::state::SimEntity;
use std::f64::consts::PI;

/// Beyond this heading error the pilot turns.
pub const TURN_THRESHOLD: f64 = PI / 30.0;
/// Within this heading error the pilot thrusts.
pub const THRUST_THRESHOLD: f64 = PI / 15.0;

/// Which buttons the pilot currently holds down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub fire: bool,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub entity_id: u64,
    keys: KeyState,
}

impl Autopilot {
    pub fn new(entity_id: u64) -> Self {
        Self {
            entity_id,
            keys: KeyState::default(),
        }
    }

    pub fn keys(&self) -> KeyState {
        self.keys
    }

    /// Observes the world and returns the key edges to send this tick.
    ///
    /// Only transitions are emitted: holding a key across ticks produces a
    /// single down edge.
    pub fn update(&mut self, entities: &[SimEntity]) -> Vec<Intent> {
        let mut out = Vec::new();
        let Some(me) = entities.iter().find(|e| e.id == self.entity_id) else {
            return out;
        };

        let target = entities
            .iter()
            .filter(|e| e.id != me.id)
            .min_by(|a, b| {
                let da = me.position.distance_squared(a.position);
                let db = me.position.distance_squared(b.position);
                da.total_cmp(&db)
            });

        let Some(target) = target else {
            self.keys.set_left(&mut out, false);
            self.keys.set_right(&mut out, false);
            self.keys.set_accelerate(&mut out, false);
            self.keys.set_fire(&mut out, false);
            return out;
        };

        let offset = target.position - me.position;
        let diff = signed_angle(offset.y.atan2(offset.x) - me.direction);

        let turning = diff.abs() > TURN_THRESHOLD;
        if turning && diff < 0.0 {
            self.keys.set_right(&mut out, false);
            self.keys.set_left(&mut out, true);
        } else {
            self.keys.set_left(&mut out, false);
            self.keys.set_right(&mut out, turning);
        }

        self.keys.set_accelerate(&mut out, diff.abs() <= THRUST_THRESHOLD);
        self.keys.set_fire(&mut out, true);
        out
    }
}

impl KeyState {
    fn set_left(&mut self, out: &mut Vec<Intent>, down: bool) {
        latch(out, &mut self.left, down, KeyEdge::TurnLeftDown, KeyEdge::TurnLeftUp);
    }

    fn set_right(&mut self, out: &mut Vec<Intent>, down: bool) {
        latch(out, &mut self.right, down, KeyEdge::TurnRightDown, KeyEdge::TurnRightUp);
    }

    fn set_accelerate(&mut self, out: &mut Vec<Intent>, down: bool) {
        latch(out, &mut self.accelerate, down, KeyEdge::AccelerateDown, KeyEdge::AccelerateUp);
    }

    fn set_fire(&mut self, out: &mut Vec<Intent>, down: bool) {
        latch(out, &mut self.fire, down, KeyEdge::FireDown, KeyEdge::FireUp);
    }
}

/// Emits `on` or `off` only when the held state actually flips.
fn latch(out: &mut Vec<Intent>, held: &mut bool, down: bool, on: KeyEdge, off: KeyEdge) {
    if *held == down {
        return;
    }
    *held = down;
    out.push(Intent::Key(if down { on } else { off }));
}
