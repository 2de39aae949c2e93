// Platforms and the per-tick landing rule

use crate::engine::physics::{overlap, Rect};

/// Slack used when comparing edges that were snapped together last tick
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Static rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    /// Droppable platforms only catch occupants falling from above who are
    /// not holding down. They never block horizontal or upward motion.
    pub droppable: bool,
}

impl Platform {
    pub fn solid(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            droppable: false,
        }
    }

    pub fn droppable(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            droppable: true,
        }
    }

    pub fn top(&self) -> f32 {
        self.rect.top()
    }

    /// Whether this platform holds up a mover that went from `prev` to `curr`
    /// this tick.
    ///
    /// Upward motion is never caught. Solid platforms catch anything resting
    /// on or sinking into their upper half. Droppable platforms additionally
    /// require the mover to have been fully above the top last tick and to
    /// not be holding down.
    pub fn supports(&self, prev: &Rect, curr: &Rect, down_held: bool) -> bool {
        if curr.top() < prev.top() {
            return false;
        }
        let o = overlap(curr, &self.rect);
        if o.x <= 0.0 || curr.bottom() < self.top() - CONTACT_EPSILON {
            return false;
        }
        if self.droppable {
            !down_held && prev.bottom() <= self.top() + CONTACT_EPSILON
        } else {
            curr.center().y <= self.rect.center().y
        }
    }

    /// Whether a horizontal move from `prev` to `curr` ran into this
    /// platform's side. Only solid platforms block, and only movers that
    /// were not already inside the platform's horizontal span.
    pub fn blocks_horizontally(&self, prev: &Rect, curr: &Rect) -> bool {
        if self.droppable {
            return false;
        }
        let now = overlap(curr, &self.rect);
        let before = overlap(prev, &self.rect);
        now.x > 0.0 && now.y > CONTACT_EPSILON && before.x <= CONTACT_EPSILON
    }
}
