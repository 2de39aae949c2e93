use glam::Vec2;

use super::collision::Rect;

/// Kinematic body shared by every simulated entity.
///
/// Positions are top-left corners in screen space (+y down), velocities are
/// in units per tick. `previous` is the rect as it was before this tick's
/// integration, which platform landing rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    previous: Rect,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            previous: Rect { position, size },
        }
    }

    /// Current bounding rect
    pub fn rect(&self) -> Rect {
        Rect {
            position: self.position,
            size: self.size,
        }
    }

    /// Bounding rect at the start of the current tick
    pub fn previous_rect(&self) -> Rect {
        self.previous
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Remember the current rect as "last tick" before moving
    pub fn begin_tick(&mut self) {
        self.previous = self.rect();
    }

    /// Advance along X only
    pub fn integrate_x(&mut self) {
        self.position.x += self.velocity.x;
    }

    /// Advance along Y only
    pub fn integrate_y(&mut self) {
        self.position.y += self.velocity.y;
    }

    /// Advance along both axes
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Place the body so that its bottom edge sits on `y`
    pub fn set_bottom(&mut self, y: f32) {
        self.position.y = y - self.size.y;
    }

    /// Teleport, forgetting the previous rect
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.previous = self.rect();
    }
}
