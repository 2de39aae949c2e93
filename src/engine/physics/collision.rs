use glam::Vec2;

use super::body::Body;

/// Axis-aligned rectangle, `position` is the top-left corner (+y points down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Build a rect of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            position: center - size * 0.5,
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// True when the rects overlap with positive area
    pub fn intersects(&self, other: &Rect) -> bool {
        let o = overlap(self, other);
        o.x > 0.0 && o.y > 0.0
    }

    /// True when this rect shares no area or edge with `other`
    pub fn is_outside(&self, other: &Rect) -> bool {
        let o = overlap(self, other);
        o.x < 0.0 || o.y < 0.0
    }
}

/// Axis selector for single-axis resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Euclidean distance between two points
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    p1.distance(p2)
}

/// Penetration depth of `a` into `b` along each axis.
///
/// A component `<= 0` means the rects do not truly overlap on that axis
/// (zero is edge contact, negative is the gap).
pub fn overlap(a: &Rect, b: &Rect) -> Vec2 {
    let dx = a.right().min(b.right()) - a.left().max(b.left());
    let dy = a.bottom().min(b.bottom()) - a.top().max(b.top());
    Vec2::new(dx, dy)
}

/// Signed push that moves `mover` out of `immovable` along `axis`, picked by
/// which side of the obstacle the mover's centre is on.
fn push_out(mover: &Rect, immovable: &Rect, axis: Axis, depth: f32) -> f32 {
    let (m, i) = (mover.center(), immovable.center());
    match axis {
        Axis::X if m.x < i.x => -depth,
        Axis::X => depth,
        Axis::Y if m.y < i.y => -depth,
        Axis::Y => depth,
    }
}

/// Push `mover` fully outside `immovable` along the axis of least penetration
/// and zero that velocity component. Returns the axis used, if any.
pub fn bump(mover: &mut Body, immovable: &Rect) -> Option<Axis> {
    let o = overlap(&mover.rect(), immovable);
    if o.x <= 0.0 || o.y <= 0.0 {
        return None;
    }
    let axis = if o.x < o.y { Axis::X } else { Axis::Y };
    resolve(mover, immovable, axis, o, 0.0);
    Some(axis)
}

/// Push `mover` outside `immovable` on one axis only, against its direction of
/// travel on that axis, and zero the velocity component. Returns the signed
/// correction applied (0.0 when there was no overlap).
pub fn bump_axis(mover: &mut Body, immovable: &Rect, axis: Axis) -> f32 {
    let o = overlap(&mover.rect(), immovable);
    if o.x <= 0.0 || o.y <= 0.0 {
        return 0.0;
    }
    let (velocity, depth) = match axis {
        Axis::X => (mover.velocity.x, o.x),
        Axis::Y => (mover.velocity.y, o.y),
    };
    let correction = if velocity > 0.0 {
        -depth
    } else if velocity < 0.0 {
        depth
    } else {
        push_out(&mover.rect(), immovable, axis, depth)
    };
    match axis {
        Axis::X => {
            mover.position.x += correction;
            mover.velocity.x = 0.0;
        }
        Axis::Y => {
            mover.position.y += correction;
            mover.velocity.y = 0.0;
        }
    }
    correction
}

/// Like [`bump`], but reflects the velocity component scaled by
/// `1 - restitution` instead of zeroing it.
pub fn bounce(mover: &mut Body, immovable: &Rect, restitution: f32) -> Option<Axis> {
    let o = overlap(&mover.rect(), immovable);
    if o.x <= 0.0 || o.y <= 0.0 {
        return None;
    }
    let axis = if o.x < o.y { Axis::X } else { Axis::Y };
    resolve(mover, immovable, axis, o, 1.0 - restitution);
    Some(axis)
}

fn resolve(mover: &mut Body, immovable: &Rect, axis: Axis, o: Vec2, reflect: f32) {
    let rect = mover.rect();
    match axis {
        Axis::X => {
            mover.position.x += push_out(&rect, immovable, Axis::X, o.x);
            mover.velocity.x = -mover.velocity.x * reflect;
        }
        Axis::Y => {
            mover.position.y += push_out(&rect, immovable, Axis::Y, o.y);
            mover.velocity.y = -mover.velocity.y * reflect;
        }
    }
}
