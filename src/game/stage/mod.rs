// Stage: platform layout, spawn points and blast zone

pub mod platform;

pub use platform::{Platform, CONTACT_EPSILON};

use glam::Vec2;

use crate::engine::physics::{bounce, bump_axis, overlap, Axis, Body, Rect};

/// Stable handle for a platform added to a stage
pub type PlatformId = u32;

/// Which side of the mover a wall was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// What a body touched after one tick of movement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contact {
    /// Resting on a platform this tick
    pub grounded: bool,
    /// Touching the side of a solid platform
    pub wall: Option<Side>,
}

/// Immutable-during-play level geometry. External game logic may add or
/// remove platforms between ticks.
#[derive(Debug, Clone)]
pub struct Stage {
    platforms: Vec<(PlatformId, Platform)>,
    next_id: PlatformId,
    spawn_points: Vec<Vec2>,
    blast_zone: Rect,
}

impl Stage {
    pub fn new(blast_zone: Rect) -> Self {
        Self {
            platforms: Vec::new(),
            next_id: 0,
            spawn_points: Vec::new(),
            blast_zone,
        }
    }

    /// Build a stage from platform descriptors
    pub fn from_platforms(blast_zone: Rect, platforms: impl IntoIterator<Item = Platform>) -> Self {
        let mut stage = Self::new(blast_zone);
        for platform in platforms {
            stage.add_platform(platform);
        }
        stage
    }

    /// A wide solid main platform with three droppable platforms above
    pub fn training_ground() -> Self {
        let mut stage = Self::from_platforms(
            Rect::new(-600.0, -700.0, 2400.0, 1500.0),
            [
                Platform::solid(100.0, 400.0, 1000.0, 60.0),
                Platform::droppable(250.0, 290.0, 200.0, 8.0),
                Platform::droppable(750.0, 290.0, 200.0, 8.0),
                Platform::droppable(500.0, 190.0, 200.0, 8.0),
            ],
        );
        stage.spawn_points = vec![
            Vec2::new(300.0, 340.0),
            Vec2::new(860.0, 340.0),
            Vec2::new(580.0, 130.0),
            Vec2::new(580.0, 340.0),
        ];
        stage
    }

    pub fn add_platform(&mut self, platform: Platform) -> PlatformId {
        let id = self.next_id;
        self.next_id += 1;
        self.platforms.push((id, platform));
        id
    }

    pub fn remove_platform(&mut self, id: PlatformId) -> Option<Platform> {
        let pos = self.platforms.iter().position(|(pid, _)| *pid == id)?;
        Some(self.platforms.remove(pos).1)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().map(|(_, p)| p)
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn add_spawn_point(&mut self, point: Vec2) {
        self.spawn_points.push(point);
    }

    /// Spawn point for a slot, cycling when there are more slots than points
    pub fn spawn_point(&self, slot: usize) -> Vec2 {
        if self.spawn_points.is_empty() {
            return self.blast_zone.center();
        }
        self.spawn_points[slot % self.spawn_points.len()]
    }

    pub fn blast_zone(&self) -> Rect {
        self.blast_zone
    }

    /// True once `rect` has fully left the blast zone
    pub fn is_out_of_bounds(&self, rect: &Rect) -> bool {
        rect.is_outside(&self.blast_zone)
    }

    /// Integrate `body` for one tick and resolve it against the platforms.
    ///
    /// X is integrated and resolved first against solid platform sides, then
    /// Y against the landing rule evaluated from the previous tick's rect.
    /// The caller is expected to have called [`Body::begin_tick`].
    pub fn move_body(&self, body: &mut Body, down_held: bool) -> Contact {
        let prev = body.previous_rect();
        let mut contact = Contact::default();

        body.integrate_x();
        for platform in self.platforms() {
            let curr = body.rect();
            if platform.blocks_horizontally(&prev, &curr) {
                let correction = bump_axis(body, &platform.rect, Axis::X);
                if correction < 0.0 {
                    contact.wall = Some(Side::Right);
                } else if correction > 0.0 {
                    contact.wall = Some(Side::Left);
                }
            }
        }

        body.integrate_y();
        let curr = body.rect();
        let landing = self
            .platforms()
            .filter(|p| p.supports(&prev, &curr, down_held))
            .map(Platform::top)
            .reduce(f32::min);
        if let Some(top) = landing {
            body.set_bottom(top);
            body.velocity.y = 0.0;
            contact.grounded = true;
        }

        if contact.wall.is_none() {
            contact.wall = self.wall_touching(&body.rect());
        }
        contact
    }

    /// Integrate a free body and bounce it off solid platforms.
    /// Returns true when it hit anything.
    pub fn bounce_body(&self, body: &mut Body, restitution: f32) -> bool {
        body.integrate();
        let mut hit = false;
        for platform in self.platforms().filter(|p| !p.droppable) {
            hit |= bounce(body, &platform.rect, restitution).is_some();
        }
        hit
    }

    fn wall_touching(&self, rect: &Rect) -> Option<Side> {
        self.platforms().filter(|p| !p.droppable).find_map(|p| {
            let o = overlap(rect, &p.rect);
            if o.y <= CONTACT_EPSILON || o.x.abs() > CONTACT_EPSILON {
                return None;
            }
            if (rect.right() - p.rect.left()).abs() <= CONTACT_EPSILON {
                Some(Side::Right)
            } else if (rect.left() - p.rect.right()).abs() <= CONTACT_EPSILON {
                Some(Side::Left)
            } else {
                None
            }
        })
    }
}
