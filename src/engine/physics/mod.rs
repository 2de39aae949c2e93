// Physics system: kinematic bodies and AABB collision helpers
//
// The simulation runs at a fixed tick with hand-written integration, so the
// only primitives needed are axis-aligned rects and overlap resolution.

pub mod body;
pub mod collision;

pub use body::Body;
pub use collision::{bounce, bump, bump_axis, distance, overlap, Axis, Rect};
