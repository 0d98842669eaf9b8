//! Axis-aligned box and circle collision helpers.
//!
//! Coordinates are world units with y up. Boxes are described by center and
//! full size.

mod collision;

pub use collision::{Aabb, Circle, CollisionInfo, Overlaps, collides, collides_aabb_circle};
