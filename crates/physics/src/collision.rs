use glam::Vec2;

/// Below this distance the circle center is treated as inside the box.
const INSIDE_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    /// Full width and height.
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Closest point on or inside the box to `point`.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let half = self.half_extents();
        self.center + (point - self.center).clamp(-half, half)
    }

    /// Inclusive: points on the boundary are contained.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Exclusive: points on the circumference are not contained.
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    /// Bounding box of the circle.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Contact between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Unit contact normal.
    pub normal: Vec2,
    /// Distance to separate the shapes along `normal`. Zero for touching shapes.
    pub penetration: f32,
}

/// Boolean overlap test. Touching shapes do not overlap.
pub trait Overlaps<Rhs = Self> {
    fn overlaps(&self, other: &Rhs) -> bool;
}

impl Overlaps for Aabb {
    fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

impl Overlaps for Circle {
    fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }
}

impl Overlaps<Aabb> for Circle {
    fn overlaps(&self, other: &Aabb) -> bool {
        let closest = other.closest_point(self.center);
        self.center.distance_squared(closest) < self.radius * self.radius
    }
}

impl Overlaps<Circle> for Aabb {
    fn overlaps(&self, other: &Circle) -> bool {
        other.overlaps(self)
    }
}

/// Contact between a circle and a box, with the normal pointing from the
/// circle toward the box.
///
/// Unlike [`Overlaps`], a circle exactly touching the box is reported as a
/// contact with zero penetration.
pub fn collides(circle: &Circle, aabb: &Aabb) -> Option<CollisionInfo> {
    let half = aabb.half_extents();
    let offset = circle.center - aabb.center;
    let closest = aabb.center + offset.clamp(-half, half);
    let to_circle = circle.center - closest;
    let distance_sq = to_circle.length_squared();

    if distance_sq > circle.radius * circle.radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    if distance > INSIDE_EPSILON {
        return Some(CollisionInfo {
            normal: -to_circle / distance,
            penetration: circle.radius - distance,
        });
    }

    // Center inside the box: push out along the shallowest axis.
    let depth = half - offset.abs();
    let info = if depth.x < depth.y {
        CollisionInfo {
            normal: Vec2::new(if offset.x > 0.0 { -1.0 } else { 1.0 }, 0.0),
            penetration: depth.x + circle.radius,
        }
    } else {
        CollisionInfo {
            normal: Vec2::new(0.0, if offset.y > 0.0 { -1.0 } else { 1.0 }),
            penetration: depth.y + circle.radius,
        }
    };
    Some(info)
}

/// Same contact as [`collides`], with the normal pointing from the box toward
/// the circle.
pub fn collides_aabb_circle(aabb: &Aabb, circle: &Circle) -> Option<CollisionInfo> {
    collides(circle, aabb).map(|info| CollisionInfo {
        normal: -info.normal,
        ..info
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::splat(2.0))
    }

    #[test]
    fn aabb_overlap_is_strict() {
        let a = unit_box();
        assert!(a.overlaps(&Aabb::new(Vec2::new(1.5, 0.0), Vec2::splat(2.0))));
        // Edges touch at x = 1.
        assert!(!a.overlaps(&Aabb::new(Vec2::new(2.0, 0.0), Vec2::splat(2.0))));
    }

    #[test]
    fn circle_overlap() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        assert!(a.overlaps(&Circle::new(Vec2::new(1.5, 0.0), 1.0)));
        assert!(!a.overlaps(&Circle::new(Vec2::new(2.0, 0.0), 1.0)));
    }

    #[test]
    fn tangent_circle_is_classified_consistently() {
        let b = unit_box();
        let c = Circle::new(Vec2::new(0.0, 2.0), 1.0);

        assert!(!c.overlaps(&b));
        assert!(!b.overlaps(&c));

        let info = collides(&c, &b).expect("touching counts as contact");
        assert_eq!(info.penetration, 0.0);
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn separated_circle_has_no_contact() {
        let c = Circle::new(Vec2::new(0.0, 3.0), 1.0);
        assert!(collides(&c, &unit_box()).is_none());
    }

    #[test]
    fn radial_contact_outside_box() {
        let c = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let info = collides(&c, &unit_box()).unwrap();
        assert_eq!(info.normal, Vec2::new(-1.0, 0.0));
        assert!((info.penetration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn center_inside_uses_shallowest_axis() {
        let b = Aabb::new(Vec2::ZERO, Vec2::new(4.0, 2.0));
        let c = Circle::new(Vec2::new(0.5, 0.5), 0.25);
        let info = collides(&c, &b).unwrap();
        // 0.5 from the top edge versus 1.5 from the right edge.
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
        assert!((info.penetration - 0.75).abs() < 1e-6);
    }

    #[test]
    fn box_circle_flips_normal() {
        let c = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let a = collides(&c, &unit_box()).unwrap();
        let b = collides_aabb_circle(&unit_box(), &c).unwrap();
        assert_eq!(a.normal, -b.normal);
        assert_eq!(a.penetration, b.penetration);
    }

    #[test]
    fn point_containment() {
        assert!(unit_box().contains(Vec2::new(1.0, -1.0)));
        assert!(!unit_box().contains(Vec2::new(1.1, 0.0)));

        let c = Circle::new(Vec2::ZERO, 1.0);
        assert!(c.contains(Vec2::new(0.5, 0.5)));
        assert!(!c.contains(Vec2::new(1.0, 0.0)));
    }
}
