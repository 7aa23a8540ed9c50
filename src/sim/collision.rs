//! Collision detection and response for axis-aligned boxes and ground segments
//!
//! Every collider is reduced to an [`Aabb`]. Box-vs-box contacts resolve along the
//! axis of smaller overlap. Ground segments behave like horizontal capsules: a
//! contact over the flat span always resolves vertically, only the rounded ends
//! fall back to the box rule.

use glam::Vec2;

use super::physics::{Body, Shape};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap on each axis (negative means separated by that distance)
    #[inline]
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes touch (within slop) or overlap
    pub hit: bool,
    /// Unit normal pointing from the second shape toward the first
    pub normal: Vec2,
    /// Overlap depth along the normal (at most `slop` below zero when only touching)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Displacement that moves the first shape out of the second
    #[inline]
    pub fn push(&self) -> Vec2 {
        self.normal * self.penetration.max(0.0)
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.normal.y.abs() > self.normal.x.abs()
    }
}

/// Bounding box of a body's shape
pub fn body_aabb(body: &Body) -> Aabb {
    Aabb::from_position_size(body.position, body.shape.extent())
}

/// Box-vs-box check. The smaller overlap axis becomes the contact normal.
pub fn box_box_collision(a: &Aabb, b: &Aabb, slop: f32) -> CollisionResult {
    let overlap = a.overlap(b);
    if overlap.x <= -slop || overlap.y <= -slop {
        return CollisionResult::miss();
    }

    let (ca, cb) = (a.center(), b.center());
    if overlap.x < overlap.y {
        let dir = if ca.x < cb.x { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(dir, 0.0),
            penetration: overlap.x,
        }
    } else {
        vertical_contact(ca, cb, overlap.y)
    }
}

/// Box-vs-segment check. `segment` is the capsule's bounding box; its end caps
/// have radius `half_thickness`.
pub fn box_segment_collision(
    a: &Aabb,
    segment: &Aabb,
    half_thickness: f32,
    slop: f32,
) -> CollisionResult {
    let overlap = a.overlap(segment);
    if overlap.x <= -slop || overlap.y <= -slop {
        return CollisionResult::miss();
    }

    let flat_left = segment.min.x + half_thickness;
    let flat_right = segment.max.x - half_thickness;
    let over_flat = a.max.x > flat_left && a.min.x < flat_right;
    if over_flat {
        vertical_contact(a.center(), segment.center(), overlap.y)
    } else {
        box_box_collision(a, segment, slop)
    }
}

fn vertical_contact(ca: Vec2, cb: Vec2, depth: f32) -> CollisionResult {
    let dir = if ca.y < cb.y { -1.0 } else { 1.0 };
    CollisionResult {
        hit: true,
        normal: Vec2::new(0.0, dir),
        penetration: depth,
    }
}

/// Check a dynamic body (`a`) against any other body (`b`)
pub fn body_collision(a: &Body, b: &Body, slop: f32) -> CollisionResult {
    let box_a = body_aabb(a);
    let box_b = body_aabb(b);
    match b.shape {
        Shape::Box { .. } => box_box_collision(&box_a, &box_b, slop),
        Shape::Segment { half_thickness, .. } => {
            box_segment_collision(&box_a, &box_b, half_thickness, slop)
        }
    }
}

/// Whether a contact normal supports a body against the given gravity.
///
/// The normal points toward the supported body, so it must oppose gravity.
#[inline]
pub fn is_ground_contact(normal: Vec2, gravity: Vec2, threshold: f32) -> bool {
    normal.dot(gravity.normalize_or_zero()) < -threshold
}

/// Push a dynamic body out of a static one.
///
/// Only the dominant axis is corrected, and the velocity along it is zeroed if the
/// body was moving into the surface.
pub fn resolve_static(body: &mut Body, result: &CollisionResult) {
    let push = result.push();
    if push.y.abs() > push.x.abs() || (push == Vec2::ZERO && result.is_vertical()) {
        body.position.y += push.y;
        if body.velocity.y * result.normal.y < 0.0 {
            body.velocity.y = 0.0;
        }
    } else {
        body.position.x += push.x;
        if body.velocity.x * result.normal.x < 0.0 {
            body.velocity.x = 0.0;
        }
    }
}

/// Separate two dynamic bodies and redistribute their normal velocity.
///
/// Each body moves by the other's share of the total mass, so the heavier body
/// moves less. When approaching, both normal components become the mass-weighted
/// average (perfectly inelastic).
pub fn resolve_dynamic(a: &mut Body, b: &mut Body, result: &CollisionResult) {
    let total = a.mass + b.mass;
    let share_a = b.mass / total;
    let share_b = a.mass / total;

    let push = result.push();
    a.position += push * share_a;
    b.position -= push * share_b;

    let n = result.normal;
    let va = a.velocity.dot(n);
    let vb = b.velocity.dot(n);
    if va - vb < 0.0 {
        let common = va * (a.mass / total) + vb * (b.mass / total);
        a.velocity += n * (common - va);
        b.velocity += n * (common - vb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::Body;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_position_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_box_box_vertical_from_above() {
        // Box sinking 4 units into a wide floor
        let a = aabb(10.0, 0.0, 32.0, 32.0);
        let floor = aabb(0.0, 28.0, 300.0, 32.0);
        let result = box_box_collision(&a, &floor, 0.01);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 4.0).abs() < 1e-4);
        assert_eq!(result.push(), Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_box_box_horizontal_from_left() {
        let a = aabb(0.0, 0.0, 32.0, 32.0);
        let wall = aabb(30.0, -50.0, 20.0, 200.0);
        let result = box_box_collision(&a, &wall, 0.01);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(-1.0, 0.0));
        assert!((result.penetration - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_box_box_miss_and_touch() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        assert!(!box_box_collision(&a, &aabb(20.0, 0.0, 10.0, 10.0), 0.01).hit);

        // Exactly touching counts as a contact, with nothing to push
        let result = box_box_collision(&a, &aabb(0.0, 10.0, 10.0, 10.0), 0.01);
        assert!(result.hit);
        assert_eq!(result.push(), Vec2::ZERO);
    }

    #[test]
    fn test_segment_flat_span_resolves_vertically() {
        // Deep overlap near the left end still pushes up while over the flat span
        let a = aabb(-12.0, 0.0, 32.0, 32.0);
        let segment = aabb(0.0, 10.0, 200.0, 32.0);
        let result = box_segment_collision(&a, &segment, 16.0, 0.01);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 22.0).abs() < 1e-4);

        // The same geometry as plain boxes picks the smaller, horizontal overlap
        let boxed = box_box_collision(&a, &segment, 0.01);
        assert_eq!(boxed.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_segment_end_cap_uses_box_rule() {
        // Body entirely beside the flat span (over the left cap)
        let a = aabb(-30.0, 40.0, 32.0, 16.0);
        let segment = aabb(0.0, 30.0, 200.0, 32.0);
        let result = box_segment_collision(&a, &segment, 16.0, 0.01);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ground_contact_polarity() {
        let down = Vec2::new(0.0, 600.0);
        let up = -down;
        let from_above = Vec2::new(0.0, -1.0);
        let from_below = Vec2::new(0.0, 1.0);
        assert!(is_ground_contact(from_above, down, 0.7));
        assert!(!is_ground_contact(from_below, down, 0.7));
        assert!(is_ground_contact(from_below, up, 0.7));
        assert!(!is_ground_contact(Vec2::new(1.0, 0.0), down, 0.7));
    }

    #[test]
    fn test_resolve_static_keeps_separating_velocity() {
        let mut body = Body::dynamic(Vec2::new(0.0, 0.0), Vec2::splat(32.0), 1.0);
        body.velocity = Vec2::new(5.0, -20.0);
        let result = CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, -1.0),
            penetration: 0.0,
        };
        resolve_static(&mut body, &result);
        // Already moving away from the floor: untouched
        assert_eq!(body.velocity, Vec2::new(5.0, -20.0));

        body.velocity = Vec2::new(5.0, 20.0);
        let result = CollisionResult {
            penetration: 3.0,
            ..result
        };
        resolve_static(&mut body, &result);
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
        assert_eq!(body.position, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_resolve_dynamic_heavier_moves_less() {
        let mut light = Body::dynamic(Vec2::ZERO, Vec2::splat(10.0), 1.0);
        let mut heavy = Body::dynamic(Vec2::new(8.0, 0.0), Vec2::splat(10.0), 3.0);
        light.velocity = Vec2::new(40.0, 0.0);
        heavy.velocity = Vec2::ZERO;

        let result = body_collision(&light, &heavy, 0.01);
        assert_eq!(result.normal, Vec2::new(-1.0, 0.0));
        resolve_dynamic(&mut light, &mut heavy, &result);

        // 2 units of overlap split 3:1
        assert!((light.position.x - -1.5).abs() < 1e-4);
        assert!((heavy.position.x - 8.5).abs() < 1e-4);
        // Momentum 40 shared over mass 4
        assert!((light.velocity.x - 10.0).abs() < 1e-4);
        assert!((heavy.velocity.x - 10.0).abs() < 1e-4);
    }
}
