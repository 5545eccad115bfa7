//! Pure-pursuit geometry.

use crate::core::WorldPoint;

/// Intersections of the infinite line through `a` and `b` with a circle.
///
/// Returns zero, one or two points. A degenerate line (`a == b`) has none.
pub fn line_circle_intersections(
    center: WorldPoint,
    radius: f32,
    a: WorldPoint,
    b: WorldPoint,
) -> Vec<WorldPoint> {
    let d = b - a;
    let f = a - center;

    let qa = d.dot(&d);
    if qa <= f32::EPSILON {
        return Vec::new();
    }
    let qb = 2.0 * f.dot(&d);
    let qc = f.dot(&f) - radius * radius;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        let t = -qb / (2.0 * qa);
        return vec![a + d * t];
    }

    let root = discriminant.sqrt();
    let t1 = (-qb - root) / (2.0 * qa);
    let t2 = (-qb + root) / (2.0 * qa);
    vec![a + d * t1, a + d * t2]
}

/// Signed curvature of the arc that leaves the origin along `heading` and
/// passes through `offset` (target minus robot position).
///
/// Positive curves left (CCW). Zero when the target lies on the heading line.
#[inline]
pub fn curvature(heading: WorldPoint, offset: WorldPoint) -> f32 {
    let dist_sq = offset.dot(&offset);
    if dist_sq <= f32::EPSILON {
        return 0.0;
    }
    2.0 * heading.cross(&offset) / dist_sq
}

/// Signed turning radius; infinite for a straight line.
#[inline]
pub fn turning_radius(heading: WorldPoint, offset: WorldPoint) -> f32 {
    let k = curvature(heading, offset);
    if k == 0.0 { f32::INFINITY } else { 1.0 / k }
}
