//! Signed distance helpers for contact detection
//!
//! Negative inside, zero on the surface, positive outside.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box with rounded corners
///
/// `half_extents` is the half size of the full box (corners included);
/// `corner` is clamped so it never exceeds the smaller half extent.
pub fn sd_rounded_box(p: Vec2, center: Vec2, half_extents: Vec2, corner: f32) -> f32 {
    let corner = corner.clamp(0.0, half_extents.min_element());
    let q = (p - center).abs() - half_extents + Vec2::splat(corner);
    q.max(Vec2::ZERO).length() + q.max_element().min(0.0) - corner
}

/// Whether a circle overlaps a shape given the shape's SDF at the circle centre
#[inline]
pub fn circle_touches(distance_to_shape: f32, radius: f32) -> bool {
    distance_to_shape < radius
}
