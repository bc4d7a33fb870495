//! Smooth transitions between two viewpoints.
//!
//! The orientation change is split into a direction rotation (old view
//! direction onto the new one) and a roll rotation (the up vector, after
//! the direction rotation, onto the new up). The pair is composed and a
//! fraction of the combined rotation is applied, so roll is always solved
//! net of direction and never drifts.

use glam::{Quat, Vec3};

use super::core::CameraParams;

const EPSILON: f32 = 1e-6;

/// Minimal-arc rotation taking unit `a` onto unit `b`.
///
/// Axis is `a × b` and angle `atan2(|a × b|, a · b)`. Antiparallel input
/// turns half a revolution about `fallback_axis` (made perpendicular to
/// `a`).
#[must_use]
pub fn rotation_between(a: Vec3, b: Vec3, fallback_axis: Vec3) -> Quat {
    let axis = a.cross(b);
    let sin = axis.length();
    let cos = a.dot(b);
    if sin > EPSILON {
        return Quat::from_axis_angle(axis / sin, sin.atan2(cos));
    }
    if cos > 0.0 {
        return Quat::IDENTITY;
    }
    let axis = (fallback_axis - a * a.dot(fallback_axis))
        .try_normalize()
        .unwrap_or_else(|| a.any_orthonormal_vector());
    Quat::from_axis_angle(axis, std::f32::consts::PI)
}

/// Viewpoint a fraction `t` of the way from `from` to `to`.
///
/// `t >= 1` returns `to` exactly; `t <= 0` returns `from`'s orientation.
/// Focus, zoom and slab are interpolated linearly.
#[must_use]
pub fn interpolate(
    from: &CameraParams,
    to: &CameraParams,
    t: f32,
) -> CameraParams {
    if t >= 1.0 {
        return *to;
    }
    let t = t.max(0.0);

    let dir_a = from.direction();
    let dir_b = to.direction();
    let direction_rotation = rotation_between(dir_a, dir_b, from.up);
    let rolled_up = direction_rotation * from.up;
    let roll_rotation = rotation_between(rolled_up, to.up, dir_b);
    let total = roll_rotation * direction_rotation;
    let partial = Quat::IDENTITY.slerp(total, t);

    let focus = from.focus.lerp(to.focus, t);
    let zoom = lerp(from.zoom, to.zoom, t);
    let direction = partial * dir_a;
    CameraParams {
        focus,
        position: focus - direction * zoom,
        up: (partial * from.up).normalize_or(from.up),
        z_front: lerp(from.z_front, to.z_front, t),
        z_back: lerp(from.z_back, to.z_back, t),
        zoom,
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
