use glam::{Quat, Vec3};

const EPSILON: f32 = 1e-6;

/// A viewpoint: what the camera looks at, from where, and which way is up.
///
/// `up` is kept unit length and perpendicular to the view direction, and
/// `zoom` is the focus-to-eye distance, always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Eye position.
    pub position: Vec3,
    /// Unit up vector, perpendicular to the view direction.
    pub up: Vec3,
    /// Near clip offset relative to the focus (negative is toward the eye).
    pub z_front: f32,
    /// Far clip offset relative to the focus.
    pub z_back: f32,
    /// Distance from focus to eye.
    pub zoom: f32,
}

/// Eye-space form of a viewpoint, with `eye_up` expressed as a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Eye position.
    pub eye_position: Vec3,
    /// Point one unit along the up vector from the focus.
    pub eye_up: Vec3,
    /// Near clip offset relative to the focus.
    pub z_front: f32,
    /// Far clip offset relative to the focus.
    pub z_back: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0), Vec3::Y, -25.0, 25.0)
    }
}

impl CameraParams {
    /// Camera looking from `position` at `focus`. `up` is re-orthogonalized
    /// against the view direction; a coincident eye is pushed back one unit
    /// along +z.
    #[must_use]
    pub fn new(
        focus: Vec3,
        position: Vec3,
        up: Vec3,
        z_front: f32,
        z_back: f32,
    ) -> Self {
        let position = if position.distance_squared(focus) < EPSILON {
            focus + Vec3::Z
        } else {
            position
        };
        let zoom = position.distance(focus);
        let direction = (focus - position) / zoom;
        Self {
            focus,
            position,
            up: orthonormal_up(up, direction),
            z_front,
            z_back,
            zoom,
        }
    }

    /// Unit view direction, from the eye toward the focus.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.focus - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Eye-space representation.
    #[must_use]
    pub fn to_target(&self) -> CameraTarget {
        CameraTarget {
            focus: self.focus,
            eye_position: self.position,
            eye_up: self.focus + self.up,
            z_front: self.z_front,
            z_back: self.z_back,
        }
    }

    /// Inverse of [`CameraParams::to_target`].
    #[must_use]
    pub fn from_target(target: &CameraTarget) -> Self {
        Self::new(
            target.focus,
            target.eye_position,
            target.eye_up - target.focus,
            target.z_front,
            target.z_back,
        )
    }

    /// Same viewpoint rotated about the focus by `rotation`.
    #[must_use]
    pub fn rotated_about_focus(&self, rotation: Quat) -> Self {
        let offset = rotation * (self.position - self.focus);
        Self {
            position: self.focus + offset,
            up: (rotation * self.up).normalize_or(self.up),
            ..*self
        }
    }

    /// Rotate the eye about the up axis through the focus.
    #[must_use]
    pub fn yawed(&self, radians: f32) -> Self {
        self.rotated_about_focus(Quat::from_axis_angle(self.up, radians))
    }

    /// Re-center on `points` along the current view direction, with the
    /// eye `max_extent * padding` away (at least `min_zoom`). The slab
    /// spans half the zoom either side of the focus. Empty input leaves the
    /// camera unchanged.
    #[must_use]
    pub fn fit_to_points(
        &self,
        points: &[Vec3],
        padding: f32,
        min_zoom: f32,
    ) -> Self {
        let Some(&first) = points.first() else {
            return *self;
        };
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let focus = (min + max) * 0.5;
        let max_extent = (max - min).max_element();
        let zoom = (max_extent * padding).max(min_zoom).max(EPSILON);
        Self {
            focus,
            position: focus - self.direction() * zoom,
            up: self.up,
            z_front: -zoom * 0.5,
            z_back: zoom * 0.5,
            zoom,
        }
    }
}

/// Unit component of `up` perpendicular to unit `direction`, or any
/// perpendicular when the two are parallel.
pub(crate) fn orthonormal_up(up: Vec3, direction: Vec3) -> Vec3 {
    let perp = up - direction * direction.dot(up);
    perp.try_normalize()
        .unwrap_or_else(|| direction.any_orthonormal_vector())
}
