//! Per-point tangent/normal/binormal frames along a backbone path.

use glam::Vec3;

const EPSILON: f32 = 1e-6;

/// Orthonormal frames for every point of one chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frames {
    /// Unit tangents.
    pub tangents: Vec<Vec3>,
    /// Unit normals, perpendicular to the tangent.
    pub normals: Vec<Vec3>,
    /// Unit binormals, `tangent × normal`.
    pub binormals: Vec<Vec3>,
}

/// Compute frames for a chain of backbone `points`.
///
/// `explicit_normals[i]` overrides the curvature normal at point `i`;
/// `is_duplex[i]` exempts point `i` from sign-continuity flipping, on
/// either side of the pair.
pub(crate) fn compute_frames(
    points: &[Vec3],
    explicit_normals: &[Option<Vec3>],
    is_duplex: &[bool],
) -> Frames {
    let tangents = compute_tangents(points);
    let n = points.len();

    // Frenet curvature points inward; ribbons want the outward side.
    let curvatures: Vec<Vec3> = (0..n)
        .map(|i| {
            if n < 3 {
                Vec3::ZERO
            } else if i == 0 {
                -(tangents[1] - tangents[0])
            } else if i == n - 1 {
                -(tangents[n - 1] - tangents[n - 2])
            } else {
                -(tangents[i + 1] - tangents[i - 1]) * 0.5
            }
        })
        .collect();

    let mut normals: Vec<Vec3> = (0..n)
        .map(|i| {
            let raw = explicit_normals
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(curvatures[i]);
            perpendicular_unit(raw, tangents[i])
        })
        .collect();

    let duplex = |i: usize| is_duplex.get(i).copied().unwrap_or(false);
    for i in 1..n {
        if !duplex(i) && !duplex(i - 1) && normals[i].dot(normals[i - 1]) < 0.0
        {
            normals[i] = -normals[i];
        }
    }

    let binormals = tangents
        .iter()
        .zip(&normals)
        .map(|(t, nrm)| t.cross(*nrm).normalize_or_zero())
        .collect();

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// Unit tangents: central differences inside, one-sided at the ends. A
/// two-point chain gets its single end-to-end direction at both points.
fn compute_tangents(points: &[Vec3]) -> Vec<Vec3> {
    let n = points.len();
    match n {
        0 => Vec::new(),
        1 => vec![Vec3::X],
        2 => {
            let t = (points[1] - points[0]).try_normalize().unwrap_or(Vec3::X);
            vec![t, t]
        }
        _ => (0..n)
            .map(|i| {
                let d = if i == 0 {
                    points[1] - points[0]
                } else if i == n - 1 {
                    points[n - 1] - points[n - 2]
                } else {
                    points[i + 1] - points[i - 1]
                };
                d.try_normalize().unwrap_or(Vec3::X)
            })
            .collect(),
    }
}

/// Component of `v` perpendicular to unit `t`, normalized. Degenerate
/// input falls back to an arbitrary perpendicular.
fn perpendicular_unit(v: Vec3, t: Vec3) -> Vec3 {
    let perp = v - t * t.dot(v);
    if perp.length_squared() > EPSILON {
        perp.normalize()
    } else {
        let arbitrary = if t.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        t.cross(arbitrary).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(frames: &Frames) {
        for ((t, n), b) in frames
            .tangents
            .iter()
            .zip(&frames.normals)
            .zip(&frames.binormals)
        {
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(t.dot(*n).abs() < 1e-4);
            assert!((*b - t.cross(*n)).length() < 1e-4);
        }
    }

    fn zigzag(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let y = if i % 2 == 0 { 0.0 } else { 1.5 };
                Vec3::new(3.0 * i as f32, y, 0.0)
            })
            .collect()
    }

    #[test]
    fn two_point_chain_shares_tangent() {
        let points = [Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)];
        let frames = compute_frames(&points, &[None, None], &[false, false]);
        assert_eq!(frames.tangents, vec![Vec3::Z, Vec3::Z]);
        assert_orthonormal(&frames);
    }

    #[test]
    fn straight_line_uses_fallback_normal() {
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::X * i as f32).collect();
        let frames = compute_frames(&points, &[None; 5], &[false; 5]);
        assert_orthonormal(&frames);
    }

    #[test]
    fn zigzag_normals_are_sign_continuous() {
        let points = zigzag(8);
        let frames = compute_frames(&points, &[None; 8], &[false; 8]);
        assert_orthonormal(&frames);
        for pair in frames.normals.windows(2) {
            assert!(pair[0].dot(pair[1]) >= 0.0);
        }
    }

    #[test]
    fn duplex_points_keep_their_sign() {
        let points = zigzag(4);
        let up = Some(Vec3::Y);
        let down = Some(Vec3::NEG_Y);
        let frames =
            compute_frames(&points, &[up, down, up, down], &[true; 4]);
        assert!(frames.normals[1].y < 0.0);
        assert!(frames.normals[2].y > 0.0);
    }

    #[test]
    fn explicit_normal_is_projected() {
        let points = [Vec3::ZERO, Vec3::X * 3.0, Vec3::X * 6.0];
        let tilted = Some(Vec3::new(1.0, 1.0, 0.0));
        let frames =
            compute_frames(&points, &[tilted; 3], &[false; 3]);
        assert!((frames.normals[1] - Vec3::Y).length() < 1e-5);
    }
}
