//! Normalised DLT homography estimation for the feature-matching alignment
//! variant.
use nalgebra::{DMatrix, Matrix3, SymmetricEigen, Vector3};

/// Estimate `H` such that `dst ~ H·src` in homogeneous coordinates.
///
/// Returns `None` with fewer than four correspondences, mismatched inputs, or a
/// degenerate (collinear / coincident) configuration.
pub fn estimate_homography(src: &[[f32; 2]], dst: &[[f32; 2]]) -> Option<Matrix3<f32>> {
    if src.len() != dst.len() || src.len() < 4 {
        return None;
    }
    let t_src = normalisation(src)?;
    let t_dst = normalisation(dst)?;

    let n = src.len();
    let mut a = DMatrix::<f64>::zeros(2 * n, 9);
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let p = t_src * Vector3::new(s[0] as f64, s[1] as f64, 1.0);
        let q = t_dst * Vector3::new(d[0] as f64, d[1] as f64, 1.0);
        let (x, y) = (p[0] / p[2], p[1] / p[2]);
        let (u, v) = (q[0] / q[2], q[1] / q[2]);
        let r0 = [-x, -y, -1.0, 0.0, 0.0, 0.0, u * x, u * y, u];
        let r1 = [0.0, 0.0, 0.0, -x, -y, -1.0, v * x, v * y, v];
        for c in 0..9 {
            a[(2 * i, c)] = r0[c];
            a[(2 * i + 1, c)] = r1[c];
        }
    }

    // Null vector of A is the eigenvector of AᵀA with the smallest eigenvalue.
    // Going through AᵀA keeps the square case (n = 4, A is 8×9) well defined.
    let ata = a.transpose() * &a;
    let eig = SymmetricEigen::new(ata);
    let (min_idx, _) = eig
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|l, r| l.1.total_cmp(r.1))?;
    let h = eig.eigenvectors.column(min_idx);
    let hn = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);

    let t_dst_inv = t_dst.try_inverse()?;
    let full = t_dst_inv * hn * t_src;
    let scale = full[(2, 2)];
    if !scale.is_finite() || scale.abs() < 1e-12 {
        return None;
    }
    let full = full / scale;
    if full.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(full.map(|v| v as f32))
}

/// Hartley normalisation: centroid to origin, mean distance √2.
fn normalisation(pts: &[[f32; 2]]) -> Option<Matrix3<f64>> {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p[0] as f64).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p[1] as f64).sum::<f64>() / n;
    let mean_dist = pts
        .iter()
        .map(|p| ((p[0] as f64 - cx).powi(2) + (p[1] as f64 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if mean_dist < 1e-12 {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    Some(Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(h: &Matrix3<f32>, pts: &[[f32; 2]]) -> Vec<[f32; 2]> {
        pts.iter()
            .map(|p| {
                let v = h * Vector3::new(p[0], p[1], 1.0);
                [v[0] / v[2], v[1] / v[2]]
            })
            .collect()
    }

    fn assert_close(a: [f32; 2], b: [f32; 2]) {
        assert!(
            (a[0] - b[0]).abs() < 1e-2 && (a[1] - b[1]).abs() < 1e-2,
            "expected {:?} ~ {:?}",
            a,
            b
        );
    }

    #[test]
    fn recovers_known_projective_map() {
        let h_true = Matrix3::new(1.1, 0.05, 12.0, -0.02, 0.95, -7.0, 1e-4, -2e-4, 1.0);
        let src = [
            [0.0, 0.0],
            [100.0, 0.0],
            [100.0, 80.0],
            [0.0, 80.0],
            [50.0, 40.0],
            [20.0, 60.0],
        ];
        let dst = project(&h_true, &src);
        let h = estimate_homography(&src, &dst).expect("homography should be estimated");
        let projected = project(&h, &src);
        for (p, q) in projected.iter().zip(&dst) {
            assert_close(*p, *q);
        }
    }

    #[test]
    fn minimal_four_point_case() {
        let src = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let dst = [[5.0, 5.0], [25.0, 5.0], [25.0, 25.0], [5.0, 25.0]];
        let h = estimate_homography(&src, &dst).unwrap();
        let projected = project(&h, &[[5.0, 5.0]]);
        assert_close(projected[0], [15.0, 15.0]);
    }

    #[test]
    fn rejects_too_few_or_coincident_points() {
        let three = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(estimate_homography(&three, &three).is_none());
        let same = [[3.0, 3.0]; 4];
        assert!(estimate_homography(&same, &same).is_none());
    }
}
