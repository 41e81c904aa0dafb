//! 最佳拟合平面投影模块
//!
//! 现实中导出的 5 顶点以上多边形面经常不是严格共面的，直接在 3D 中
//! 三角化没有良好定义。本模块先为面顶点求一个最小二乘意义下的拟合平面，
//! 再把顶点投影到该平面上得到 2D 坐标。
//!
//! # 算法
//!
//! 1. 计算质心并将所有点中心化
//! 2. 计算 3×3 协方差矩阵（6 个独立的对称项）
//! 3. 用特征多项式的三角函数闭式解求特征值
//!    （对称 3×3 矩阵的稳定解法；协方差接近对角时直接取对角线元素）
//! 4. 用伴随矩阵的闭式公式求特征向量，丢弃最小特征值对应的方向
//!    （即平面法线 / 方差最小的方向），其余两个归一化后作为平面内基
//! 5. 将中心化的点投影到基向量上得到 2D 坐标
//! 6. 用鞋带公式检查环的方向，必要时翻转第二个基坐标，
//!    保证下游三角化看到与原始环一致的逆时针方向

use nalgebra::{Vector2, Vector3};
use std::f32::consts::PI;

/// 协方差矩阵被视为对角矩阵的非对角项容差
const DIAGONAL_EPS: f32 = 1e-15;

/// 将一个 3D 多边形环投影到其最佳拟合平面上
///
/// # 参数
///
/// - `points`: 按环顺序排列的 3D 顶点（至少 3 个）
///
/// # 返回
///
/// 与输入顺序一一对应的 2D 坐标序列，环方向为逆时针。
pub fn project_to_best_fit_plane(points: &[Vector3<f32>]) -> Vec<Vector2<f32>> {
    // 1. 质心与中心化
    let mut centroid = Vector3::zeros();
    for p in points {
        centroid += p;
    }
    centroid /= points.len() as f32;

    let centered: Vec<Vector3<f32>> = points.iter().map(|p| p - centroid).collect();

    // 2. 协方差矩阵的 6 个独立项
    let (mut cov_xx, mut cov_xy, mut cov_xz) = (0.0f32, 0.0f32, 0.0f32);
    let (mut cov_yy, mut cov_yz, mut cov_zz) = (0.0f32, 0.0f32, 0.0f32);

    for c in &centered {
        cov_xx += c.x * c.x;
        cov_xy += c.x * c.y;
        cov_xz += c.x * c.z;
        cov_yy += c.y * c.y;
        cov_yz += c.y * c.z;
        cov_zz += c.z * c.z;
    }

    // 3. 特征值（三角函数闭式解）
    // 参考: https://en.wikipedia.org/wiki/Eigenvalue_algorithm#3%C3%973_matrices
    let p1 = cov_xy * cov_xy + cov_xz * cov_xz + cov_yz * cov_yz;
    let trace = cov_xx + cov_yy + cov_zz;

    let (eig1, eig2, eig3);
    if p1 > DIAGONAL_EPS {
        let q = trace / 3.0;
        let dx = cov_xx - q;
        let dy = cov_yy - q;
        let dz = cov_zz - q;
        let p2 = dx * dx + dy * dy + dz * dz + 2.0 * p1;
        let p = (p2 / 6.0).sqrt();

        let det_b = dx * dy * dz + 2.0 * cov_xy * cov_yz * cov_xz
            - dx * cov_yz * cov_yz
            - dy * cov_xz * cov_xz
            - dz * cov_xy * cov_xy;
        let r = (det_b / (2.0 * p * p * p)).clamp(-1.0, 1.0);
        let phi = r.acos() / 3.0;

        eig1 = q + 2.0 * p * phi.cos();
        eig2 = q + 2.0 * p * (phi + 2.0 * PI / 3.0).cos();
        eig3 = trace - eig1 - eig2;
    } else {
        // 协方差在数值上已是对角矩阵，特征值即为排序后的对角线元素
        eig1 = cov_xx.max(cov_yy).max(cov_zz);
        eig3 = cov_xx.min(cov_yy).min(cov_zz);
        eig2 = trace - eig1 - eig3;
    }

    // 4. 特征向量（伴随矩阵闭式公式）。
    // 只需要两个平面内的方向，因此不关心大小顺序，只排除最小特征值对应的方向。
    let ev0 = Vector3::new(
        cov_xy * cov_xy + cov_xz * cov_xz + (cov_xx - eig2) * (cov_xx - eig3),
        cov_xy * ((cov_xx - eig3) + (cov_yy - eig2)) + cov_xz * cov_yz,
        cov_xz * ((cov_xx - eig3) + (cov_zz - eig2)) + cov_xy * cov_yz,
    );
    let ev1 = Vector3::new(
        cov_xy * ((cov_xx - eig1) + (cov_yy - eig3)) + cov_xz * cov_yz,
        cov_yz * cov_yz + cov_xy * cov_xy + (cov_yy - eig1) * (cov_yy - eig3),
        cov_yz * ((cov_yy - eig3) + (cov_zz - eig1)) + cov_xy * cov_xz,
    );
    let ev2 = Vector3::new(
        cov_xz * ((cov_xx - eig1) + (cov_zz - eig2)) + cov_xy * cov_yz,
        cov_yz * ((cov_yy - eig1) + (cov_zz - eig2)) + cov_xy * cov_xz,
        cov_yz * cov_yz + cov_xz * cov_xz + (cov_zz - eig1) * (cov_zz - eig2),
    );

    let min_eig = eig1.min(eig2).min(eig3);
    let (basis_u, basis_v) = if eig3 == min_eig {
        (ev0.normalize(), ev1.normalize())
    } else if eig2 == min_eig {
        (ev0.normalize(), ev2.normalize())
    } else {
        // eig1 最小的情况最不常见
        (ev1.normalize(), ev2.normalize())
    };

    // 5. 投影到平面内基
    let mut projected: Vec<Vector2<f32>> = centered
        .iter()
        .map(|c| Vector2::new(c.dot(&basis_u), c.dot(&basis_v)))
        .collect();

    // 6. 鞋带公式检查方向。和为正表示选出的基翻转了环的方向，
    // 此时翻转第二个坐标以保持逆时针。
    let mut sum = 0.0f32;
    for i in 0..projected.len() {
        let a = projected[i];
        let b = projected[(i + 1) % projected.len()];
        sum += (b.x - a.x) * (b.y + a.y);
    }

    if sum > 0.0 {
        for p in &mut projected {
            p.y = -p.y;
        }
    }

    projected
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2D 多边形的有向面积（逆时针为正）
    fn signed_area(points: &[Vector2<f32>]) -> f32 {
        let mut sum = 0.0;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    /// 各方向方差不同的平面八边形，避免协方差出现重复特征值
    fn stretched_octagon(z: f32) -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(2.0, 0.0, z),
            Vector3::new(1.4, 0.7, z),
            Vector3::new(0.0, 1.0, z),
            Vector3::new(-1.4, 0.7, z),
            Vector3::new(-2.0, 0.0, z),
            Vector3::new(-1.4, -0.7, z),
            Vector3::new(0.0, -1.0, z),
            Vector3::new(1.4, -0.7, z),
        ]
    }

    #[test]
    fn test_planar_polygon_preserves_distances() {
        let points = stretched_octagon(5.0);
        let projected = project_to_best_fit_plane(&points);

        assert_eq!(projected.len(), points.len());

        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d3 = (points[i] - points[j]).norm();
                let d2 = (projected[i] - projected[j]).norm();
                assert!((d3 - d2).abs() < 1e-4, "距离未保持: {} vs {}", d3, d2);
            }
        }
    }

    #[test]
    fn test_projected_loop_is_counter_clockwise() {
        let projected = project_to_best_fit_plane(&stretched_octagon(0.0));
        assert!(signed_area(&projected) > 0.0);
    }

    #[test]
    fn test_tilted_polygon() {
        // 绕 x 轴倾斜 30 度的平面多边形
        let (sin, cos) = (30.0f32).to_radians().sin_cos();
        let points: Vec<Vector3<f32>> = stretched_octagon(0.0)
            .iter()
            .map(|p| Vector3::new(p.x, p.y * cos, p.y * sin))
            .collect();

        let projected = project_to_best_fit_plane(&points);

        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            let d3 = (points[i] - points[j]).norm();
            let d2 = (projected[i] - projected[j]).norm();
            assert!((d3 - d2).abs() < 1e-3);
        }
        assert!(signed_area(&projected) > 0.0);
    }

    #[test]
    fn test_near_planar_polygon() {
        // 轻微非共面的面：投影仍应给出合理的 2D 环
        let mut points = stretched_octagon(0.0);
        points[1].z += 0.05;
        points[4].z -= 0.05;

        let projected = project_to_best_fit_plane(&points);

        assert_eq!(projected.len(), 8);
        assert!(signed_area(&projected) > 0.0);
        for p in &projected {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }
}
