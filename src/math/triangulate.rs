//! 多边形三角化模块
//!
//! 将一个有序的简单多边形环转换为三角形列表：
//!
//! - 四边形使用对角线对角和规则选择分割方向，避免在非凸或接近退化的
//!   四边形上产生蝴蝶结式的分割
//! - 一般多边形（2D）使用贪心耳切：每次选择内角最小的节点切出三角形，
//!   随后对新边做局部的 Delaunay 翻边细化（Lawson 算法）
//!
//! # 已知限制
//!
//! 耳选择只依赖全局最小内角，没有做教科书式的"凸顶点 + 空三角形"
//! 有效性检查。对于格式预期内的简单、无自交多边形该策略工作良好；
//! 凹陷严重或自交的环的行为未定义。

use nalgebra::{Matrix3, Vector2, Vector3};
use std::collections::VecDeque;
use std::f32::consts::PI;

const TWO_PI: f32 = 2.0 * PI;

/// 选择四边形的分割对角线
///
/// 计算顶点 1 和顶点 3 处的内角和：不大于 π 时沿 (0,2) 对角线分割为
/// `{0,1,2},{0,2,3}`，否则沿 (1,3) 分割为 `{0,1,3},{1,2,3}`。
///
/// # 返回
///
/// 两个三角形，以四边形环内的局部下标表示。
pub fn split_quad(
    p0: &Vector3<f32>,
    p1: &Vector3<f32>,
    p2: &Vector3<f32>,
    p3: &Vector3<f32>,
) -> [[usize; 3]; 2] {
    let v10 = p0 - p1;
    let v12 = p2 - p1;
    let v32 = p2 - p3;
    let v30 = p0 - p3;

    let angle_012 = (v10.dot(&v12) / (v10.norm_squared() * v12.norm_squared()).sqrt()).acos();
    let angle_230 = (v32.dot(&v30) / (v32.norm_squared() * v30.norm_squared()).sqrt()).acos();

    if angle_012 + angle_230 <= PI {
        [[0, 1, 2], [0, 2, 3]]
    } else {
        [[0, 1, 3], [1, 2, 3]]
    }
}

/// 三角化结果的扁平索引列表，按共享边查询三角形邻接关系。
struct TriangleList {
    indices: Vec<u32>,
}

impl TriangleList {
    fn for_polygon(vertex_count: usize) -> Self {
        Self {
            // n 个顶点的简单多边形恰好产生 n-2 个三角形
            indices: Vec::with_capacity(3 * vertex_count.saturating_sub(2)),
        }
    }

    fn append(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    fn set(&mut self, tri: usize, i0: u32, i1: u32, i2: u32) {
        self.indices[tri * 3] = i0;
        self.indices[tri * 3 + 1] = i1;
        self.indices[tri * 3 + 2] = i2;
    }

    /// 查找包含有向边 (e0, e1) 的三角形
    ///
    /// 返回三角形下标和边对面的顶点。相邻的三角形通常是后加入的，
    /// 因此从尾部向前线性扫描。
    fn find_for_edge(&self, e0: u32, e1: u32) -> Option<(usize, u32)> {
        for tri in (0..self.indices.len() / 3).rev() {
            let t = [
                self.indices[tri * 3],
                self.indices[tri * 3 + 1],
                self.indices[tri * 3 + 2],
            ];
            for k in 0..3 {
                if t[k] == e0 && t[(k + 1) % 3] == e1 {
                    return Some((tri, t[(k + 2) % 3]));
                }
            }
        }
        None
    }
}

/// 环上的一个多边形节点：原始环下标加当前内角。
struct PolygonNode {
    id: u32,
    angle: f32,
}

/// 重新计算节点 `i` 处的内角
///
/// 内角 = 指向前驱与指向后继的方向向量极角之差，归一化到 [0, 2π)。
fn compute_angle(polygon: &[Vector2<f32>], nodes: &mut [PolygonNode], i: usize) {
    let n = nodes.len();
    let prev = polygon[nodes[(i + n - 1) % n].id as usize];
    let p = polygon[nodes[i].id as usize];
    let next = polygon[nodes[(i + 1) % n].id as usize];

    let angle_prev = (prev.y - p.y).atan2(prev.x - p.x);
    let angle_next = (next.y - p.y).atan2(next.x - p.x);

    let mut angle = angle_prev - angle_next;
    if angle < 0.0 {
        angle += TWO_PI;
    }
    nodes[i].angle = angle;
}

/// 空外接圆测试：公共边 (idx0, idx2) 两侧顶点为 idx1 和 idx3。
/// 行列式为正表示该边不满足局部 Delaunay 条件，需要翻边。
fn edge_needs_flip(polygon: &[Vector2<f32>], idx0: u32, idx1: u32, idx2: u32, idx3: u32) -> bool {
    let p3 = polygon[idx3 as usize];
    let a = polygon[idx0 as usize] - p3;
    let b = polygon[idx1 as usize] - p3;
    let c = polygon[idx2 as usize] - p3;

    let d = Matrix3::new(
        a.x,
        a.y,
        a.norm_squared(),
        b.x,
        b.y,
        b.norm_squared(),
        c.x,
        c.y,
        c.norm_squared(),
    );

    d.determinant() > 0.0
}

/// 三角化一个有序的 2D 简单多边形环
///
/// # 参数
///
/// - `polygon`: 按逆时针顺序排列的 2D 顶点
///
/// # 返回
///
/// 扁平的三角形索引列表（每 3 个为一个三角形），索引指向输入环。
/// `n` 个顶点产生 `n-2` 个三角形。
pub fn triangulate_polygon(polygon: &[Vector2<f32>]) -> Vec<u32> {
    let mut triangulation = TriangleList::for_polygon(polygon.len());

    let mut nodes: Vec<PolygonNode> = (0..polygon.len() as u32)
        .map(|id| PolygonNode { id, angle: 0.0 })
        .collect();
    for i in 0..nodes.len() {
        compute_angle(polygon, &mut nodes, i);
    }

    let mut edges_to_check: VecDeque<[u32; 2]> = VecDeque::new();

    while nodes.len() > 2 {
        // 贪心选择内角最小的节点（并列时取先出现的）
        let mut min_idx = 0;
        for i in 1..nodes.len() {
            if nodes[i].angle < nodes[min_idx].angle {
                min_idx = i;
            }
        }

        let n = nodes.len();
        let i0 = nodes[(min_idx + n - 1) % n].id;
        let i1 = nodes[min_idx].id;
        let i2 = nodes[(min_idx + 1) % n].id;

        triangulation.append(i0, i1, i2);

        edges_to_check.push_back([i0, i1]);
        edges_to_check.push_back([i1, i2]);
        edges_to_check.push_back([i2, i0]);

        // Lawson 式翻边细化：对队列中的每条边检查空外接圆条件，
        // 翻边后把产生的四条新边重新入队，直到队列耗尽。
        while let Some(edge) = edges_to_check.pop_front() {
            let left = triangulation.find_for_edge(edge[0], edge[1]);
            let right = triangulation.find_for_edge(edge[1], edge[0]);

            if let (Some((left_tri, apex_left)), Some((right_tri, apex_right))) = (left, right) {
                let (idx0, idx2) = (edge[0], edge[1]);
                let (idx1, idx3) = (apex_right, apex_left);

                if edge_needs_flip(polygon, idx0, idx1, idx2, idx3) {
                    triangulation.set(left_tri, idx0, idx1, idx3);
                    triangulation.set(right_tri, idx1, idx2, idx3);

                    edges_to_check.push_back([idx0, idx1]);
                    edges_to_check.push_back([idx1, idx2]);
                    edges_to_check.push_back([idx2, idx3]);
                    edges_to_check.push_back([idx3, idx0]);
                }
            }
        }

        // 移除处理过的节点，其两个旧邻居的内角随之改变
        nodes.remove(min_idx);
        let n = nodes.len();
        compute_angle(polygon, &mut nodes, (min_idx + n - 1) % n);
        compute_angle(polygon, &mut nodes, min_idx % n);
    }

    triangulation.indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular_ellipse_polygon(n: usize) -> Vec<Vector2<f32>> {
        (0..n)
            .map(|i| {
                let theta = i as f32 / n as f32 * TWO_PI;
                Vector2::new(2.0 * theta.cos(), theta.sin())
            })
            .collect()
    }

    fn triangle_signed_area(polygon: &[Vector2<f32>], tri: &[u32]) -> f32 {
        let a = polygon[tri[0] as usize];
        let b = polygon[tri[1] as usize];
        let c = polygon[tri[2] as usize];
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
    }

    #[test]
    fn test_square_splits_along_first_diagonal() {
        // 平面单位正方形的对角和恰好为 π，必须沿 (0,2) 分割
        let p = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let tris = split_quad(&p[0], &p[1], &p[2], &p[3]);
        assert_eq!(tris, [[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_quad_with_large_opposite_angles_uses_other_diagonal() {
        // 顶点 3 接近边 (0,2)，对角和超过 π
        let p = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(1.0, 0.2, 0.0),
        ];
        let tris = split_quad(&p[0], &p[1], &p[2], &p[3]);
        assert_eq!(tris, [[0, 1, 3], [1, 2, 3]]);
    }

    #[test]
    fn test_triangle_count_invariant() {
        for n in 3..=12 {
            let polygon = regular_ellipse_polygon(n);
            let indices = triangulate_polygon(&polygon);
            assert_eq!(indices.len(), 3 * (n - 2), "n = {}", n);
            assert!(indices.iter().all(|&i| (i as usize) < n));
        }
    }

    #[test]
    fn test_convex_polygon_triangles_keep_winding() {
        let polygon = regular_ellipse_polygon(8);
        let indices = triangulate_polygon(&polygon);

        let mut total_area = 0.0;
        for tri in indices.chunks_exact(3) {
            let area = triangle_signed_area(&polygon, tri);
            assert!(area > 0.0, "三角形方向翻转: {:?}", tri);
            total_area += area;
        }

        // 三角形面积之和应等于多边形面积
        let mut polygon_area = 0.0;
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            polygon_area += 0.5 * (a.x * b.y - b.x * a.y);
        }
        assert!((total_area - polygon_area).abs() < 1e-4);
    }

    #[test]
    fn test_each_triangle_has_distinct_corners() {
        let polygon = regular_ellipse_polygon(10);
        let indices = triangulate_polygon(&polygon);

        for tri in indices.chunks_exact(3) {
            assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    #[test]
    fn test_degenerate_inputs_yield_no_triangles() {
        assert!(triangulate_polygon(&[]).is_empty());
        assert!(triangulate_polygon(&[Vector2::new(0.0, 0.0)]).is_empty());
        assert!(
            triangulate_polygon(&[Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)]).is_empty()
        );
    }
}
