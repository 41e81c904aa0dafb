//! 几何数学模块
//!
//! 提供网格加载相关的几何算法：
//!
//! - `plane`：通过主成分分析（PCA）计算最佳拟合平面，并将 3D 多边形投影为 2D
//! - `triangulate`：四边形对角线选择与一般多边形的耳切三角化（带 Lawson 翻边细化）
//!
//! 这些算法服务于面三角化阶段：3/4 顶点的面直接在 3D 中处理，
//! 5 个顶点以上的面先投影到拟合平面再做 2D 三角化。

pub mod plane;
pub mod triangulate;
