//! PolySoup - 多边形汤网格加载器
//!
//! PolySoup 将基于文本的多边形网格描述（Wavefront OBJ）加载为渲染器可直接
//! 使用的三角形网格：一个扁平的顶点数组加一个 u32 三角形索引数组，
//! 其中不含重复顶点。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `math`: 几何数学模块（最佳拟合平面投影、多边形三角化）
//! - `geometry`: 几何体加载模块（顶点、网格、OBJ 加载器）
//!
//! # 使用示例
//!
//! ```no_run
//! use polysoup::geometry::loaders::load_mesh;
//! use std::path::Path;
//!
//! let mesh = load_mesh(Path::new("model.obj"))?;
//! println!("顶点数: {}", mesh.vertex_count());
//! println!("三角形数: {}", mesh.triangle_count());
//! # Ok::<(), polysoup::core::error::PolysoupError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod math;
