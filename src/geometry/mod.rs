//! 几何体加载和处理模块
//!
//! 提供 3D 模型加载功能，包含顶点定义、网格数据结构以及各格式的加载器。
//!
//! # 架构设计
//!
//! ```text
//! 文件 (OBJ)
//!     ↓
//! Tokenizer（按空白分词，感知行边界）
//!     ↓
//! 语句解释器（按关键字分发，提取坐标与索引）
//!     ↓
//! 三角化（四边形对角线规则 / 平面投影 + 耳切）
//!     ↓
//! 顶点去重 → MeshData (CPU侧数据)
//!     ↓
//! Renderer (上传到GPU)
//! ```

pub mod loaders;
pub mod mesh;
pub mod vertex;

// 重新导出常用类型
pub use mesh::MeshData;
pub use vertex::Vertex;
