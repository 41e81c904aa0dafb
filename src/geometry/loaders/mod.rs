//! 模型加载器模块
//!
//! 提供统一的模型加载接口和具体格式的实现。
//!
//! # 支持的格式
//!
//! - **OBJ**: Wavefront OBJ 格式（自带的分词解析器与三角化器）
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use polysoup::geometry::loaders::{MeshLoader, ObjLoader};
//! use std::path::Path;
//!
//! let mesh = ObjLoader::load_from_file(Path::new("model.obj"))?;
//! # Ok::<(), polysoup::core::error::PolysoupError>(())
//! ```

use crate::core::error::Result;
use crate::geometry::mesh::MeshData;
use std::path::Path;

pub mod obj_loader;
pub mod tokenizer;

// 重新导出加载器
pub use obj_loader::ObjLoader;
pub use tokenizer::Tokenizer;

/// 网格加载器 trait
///
/// 定义统一的加载接口，所有格式的加载器都实现此 trait。
/// 这种设计允许轻松添加新的文件格式支持。
///
/// # 实现要求
///
/// - 加载器应该是无状态的（使用静态方法）
/// - 返回 CPU 侧的 `MeshData`，不涉及 GPU 资源
/// - 正确处理错误情况并返回有意义的错误信息
pub trait MeshLoader {
    /// 从文件路径加载网格
    ///
    /// # 返回
    ///
    /// - `Ok(MeshData)`: 加载成功，返回网格数据
    /// - `Err(PolysoupError)`: 加载失败（文件不存在、验证失败等）
    fn load_from_file(path: &Path) -> Result<MeshData>;

    /// 从内存数据加载网格
    ///
    /// # 参数
    ///
    /// - `data`: 文件内容的字节数组
    fn load_from_memory(data: &[u8]) -> Result<MeshData>;

    /// 获取支持的文件扩展名列表
    ///
    /// # 返回
    ///
    /// 支持的扩展名数组（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
///
/// # 参数
///
/// - `path`: 文件路径
///
/// # 返回
///
/// - `Ok(MeshData)`: 成功加载
/// - `Err(PolysoupError)`: 不支持的格式或加载失败
pub fn load_mesh(path: &Path) -> Result<MeshData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            crate::core::error::PolysoupError::MeshLoading(
                crate::core::error::MeshLoadError::UnsupportedFormat(
                    "无法确定文件扩展名".to_string(),
                ),
            )
        })?;

    match extension.as_str() {
        "obj" => ObjLoader::load_from_file(path),
        _ => Err(crate::core::error::PolysoupError::MeshLoading(
            crate::core::error::MeshLoadError::UnsupportedFormat(format!(
                "不支持的文件格式: .{}",
                extension
            )),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        let obj_exts = ObjLoader::supported_extensions();
        assert!(obj_exts.contains(&"obj"));
    }

    #[test]
    fn test_load_mesh_unknown_extension() {
        let result = load_mesh(Path::new("model.fbx"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_mesh_no_extension() {
        let result = load_mesh(Path::new("model"));
        assert!(result.is_err());
    }
}
