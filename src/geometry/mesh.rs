//! 网格数据结构模块
//!
//! 定义 CPU 侧的网格数据容器，用于存储从文件加载的几何数据。

use super::vertex::Vertex;

/// CPU 侧网格数据
///
/// 存储从文件加载的网格数据，包含顶点数组和三角形索引数组。
/// 这是一个简单的数据持有者，不包含 GPU 资源。
///
/// # 不变量
///
/// - 索引数量是 3 的倍数（每个三角形 3 个顶点）
/// - 每个索引都小于顶点数量
/// - 每个唯一的 (位置, 纹理坐标, 法线) 索引三元组只产生一个输出顶点，
///   顶点顺序为首次出现的顺序
///
/// # 示例
///
/// ```rust
/// use polysoup::geometry::mesh::MeshData;
/// use polysoup::geometry::vertex::Vertex;
///
/// let mesh = MeshData {
///     vertices: vec![
///         Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
///         Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
///         Vertex::new([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
///     ],
///     indices: vec![0, 1, 2],
///     name: Some("Triangle".to_string()),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct MeshData {
    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 索引数组
    ///
    /// 三角形顶点索引，每 3 个索引定义一个三角形。
    /// 使用 32 位索引以支持超过 65535 个顶点的模型。
    pub indices: Vec<u32>,

    /// 网格名称（可选）
    ///
    /// 从文件名中读取，用于调试和识别。
    pub name: Option<String>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: None,
        }
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是 3 的倍数
    /// - 所有索引都在有效范围内
    ///
    /// # 返回
    ///
    /// - `Ok(())`: 数据有效
    /// - `Err(String)`: 数据无效，返回错误描述
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len() as u32;
        for (i, &index) in self.indices.iter().enumerate() {
            if index >= vertex_count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (0-{})",
                    i,
                    index,
                    vertex_count.saturating_sub(1)
                ));
            }
        }

        Ok(())
    }

    /// 清空所有数据
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.name = None;
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_data_creation() {
        let mesh = MeshData::new();

        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.name.is_none());
    }

    #[test]
    fn test_mesh_data_with_name() {
        let mesh = MeshData::with_name("TestMesh");

        assert_eq!(mesh.name, Some("TestMesh".to_string()));
    }

    #[test]
    fn test_mesh_data_counts() {
        let mut mesh = MeshData::new();
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.indices.extend_from_slice(&[0, 1, 2]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_mesh_data_validation_valid() {
        let mut mesh = MeshData::new();
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.indices.extend_from_slice(&[0, 1, 2]);

        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_count() {
        let mut mesh = MeshData::new();
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.indices.extend_from_slice(&[0, 1]); // 不是3的倍数

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_range() {
        let mut mesh = MeshData::new();
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.indices.extend_from_slice(&[0, 1, 5]); // 索引5超出范围

        let result = mesh.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("超出顶点范围"));
    }

    #[test]
    fn test_mesh_data_clear() {
        let mut mesh = MeshData::with_name("Test");
        mesh.vertices.push(Vertex::default());
        mesh.indices.push(0);

        mesh.clear();

        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert!(mesh.name.is_none());
    }
}
