//! 错误处理模块
//!
//! 定义了加载器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//!
//! # 错误分类
//!
//! 只有致命的 I/O 失败（文件不存在、无法读取）会传播给调用者；
//! 逐行/逐字段的格式问题在解析器内部被吸收（跳过或使用默认值）。

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, PolysoupError>;

/// PolySoup 的错误类型
///
/// 包含了加载过程中可能遇到的各种错误情况。
#[derive(Debug)]
pub enum PolysoupError {
    /// 配置错误
    Config(ConfigError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在或无法确定大小
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 几何数据无效
    InvalidGeometry(String),
}

impl fmt::Display for PolysoupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolysoupError::Config(e) => write!(f, "Configuration error: {}", e),
            PolysoupError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            PolysoupError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => {
                write!(f, "Mesh file not found: {}", path.display())
            }
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
            MeshLoadError::InvalidGeometry(msg) => write!(f, "Invalid geometry data: {}", msg),
        }
    }
}

impl std::error::Error for PolysoupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolysoupError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for PolysoupError {
    fn from(err: std::io::Error) -> Self {
        PolysoupError::Io(err)
    }
}

impl From<ConfigError> for PolysoupError {
    fn from(err: ConfigError) -> Self {
        PolysoupError::Config(err)
    }
}

impl From<MeshLoadError> for PolysoupError {
    fn from(err: MeshLoadError) -> Self {
        PolysoupError::MeshLoading(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = MeshLoadError::FileNotFound(PathBuf::from("missing.obj"));
        assert!(err.to_string().contains("missing.obj"));
    }

    #[test]
    fn test_error_conversion() {
        let err: PolysoupError = MeshLoadError::ParseError("bad line".to_string()).into();
        assert!(matches!(err, PolysoupError::MeshLoading(_)));
    }
}
