//! PolySoup - OBJ 网格加载工具
//!
//! 把 Wavefront OBJ 文件加载为渲染器可直接使用的三角形网格，
//! 并输出网格统计信息。可以通过配置文件或命令行参数调整日志行为。
//!
//! # 使用方法
//!
//! ```bash
//! # 加载一个模型并输出统计信息
//! cargo run -- model.obj
//!
//! # 输出调试日志
//! cargo run -- --verbose model.obj
//! ```
//!
//! # 命令行参数
//!
//! - `--verbose`: 将日志级别降到 debug
//! - `--quiet`: 只输出错误
//! - `--log-to-file`: 同时输出日志到文件

use polysoup::core::{log, Config};
use polysoup::geometry::loaders::load_mesh;
use std::path::Path;
use tracing::{error, info};

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（polysoup.toml，不存在时使用默认配置）
/// 2. 应用命令行参数覆盖
/// 3. 初始化日志系统
/// 4. 加载网格并输出统计信息
fn main() {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("polysoup.toml");

    // 2. 应用命令行参数
    config.apply_args(std::env::args().skip(1));

    // 3. 验证配置
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 4. 初始化日志系统（使用配置中的设置）
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);

    info!(version = env!("CARGO_PKG_VERSION"), "PolySoup starting...");

    // 第一个非选项参数是网格文件路径
    let path = match std::env::args().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(path) => path,
        None => {
            eprintln!("Usage: polysoup [--verbose|--quiet|--log-to-file] <mesh.obj>");
            std::process::exit(1);
        }
    };

    match load_mesh(Path::new(&path)) {
        Ok(mesh) => {
            info!(
                path = %path,
                name = mesh.name.as_deref().unwrap_or("Unnamed"),
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                indices = mesh.index_count(),
                "网格加载完成"
            );
        }
        Err(e) => {
            error!("Failed to load mesh: {}", e);
            std::process::exit(1);
        }
    }
}
