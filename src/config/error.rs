// ==========================================
// 施工现场工时进度引擎 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueFormat {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置值不合法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}
