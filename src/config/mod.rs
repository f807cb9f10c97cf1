// ==========================================
// 施工现场工时进度引擎 - 配置层
// ==========================================
// 职责: 工时规则参数管理, 支持配置文件 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod error;
pub mod labour_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_config_path, ConfigManager};
pub use error::ConfigError;
pub use labour_config::LabourConfig;
