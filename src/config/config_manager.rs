// ==========================================
// 施工现场工时进度引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源优先级: 环境变量 > 配置文件 > 内置默认值
// 存储: 内存 key-value (配置文件为扁平 JSON 对象)
// ==========================================

use crate::config::error::ConfigError;
use crate::config::labour_config::LabourConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 环境变量前缀, 例如 SITE_OPS_LABOUR_HOURLY_RATE=52.5
pub const ENV_PREFIX: &str = "SITE_OPS_LABOUR_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建空的 ConfigManager (全部使用默认值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径 (顶层必须为对象)
    ///
    /// # 说明
    /// 未识别的键会记录 warn 日志并忽略
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        tracing::info!("已加载配置文件: {} ({} 项)", path.display(), manager.values.len());
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: Value = serde_json::from_str(raw)?;
        let object = match parsed {
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::ValueFormat {
                    key: "<root>".to_string(),
                    value: other.to_string(),
                    message: "配置文件顶层必须为 JSON 对象".to_string(),
                })
            }
        };

        let mut manager = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            manager.set(&key, text);
        }
        Ok(manager)
    }

    /// 按默认位置加载: 用户配置目录下存在配置文件则读取, 然后叠加环境变量
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut manager = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::new(),
        };
        manager.apply_env_overrides();
        Ok(manager)
    }

    /// 叠加环境变量覆写
    pub fn apply_env_overrides(&mut self) {
        let overrides = std::env::vars().filter(|(k, _)| k.starts_with(ENV_PREFIX));
        self.apply_overrides(overrides);
    }

    /// 叠加覆写 (键为环境变量名, 如 SITE_OPS_LABOUR_HOURLY_RATE)
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (env_key, value) in overrides {
            let Some(suffix) = env_key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_lowercase();
            tracing::debug!("环境变量覆写: {}={}", key, value);
            self.set(&key, value);
        }
    }

    /// 设置单个配置值
    pub fn set(&mut self, key: &str, value: String) {
        if !config_keys::ALL.contains(&key) {
            tracing::warn!("忽略未知配置项: {}", key);
            return;
        }
        self.values.insert(key.to_string(), value.trim().to_string());
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(&str): 已覆写的值
    /// - None: 未覆写, 使用默认值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 组装工时规则参数并校验
    pub fn labour_config(&self) -> Result<LabourConfig, ConfigError> {
        use config_keys::*;

        let defaults = LabourConfig::default();
        let config = LabourConfig {
            standard_day_hours: self.parse_or(STANDARD_DAY_HOURS, defaults.standard_day_hours)?,
            baseline_crew_size: self.parse_or(BASELINE_CREW_SIZE, defaults.baseline_crew_size)?,
            max_crew_size: self.parse_or(MAX_CREW_SIZE, defaults.max_crew_size)?,
            standard_tier_limit: self.parse_or(STANDARD_TIER_LIMIT, defaults.standard_tier_limit)?,
            medium_tier_limit: self.parse_or(MEDIUM_TIER_LIMIT, defaults.medium_tier_limit)?,
            medium_cost_per_worker: self
                .parse_or(MEDIUM_COST_PER_WORKER, defaults.medium_cost_per_worker)?,
            high_cost_per_worker: self.parse_or(HIGH_COST_PER_WORKER, defaults.high_cost_per_worker)?,
            default_efficiency: self.parse_or(DEFAULT_EFFICIENCY, defaults.default_efficiency)?,
            efficiency_ceiling: self.parse_or(EFFICIENCY_CEILING, defaults.efficiency_ceiling)?,
            low_efficiency_threshold: self
                .parse_or(LOW_EFFICIENCY_THRESHOLD, defaults.low_efficiency_threshold)?,
            high_efficiency_threshold: self
                .parse_or(HIGH_EFFICIENCY_THRESHOLD, defaults.high_efficiency_threshold)?,
            burn_rate_window_days: self
                .parse_or(BURN_RATE_WINDOW_DAYS, defaults.burn_rate_window_days)?,
            low_burn_rate_threshold: self
                .parse_or(LOW_BURN_RATE_THRESHOLD, defaults.low_burn_rate_threshold)?,
            work_days_per_week: self.parse_or(WORK_DAYS_PER_WEEK, defaults.work_days_per_week)?,
            deadline_alert_days: self.parse_or(DEADLINE_ALERT_DAYS, defaults.deadline_alert_days)?,
            deadline_alert_hours: self.parse_or(DEADLINE_ALERT_HOURS, defaults.deadline_alert_hours)?,
            hourly_rate: self.parse_or(HOURLY_RATE, defaults.hourly_rate)?,
            bottleneck_completion_ratio: self
                .parse_or(BOTTLENECK_COMPLETION_RATIO, defaults.bottleneck_completion_ratio)?,
            bottleneck_efficiency_ratio: self
                .parse_or(BOTTLENECK_EFFICIENCY_RATIO, defaults.bottleneck_efficiency_ratio)?,
            min_actual_hours: self.parse_or(MIN_ACTUAL_HOURS, defaults.min_actual_hours)?,
            planning_horizon_days: self
                .parse_or(PLANNING_HORIZON_DAYS, defaults.planning_horizon_days)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::ValueFormat {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// 默认配置文件路径: <用户配置目录>/site-ops-labour/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("site-ops-labour").join("config.json"))
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 班组
    pub const STANDARD_DAY_HOURS: &str = "standard_day_hours";
    pub const BASELINE_CREW_SIZE: &str = "baseline_crew_size";
    pub const MAX_CREW_SIZE: &str = "max_crew_size";
    pub const STANDARD_TIER_LIMIT: &str = "standard_tier_limit";
    pub const MEDIUM_TIER_LIMIT: &str = "medium_tier_limit";
    pub const MEDIUM_COST_PER_WORKER: &str = "medium_cost_per_worker";
    pub const HIGH_COST_PER_WORKER: &str = "high_cost_per_worker";

    // 效率
    pub const DEFAULT_EFFICIENCY: &str = "default_efficiency";
    pub const EFFICIENCY_CEILING: &str = "efficiency_ceiling";
    pub const LOW_EFFICIENCY_THRESHOLD: &str = "low_efficiency_threshold";
    pub const HIGH_EFFICIENCY_THRESHOLD: &str = "high_efficiency_threshold";

    // 燃烧率 / 工期
    pub const BURN_RATE_WINDOW_DAYS: &str = "burn_rate_window_days";
    pub const LOW_BURN_RATE_THRESHOLD: &str = "low_burn_rate_threshold";
    pub const WORK_DAYS_PER_WEEK: &str = "work_days_per_week";
    pub const DEADLINE_ALERT_DAYS: &str = "deadline_alert_days";
    pub const DEADLINE_ALERT_HOURS: &str = "deadline_alert_hours";

    // 成本
    pub const HOURLY_RATE: &str = "hourly_rate";

    // 瓶颈 / 次日计划
    pub const BOTTLENECK_COMPLETION_RATIO: &str = "bottleneck_completion_ratio";
    pub const BOTTLENECK_EFFICIENCY_RATIO: &str = "bottleneck_efficiency_ratio";
    pub const MIN_ACTUAL_HOURS: &str = "min_actual_hours";
    pub const PLANNING_HORIZON_DAYS: &str = "planning_horizon_days";

    pub const ALL: &[&str] = &[
        STANDARD_DAY_HOURS,
        BASELINE_CREW_SIZE,
        MAX_CREW_SIZE,
        STANDARD_TIER_LIMIT,
        MEDIUM_TIER_LIMIT,
        MEDIUM_COST_PER_WORKER,
        HIGH_COST_PER_WORKER,
        DEFAULT_EFFICIENCY,
        EFFICIENCY_CEILING,
        LOW_EFFICIENCY_THRESHOLD,
        HIGH_EFFICIENCY_THRESHOLD,
        BURN_RATE_WINDOW_DAYS,
        LOW_BURN_RATE_THRESHOLD,
        WORK_DAYS_PER_WEEK,
        DEADLINE_ALERT_DAYS,
        DEADLINE_ALERT_HOURS,
        HOURLY_RATE,
        BOTTLENECK_COMPLETION_RATIO,
        BOTTLENECK_EFFICIENCY_RATIO,
        MIN_ACTUAL_HOURS,
        PLANNING_HORIZON_DAYS,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_manager_yields_defaults() {
        let config = ConfigManager::new().labour_config().unwrap();
        assert_eq!(config, LabourConfig::default());
    }

    #[test]
    fn test_from_file_overrides_selected_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"hourly_rate": 52.5, "max_crew_size": "10", "bogus": 1}}"#).unwrap();

        let manager = ConfigManager::from_file(file.path()).unwrap();
        assert_eq!(manager.get_config_value("bogus"), None);

        let config = manager.labour_config().unwrap();
        assert_eq!(config.hourly_rate, 52.5);
        assert_eq!(config.max_crew_size, 10);
        assert_eq!(config.baseline_crew_size, 4);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = ConfigManager::from_file(Path::new("/nonexistent/site-ops.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut manager = ConfigManager::from_json_str(r#"{"hourly_rate": 50}"#).unwrap();
        manager.apply_overrides(vec![
            ("SITE_OPS_LABOUR_HOURLY_RATE".to_string(), "61".to_string()),
            ("UNRELATED_VAR".to_string(), "x".to_string()),
        ]);
        assert_eq!(manager.labour_config().unwrap().hourly_rate, 61.0);
    }

    #[test]
    fn test_unparseable_value_is_format_error() {
        let manager = ConfigManager::from_json_str(r#"{"work_days_per_week": "five"}"#).unwrap();
        let err = manager.labour_config().unwrap_err();
        assert!(matches!(err, ConfigError::ValueFormat { .. }));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(ConfigManager::from_json_str("[1, 2]").is_err());
    }
}
