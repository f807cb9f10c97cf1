// ==========================================
// 施工现场工时进度引擎 - 领域类型定义
// ==========================================
// 职责: 产品状态、告警类型/优先级、紧迫度枚举
// 序列化格式: snake_case (与前端/数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产品状态 (Product Status)
// ==========================================
// 由完工数量自动派生; 引擎只读取该字段做筛选
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    NotStarted, // 未开工
    InProgress, // 进行中
    Completed,  // 已完成
    OnHold,     // 暂停 (人工)
    Blocked,    // 阻塞 (人工)
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ProductStatus {
    /// 从字符串解析状态 (未知值返回 None)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "not_started" => Some(ProductStatus::NotStarted),
            "in_progress" => Some(ProductStatus::InProgress),
            "completed" => Some(ProductStatus::Completed),
            "on_hold" => Some(ProductStatus::OnHold),
            "blocked" => Some(ProductStatus::Blocked),
            _ => None,
        }
    }

    /// 序列化字符串 (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::NotStarted => "not_started",
            ProductStatus::InProgress => "in_progress",
            ProductStatus::Completed => "completed",
            ProductStatus::OnHold => "on_hold",
            ProductStatus::Blocked => "blocked",
        }
    }

    /// 是否为人工设置的粘性状态 (不随数量自动变化)
    pub fn is_manual(&self) -> bool {
        matches!(self, ProductStatus::OnHold | ProductStatus::Blocked)
    }
}

// ==========================================
// 告警类型 (Alert Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Info,
    Warning,
    Error,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Info => write!(f, "info"),
            AlertType::Warning => write!(f, "warning"),
            AlertType::Error => write!(f, "error"),
        }
    }
}

// ==========================================
// 告警优先级 (Alert Priority)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPriority::Low => write!(f, "low"),
            AlertPriority::Medium => write!(f, "medium"),
            AlertPriority::High => write!(f, "high"),
            AlertPriority::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 人员紧迫度 (Urgency)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}
