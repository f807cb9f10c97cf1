// ==========================================
// 施工现场工时进度引擎 - 告警生成
// ==========================================
// 职责: 根据工时指标生成可读告警
// 规则顺序: 人员紧迫度 → 效率 → 燃烧率 → 截止日
// 红线: 所有匹配规则都触发, 互不抑制; 输出顺序即生成顺序
// ==========================================

use crate::config::LabourConfig;
use crate::domain::metrics::{LabourAlert, TeamRecommendation};
use crate::domain::types::{AlertPriority, AlertType, Urgency};

/// 告警规则输入
#[derive(Debug, Clone, Copy)]
pub struct AlertInputs<'a> {
    pub team: &'a TeamRecommendation,
    pub efficiency: f64,
    pub burn_rate: f64,
    pub days_until_deadline: i64,
    pub remaining_hours: f64,
}

// ==========================================
// AlertGenerator - 告警生成器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AlertGenerator {
    config: LabourConfig,
}

impl AlertGenerator {
    pub fn new(config: LabourConfig) -> Self {
        Self { config }
    }

    /// 生成告警列表
    pub fn generate(&self, inputs: &AlertInputs<'_>) -> Vec<LabourAlert> {
        let cfg = &self.config;
        let mut alerts = Vec::new();

        // 1/2. 人员紧迫度
        match inputs.team.urgency {
            Urgency::High => alerts.push(LabourAlert::new(
                AlertType::Error,
                AlertPriority::Critical,
                "Critical: Project significantly behind schedule",
                Some(format!(
                    "Increase team to {} workers immediately",
                    inputs.team.recommended
                )),
            )),
            Urgency::Medium => alerts.push(LabourAlert::new(
                AlertType::Warning,
                AlertPriority::High,
                "Project behind schedule",
                Some(format!(
                    "Consider increasing team to {} workers",
                    inputs.team.recommended
                )),
            )),
            Urgency::Low => {}
        }

        // 3/4. 效率
        if inputs.efficiency < cfg.low_efficiency_threshold {
            alerts.push(LabourAlert::new(
                AlertType::Warning,
                AlertPriority::Medium,
                format!("Efficiency at {:.1}% - below target", inputs.efficiency),
                Some("Review work processes and identify blockers".to_string()),
            ));
        }
        if inputs.efficiency > cfg.high_efficiency_threshold {
            alerts.push(LabourAlert::new(
                AlertType::Info,
                AlertPriority::Low,
                format!("Excellent efficiency at {:.1}%", inputs.efficiency),
                None,
            ));
        }

        // 5. 燃烧率
        if inputs.burn_rate < cfg.low_burn_rate_threshold {
            alerts.push(LabourAlert::new(
                AlertType::Warning,
                AlertPriority::Medium,
                "Low daily progress rate",
                Some("Check team attendance and task allocation".to_string()),
            ));
        }

        // 6. 截止日
        if inputs.days_until_deadline <= cfg.deadline_alert_days
            && inputs.remaining_hours > cfg.deadline_alert_hours
        {
            alerts.push(LabourAlert::new(
                AlertType::Error,
                AlertPriority::Critical,
                "Deadline approaching with significant work remaining",
                Some("Consider overtime or additional resources".to_string()),
            ));
        }

        if !alerts.is_empty() {
            tracing::debug!("生成告警 {} 条", alerts.len());
        }
        alerts
    }
}
