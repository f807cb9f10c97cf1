// ==========================================
// 施工现场工时进度引擎 - 请求校验器
// ==========================================
// 职责: 在进入引擎前检查报告请求
// 严格模式: 任一违规即拒绝
// 宽松模式: 记录告警并修正可修正字段, 其余交由引擎的容错规则处理
// ==========================================

use crate::api::dto::LabourReportRequest;
use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// 严格模式：任何违规都返回错误
    #[default]
    Strict,
    /// 宽松模式：违规作为告警返回, 请求继续计算
    Lenient,
}

fn violation(violation_type: &str, record_id: &str, reason: String) -> ValidationViolation {
    ValidationViolation {
        violation_type: violation_type.to_string(),
        record_id: record_id.to_string(),
        reason,
        details: None,
    }
}

// ==========================================
// RequestValidator - 请求校验器
// ==========================================
pub struct RequestValidator;

impl RequestValidator {
    /// 校验报告请求
    ///
    /// # 返回
    /// - Ok(violations): 严格模式下恒为空; 宽松模式下为已记录的告警
    /// - Err(RequestValidationError): 严格模式下存在违规
    ///
    /// # 宽松模式修正
    /// - hourly_rate 非正 → 置空 (使用配置时薪)
    /// - team_size 为 0 → 置空 (使用班组基线)
    /// - 原始估算工时非有限或为负 → 保留, 由成本计算按 0 截断
    pub fn validate(
        request: &mut LabourReportRequest,
        mode: ValidationMode,
    ) -> ApiResult<Vec<ValidationViolation>> {
        if request.job_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("jobId 不能为空".to_string()));
        }

        let violations = Self::collect_violations(request);
        if violations.is_empty() {
            return Ok(violations);
        }

        match mode {
            ValidationMode::Strict => Err(ApiError::RequestValidationError {
                reason: format!("{} 项输入违规", violations.len()),
                violations,
            }),
            ValidationMode::Lenient => {
                if request.hourly_rate.is_some_and(|rate| !(rate > 0.0 && rate.is_finite())) {
                    request.hourly_rate = None;
                }
                if request.team_size == Some(0) {
                    request.team_size = None;
                }
                for v in &violations {
                    tracing::warn!(
                        violation_type = %v.violation_type,
                        record_id = %v.record_id,
                        "{}",
                        v.reason
                    );
                }
                Ok(violations)
            }
        }
    }

    fn collect_violations(request: &LabourReportRequest) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for p in &request.products {
            if p.id.trim().is_empty() {
                violations.push(violation("EMPTY_ID", "", format!("产品 {} 缺少ID", p.product_name)));
            } else if !seen.insert(p.id.as_str()) {
                violations.push(violation("DUPLICATE_ID", &p.id, "产品ID重复".to_string()));
            }

            if p.job_id != request.job_id {
                violations.push(violation(
                    "JOB_MISMATCH",
                    &p.id,
                    format!("产品属于项目 {}, 请求项目为 {}", p.job_id, request.job_id),
                ));
            }
            let numbers = [
                p.total_quantity,
                p.completed_units,
                p.in_progress_units,
                p.estimated_hours_per_unit,
                p.actual_hours_spent,
            ];
            if numbers.iter().any(|v| !v.is_finite()) {
                violations.push(violation("NON_FINITE", &p.id, "数值必须为有限数".to_string()));
            }
            if p.total_quantity < 0.0 || p.completed_units < 0.0 || p.in_progress_units < 0.0 {
                violations.push(violation("NEGATIVE_QUANTITY", &p.id, "数量不能为负".to_string()));
            }
            if p.completed_units > p.total_quantity {
                violations.push(violation(
                    "OVER_COMPLETION",
                    &p.id,
                    format!("已完成 {} 超过总量 {}", p.completed_units, p.total_quantity),
                ));
            }
            if p.estimated_hours_per_unit <= 0.0 {
                violations.push(violation(
                    "NON_POSITIVE_RATE",
                    &p.id,
                    "单件工时必须为正数".to_string(),
                ));
            }
            if p.actual_hours_spent < 0.0 {
                violations.push(violation("NEGATIVE_HOURS", &p.id, "实际工时不能为负".to_string()));
            }
        }

        for day in &request.daily_progress {
            if !day.hours_worked.is_finite() || !day.units_completed.is_finite() {
                violations.push(violation(
                    "NON_FINITE",
                    &day.date.to_string(),
                    "当日数值必须为有限数".to_string(),
                ));
            }
            if day.hours_worked < 0.0 {
                violations.push(violation(
                    "NEGATIVE_HOURS",
                    &day.date.to_string(),
                    "当日工时不能为负".to_string(),
                ));
            }
        }

        if let Some(estimate) = &request.original_estimate {
            if !estimate.total_hours.is_finite() || estimate.total_hours < 0.0 {
                violations.push(violation(
                    "INVALID_ESTIMATE",
                    "originalEstimate",
                    format!("原始估算工时必须为非负有限数, 实际 {}", estimate.total_hours),
                ));
            }
        }
        if let Some(rate) = request.hourly_rate {
            if !(rate > 0.0 && rate.is_finite()) {
                violations.push(violation(
                    "NON_POSITIVE_RATE",
                    "hourlyRate",
                    format!("时薪必须为正数, 实际 {}", rate),
                ));
            }
        }
        if request.team_size == Some(0) {
            violations.push(violation("EMPTY_TEAM", "teamSize", "班组人数不能为 0".to_string()));
        }

        violations
    }
}
