// ==========================================
// 施工现场工时进度引擎 - 数值保护工具
// ==========================================
// 职责: 统一的安全除法与有限值截断, 所有除零保护走这里
// 红线: 引擎对任何数值输入都返回有限结果, 不 panic
// ==========================================

/// 安全除法
///
/// 分母为 0 或结果非有限时返回 `fallback`
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return fallback;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        fallback
    }
}

/// 截断到 [min, max]; NaN 视为 min, ±inf 落到对应边界
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// 向上取整为非负整数天数/人数, 非有限值视为 `cap`
pub fn ceil_to_u32(value: f64, cap: u32) -> u32 {
    if !value.is_finite() || value >= f64::from(cap) {
        return cap;
    }
    if value <= 0.0 {
        return 0;
    }
    value.ceil() as u32
}

/// 数值取 `fallback` 当其非正或非有限
pub fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
