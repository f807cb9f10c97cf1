// ==========================================
// 施工现场工时进度引擎 - 产品状态派生
// ==========================================
// 职责: 根据完工数量派生产品状态; 记录完工/工时增量
// 红线: on_hold / blocked 为人工状态, 不被数量覆盖; 不修改入参
// ==========================================

use crate::domain::progress::ProductProgress;
use crate::domain::types::ProductStatus;
use chrono::{DateTime, Utc};

/// 单次进度上报
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitUpdate {
    pub completed_delta: f64,
    pub in_progress_delta: f64,
    pub hours_delta: f64,
}

pub struct StatusDerivation;

impl StatusDerivation {
    /// 派生状态
    ///
    /// # 规则
    /// - 当前为 on_hold / blocked → 保持
    /// - completed >= total 且 total > 0 → completed
    /// - completed > 0 或 in_progress > 0 → in_progress
    /// - 否则 → not_started
    pub fn derive_status(product: &ProductProgress) -> ProductStatus {
        if product.status.is_manual() {
            return product.status;
        }
        if product.total_quantity > 0.0 && product.completed_units >= product.total_quantity {
            ProductStatus::Completed
        } else if product.completed_units > 0.0 || product.in_progress_units > 0.0 {
            ProductStatus::InProgress
        } else {
            ProductStatus::NotStarted
        }
    }

    /// 记录一次进度上报, 返回更新后的新记录
    ///
    /// 数量与工时截断为非负; 进行中数量不超过剩余数量
    pub fn apply_unit_update(
        product: &ProductProgress,
        update: UnitUpdate,
        at: DateTime<Utc>,
    ) -> ProductProgress {
        let mut next = product.clone();

        next.completed_units = (product.completed_units + update.completed_delta).max(0.0);
        next.actual_hours_spent = (product.actual_hours_spent + update.hours_delta).max(0.0);
        next.in_progress_units = (product.in_progress_units + update.in_progress_delta)
            .max(0.0)
            .min(next.remaining_units());
        next.status = Self::derive_status(&next);
        next.last_updated = at;

        if next.status != product.status {
            tracing::info!(
                "产品 {} 状态变更: {} → {}",
                product.id,
                product.status,
                next.status
            );
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(status: ProductStatus, total: f64, completed: f64, in_progress: f64) -> ProductProgress {
        ProductProgress {
            id: "P-1".to_string(),
            job_id: "J-1".to_string(),
            product_type: "stair".to_string(),
            product_name: "Stair".to_string(),
            total_quantity: total,
            completed_units: completed,
            in_progress_units: in_progress,
            estimated_hours_per_unit: 3.0,
            actual_hours_spent: 0.0,
            status,
            last_updated: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_derive_status_from_quantities() {
        assert_eq!(
            StatusDerivation::derive_status(&product(ProductStatus::InProgress, 10.0, 0.0, 0.0)),
            ProductStatus::NotStarted
        );
        assert_eq!(
            StatusDerivation::derive_status(&product(ProductStatus::NotStarted, 10.0, 0.0, 2.0)),
            ProductStatus::InProgress
        );
        assert_eq!(
            StatusDerivation::derive_status(&product(ProductStatus::InProgress, 10.0, 10.0, 0.0)),
            ProductStatus::Completed
        );
        // 数量为 0 的产品不会自动完成
        assert_eq!(
            StatusDerivation::derive_status(&product(ProductStatus::NotStarted, 0.0, 0.0, 0.0)),
            ProductStatus::NotStarted
        );
    }

    #[test]
    fn test_manual_states_are_sticky() {
        let blocked = product(ProductStatus::Blocked, 10.0, 10.0, 0.0);
        assert_eq!(StatusDerivation::derive_status(&blocked), ProductStatus::Blocked);
        let held = product(ProductStatus::OnHold, 10.0, 3.0, 0.0);
        assert_eq!(StatusDerivation::derive_status(&held), ProductStatus::OnHold);
    }

    #[test]
    fn test_apply_unit_update_completes_product() {
        let before = product(ProductStatus::InProgress, 10.0, 8.0, 2.0);
        let at = Utc.with_ymd_and_hms(2026, 5, 2, 16, 30, 0).unwrap();
        let after = StatusDerivation::apply_unit_update(
            &before,
            UnitUpdate {
                completed_delta: 2.0,
                in_progress_delta: -2.0,
                hours_delta: 6.5,
            },
            at,
        );

        assert_eq!(after.completed_units, 10.0);
        assert_eq!(after.in_progress_units, 0.0);
        assert_eq!(after.actual_hours_spent, 6.5);
        assert_eq!(after.status, ProductStatus::Completed);
        assert_eq!(after.last_updated, at);
        // 入参不变
        assert_eq!(before.completed_units, 8.0);
    }

    #[test]
    fn test_apply_unit_update_clamps_negative() {
        let before = product(ProductStatus::InProgress, 10.0, 1.0, 0.0);
        let after = StatusDerivation::apply_unit_update(
            &before,
            UnitUpdate {
                completed_delta: -5.0,
                in_progress_delta: 0.0,
                hours_delta: -1.0,
            },
            before.last_updated,
        );
        assert_eq!(after.completed_units, 0.0);
        assert_eq!(after.actual_hours_spent, 0.0);
        assert_eq!(after.status, ProductStatus::NotStarted);
    }
}
