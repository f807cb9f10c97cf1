// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use site_ops_labour::domain::progress::{DailyProgressSummary, ProductProgress};
use site_ops_labour::domain::types::ProductStatus;
use site_ops_labour::engine::StatusDerivation;

/// 测试基准时间: 2026-03-02 (周一) 08:00 UTC
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// ProductProgress 构建器
// ==========================================

pub struct ProductBuilder {
    id: String,
    job_id: String,
    product_type: String,
    product_name: Option<String>,
    total_quantity: f64,
    completed_units: f64,
    in_progress_units: f64,
    estimated_hours_per_unit: f64,
    actual_hours_spent: f64,
    status: Option<ProductStatus>,
    last_updated: DateTime<Utc>,
}

impl ProductBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            job_id: "JOB-001".to_string(),
            product_type: "balustrade".to_string(),
            product_name: None,
            total_quantity: 10.0,
            completed_units: 0.0,
            in_progress_units: 0.0,
            estimated_hours_per_unit: 1.0,
            actual_hours_spent: 0.0,
            status: None,
            last_updated: base_time(),
        }
    }

    pub fn job(mut self, job_id: &str) -> Self {
        self.job_id = job_id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.product_name = Some(name.to_string());
        self
    }

    pub fn quantity(mut self, total: f64, completed: f64) -> Self {
        self.total_quantity = total;
        self.completed_units = completed;
        self
    }

    pub fn in_progress(mut self, units: f64) -> Self {
        self.in_progress_units = units;
        self
    }

    pub fn hours_per_unit(mut self, hours: f64) -> Self {
        self.estimated_hours_per_unit = hours;
        self
    }

    pub fn actual_hours(mut self, hours: f64) -> Self {
        self.actual_hours_spent = hours;
        self
    }

    /// 显式状态; 未设置时按数量派生
    pub fn status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    pub fn build(self) -> ProductProgress {
        let mut product = ProductProgress {
            product_name: self
                .product_name
                .unwrap_or_else(|| format!("Product {}", self.id)),
            id: self.id,
            job_id: self.job_id,
            product_type: self.product_type,
            total_quantity: self.total_quantity,
            completed_units: self.completed_units,
            in_progress_units: self.in_progress_units,
            estimated_hours_per_unit: self.estimated_hours_per_unit,
            actual_hours_spent: self.actual_hours_spent,
            status: self.status.unwrap_or(ProductStatus::NotStarted),
            last_updated: self.last_updated,
        };
        if self.status.is_none() {
            product.status = StatusDerivation::derive_status(&product);
        }
        product
    }
}

// ==========================================
// DailyProgressSummary 构建器
// ==========================================

/// 从 start 起连续 n 天, 每天相同工时/完工数
pub fn daily_series(start: NaiveDate, hours: &[f64], units_per_day: f64) -> Vec<DailyProgressSummary> {
    hours
        .iter()
        .enumerate()
        .map(|(i, h)| {
            DailyProgressSummary::new(
                start + chrono::Duration::days(i as i64),
                units_per_day,
                *h,
                4,
            )
        })
        .collect()
}
