// ==========================================
// 施工现场工时进度引擎 - 离线同步合并
// ==========================================
// 职责: 离线端与服务端产品进度的最后写入胜出 (LWW) 合并
// 规则: last_updated 较新者胜出; 相同时间戳保留服务端副本
// ==========================================

use crate::domain::progress::ProductProgress;
use std::collections::HashMap;

/// 合并结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncWinner {
    Local,
    Server,
}

pub struct SyncResolver;

impl SyncResolver {
    /// 单条记录 LWW 判定
    pub fn resolve_last_write_wins<'a>(
        local: &'a ProductProgress,
        server: &'a ProductProgress,
    ) -> (&'a ProductProgress, SyncWinner) {
        if local.last_updated > server.last_updated {
            (local, SyncWinner::Local)
        } else {
            (server, SyncWinner::Server)
        }
    }

    /// 按 id 合并两组记录
    ///
    /// 输出顺序: 服务端原顺序, 之后追加仅存在于本地的记录
    pub fn merge_product_sets(
        local: &[ProductProgress],
        server: &[ProductProgress],
    ) -> Vec<ProductProgress> {
        let local_by_id: HashMap<&str, &ProductProgress> =
            local.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut local_wins = 0usize;
        let mut merged: Vec<ProductProgress> = server
            .iter()
            .map(|s| match local_by_id.get(s.id.as_str()) {
                Some(l) => {
                    let (winner, source) = Self::resolve_last_write_wins(l, s);
                    if source == SyncWinner::Local {
                        local_wins += 1;
                    }
                    winner.clone()
                }
                None => s.clone(),
            })
            .collect();

        let server_ids: std::collections::HashSet<&str> =
            server.iter().map(|p| p.id.as_str()).collect();
        let local_only: Vec<ProductProgress> = local
            .iter()
            .filter(|p| !server_ids.contains(p.id.as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            server = server.len(),
            local_wins,
            local_only = local_only.len(),
            "离线同步合并完成"
        );

        merged.extend(local_only);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductStatus;
    use chrono::{DateTime, TimeZone, Utc};

    fn record(id: &str, completed: f64, at: DateTime<Utc>) -> ProductProgress {
        ProductProgress {
            id: id.to_string(),
            job_id: "J".to_string(),
            product_type: "unit".to_string(),
            product_name: id.to_string(),
            total_quantity: 10.0,
            completed_units: completed,
            in_progress_units: 0.0,
            estimated_hours_per_unit: 1.0,
            actual_hours_spent: 0.0,
            status: ProductStatus::InProgress,
            last_updated: at,
        }
    }

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_newer_record_wins() {
        let local = record("A", 5.0, t(10));
        let server = record("A", 3.0, t(9));
        let (winner, source) = SyncResolver::resolve_last_write_wins(&local, &server);
        assert_eq!(source, SyncWinner::Local);
        assert_eq!(winner.completed_units, 5.0);
    }

    #[test]
    fn test_tie_keeps_server() {
        let local = record("A", 5.0, t(9));
        let server = record("A", 3.0, t(9));
        let (_, source) = SyncResolver::resolve_last_write_wins(&local, &server);
        assert_eq!(source, SyncWinner::Server);
    }

    #[test]
    fn test_merge_sets() {
        let local = vec![record("B", 7.0, t(12)), record("C", 1.0, t(8)), record("L", 2.0, t(8))];
        let server = vec![record("A", 1.0, t(9)), record("B", 4.0, t(10)), record("C", 2.0, t(11))];

        let merged = SyncResolver::merge_product_sets(&local, &server);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "L"]);
        assert_eq!(merged[1].completed_units, 7.0);
        assert_eq!(merged[2].completed_units, 2.0);
    }
}
