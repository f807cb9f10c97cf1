// ==========================================
// 工时报告 API 集成测试
// ==========================================
// 场景: 配置文件 → LabourApi → JSON 报告; 严格/宽松校验; 文件导入组装请求
// ==========================================

mod helpers;

use helpers::test_data_builder::{base_time, ProductBuilder};
use serde_json::{json, Value};
use site_ops_labour::api::{ApiError, LabourApi, LabourReportRequest, ValidationMode};
use site_ops_labour::config::{ConfigError, ConfigManager};
use site_ops_labour::engine::LabourCalculator;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn behind_schedule_payload() -> Value {
    let history: Vec<Value> = (22..=28)
        .map(|d| {
            json!({
                "date": format!("2026-02-{d}"),
                "unitsCompleted": 1,
                "hoursWorked": 16
            })
        })
        .collect();

    json!({
        "jobId": "JOB-001",
        "products": [{
            "id": "P-1",
            "job_id": "JOB-001",
            "product_type": "stair",
            "product_name": "Feature Stair",
            "total_quantity": 100,
            "completed_units": 10,
            "estimated_hours_per_unit": 4,
            "actual_hours_spent": 80,
            "status": "in_progress",
            "last_updated": "2026-03-01T17:00:00Z"
        }],
        "dailyProgress": history,
        "targetCompletion": "2026-03-05T08:00:00Z",
        "originalEstimate": { "totalHours": 200 },
        "asOf": "2026-03-02T08:00:00Z"
    })
}

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn api_with_config(json_config: &str, mode: ValidationMode) -> LabourApi {
    let file = write_temp(".json", json_config);
    let manager = ConfigManager::from_file(file.path()).unwrap();
    LabourApi::from_config(&manager, mode).unwrap()
}

#[test]
fn test_report_uses_configured_crew_cap_and_rate() {
    site_ops_labour::logging::init_test();
    let api = api_with_config(r#"{"hourly_rate": 60, "max_crew_size": 20}"#, ValidationMode::Strict);
    let report = api.generate_report_from_json(behind_schedule_payload()).unwrap();

    assert_eq!(report.generated_at, base_time());
    assert_eq!(report.metrics.days_until_deadline, 3);
    assert_eq!(report.metrics.burn_rate, 16.0);

    // 需要 30 人, 配置上限 20
    assert_eq!(report.metrics.required_team_size, 20);
    assert_eq!(report.metrics.team_recommendation.cost_impact, 20800.0);
    assert_eq!(
        report.metrics.alerts[0].action.as_deref(),
        Some("Increase team to 20 workers immediately")
    );

    // 时薪取配置 60: 原始 200h, 预计 80h + 360h
    let cost = report.cost.as_ref().unwrap();
    assert_eq!(cost.original_cost, 12000.0);
    assert_eq!(cost.projected_cost, 26400.0);
    assert_eq!(cost.variance, 14400.0);
    assert_eq!(cost.variance_percentage, 120.0);

    assert_eq!(report.bottlenecks[0].product_id, "P-1");
    assert_eq!(report.tomorrow_plan.priority, vec!["P-1".to_string()]);
}

#[test]
fn test_report_json_shape() {
    let report = LabourApi::default()
        .generate_report_from_json(behind_schedule_payload())
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert!(value["reportId"].is_string());
    assert_eq!(value["jobId"], "JOB-001");
    assert_eq!(value["metrics"]["teamRecommendation"]["urgency"], "high");
    assert_eq!(value["metrics"]["alerts"][0]["type"], "error");
    assert_eq!(value["metrics"]["alerts"][0]["priority"], "critical");
    assert_eq!(value["bottlenecks"][0]["status"], "in_progress");
    assert!(value["tomorrowPlan"]["notes"].is_array());
    assert_eq!(value["warnings"], json!([]));
}

#[test]
fn test_strict_and_lenient_modes() {
    let products = vec![ProductBuilder::new("P-1").quantity(10.0, 2.0).hours_per_unit(3.0).build()];
    let request = LabourReportRequest {
        job_id: "JOB-001".to_string(),
        products,
        daily_progress: Vec::new(),
        target_completion: "2026-03-20".to_string(),
        original_estimate: Some(site_ops_labour::OriginalEstimate { total_hours: 30.0 }),
        hourly_rate: Some(-5.0),
        team_size: Some(0),
        as_of: Some(base_time()),
    };

    let strict = LabourApi::new(LabourCalculator::default(), ValidationMode::Strict);
    match strict.generate_report(request.clone()) {
        Err(ApiError::RequestValidationError { violations, .. }) => {
            let ids: Vec<&str> = violations.iter().map(|v| v.record_id.as_str()).collect();
            assert_eq!(ids, vec!["hourlyRate", "teamSize"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let lenient = LabourApi::new(LabourCalculator::default(), ValidationMode::Lenient);
    let report = lenient.generate_report(request).unwrap();
    assert_eq!(report.warnings.len(), 2);

    // 时薪回退到配置 45: 原始 30h, 预计 0h + 24h
    let cost = report.cost.unwrap();
    assert_eq!(cost.original_cost, 1350.0);
    assert_eq!(cost.projected_cost, 1080.0);
}

#[test]
fn test_env_override_and_invalid_config() {
    let mut manager = ConfigManager::from_json_str(r#"{"hourly_rate": 50}"#).unwrap();
    manager.apply_overrides(vec![(
        "SITE_OPS_LABOUR_HOURLY_RATE".to_string(),
        "70".to_string(),
    )]);
    assert_eq!(manager.labour_config().unwrap().hourly_rate, 70.0);

    let manager = ConfigManager::from_json_str(r#"{"max_crew_size": 2}"#).unwrap();
    let err = manager.labour_config().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "max_crew_size"));

    match LabourApi::from_config(&manager, ValidationMode::Strict) {
        Err(ApiError::ConfigError(msg)) => assert!(msg.contains("max_crew_size"), "{msg}"),
        Err(other) => panic!("expected config error, got {other:?}"),
        Ok(_) => panic!("expected config error"),
    }
}

// ==========================================
// 文件导入 → 报告
// ==========================================

const PRODUCTS_CSV: &str = "\
id,job_id,product_name,product_type,total_quantity,completed_units,estimated_hours_per_unit,actual_hours_spent
P-1,JOB-001,Stair,stair,20,10,4,40

P-2,JOB-001,Rail,railing,10,5,2,10
";

#[test]
fn test_request_from_files_feeds_report() {
    let products = write_temp(".csv", PRODUCTS_CSV);
    let daily = write_temp(
        ".json",
        r#"[{"date": "2026-02-28", "hoursWorked": 30}, {"date": "2026-03-01", "hoursWorked": 34}]"#,
    );

    let request = LabourApi::request_from_files(
        " JOB-001 ",
        "2026-03-30",
        products.path(),
        Some(daily.path()),
        base_time(),
    )
    .unwrap();
    assert_eq!(request.job_id, "JOB-001");
    assert_eq!(request.products.len(), 2);
    assert_eq!(request.daily_progress.len(), 2);

    let report = LabourApi::default().generate_report_at(request, base_time()).unwrap();
    assert_eq!(report.metrics.hours_remaining, 50.0);
    assert_eq!(report.metrics.burn_rate, 32.0);
    assert_eq!(report.metrics.efficiency, 100.0);
    assert!(report.cost.is_none());
}

#[test]
fn test_request_from_files_maps_import_errors() {
    let err = LabourApi::request_from_files(
        "JOB-001",
        "2026-03-30",
        Path::new("/nonexistent/products.csv"),
        None,
        base_time(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("products.csv")), "{err:?}");

    let bad = write_temp(
        ".csv",
        "id,job_id,product_name,total_quantity,estimated_hours_per_unit\n\
         P-1,JOB-001,Stair,4,2\n\
         \n\
         P-2,JOB-001,Rail,lots,2\n",
    );
    let err =
        LabourApi::request_from_files("JOB-001", "2026-03-30", bad.path(), None, base_time())
            .unwrap_err();
    match err {
        ApiError::ImportError(msg) => assert!(msg.contains("行 4"), "{msg}"),
        other => panic!("expected import error, got {other:?}"),
    }

    let products = write_temp(".csv", PRODUCTS_CSV);
    let err = LabourApi::request_from_files(
        "JOB-001",
        "2026-03-30",
        products.path(),
        Some(Path::new("/nonexistent/daily.json")),
        base_time(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
