// ==========================================
// CostingApi 端到端测试
// ==========================================
// 测试目标: 配置文件 → 导入 → DQ 把关 → 核算 → CSV 导出
// ==========================================

mod test_helpers;

use oar_costing::api::{ApiError, CostingApi, OAR_TABLE_FILE, PRODUCTION_VALUATION_FILE};
use oar_costing::config::ConfigManager;
use oar_costing::logging;
use test_helpers::{assert_close, create_standard_data_dir, write_config, TestDataBuilder};

#[test]
fn test_run_dir_and_export() {
    logging::init_test();

    let data_dir = create_standard_data_dir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let config_path = write_config(data_dir.path(), r#"{"costing_rate": "budget"}"#).unwrap();

    let api = CostingApi::from_config_file(Some(&config_path)).unwrap();
    let response = api.run_dir(data_dir.path()).expect("Run should succeed");

    assert!(!response.dq_report.is_blocking());
    assert_close(response.result.inventory.total_value, 1750.0);

    let paths = api
        .export(&response.result, &out_dir.path().join("nested"))
        .expect("Export should succeed");
    assert!(paths.oar_table.ends_with(OAR_TABLE_FILE));
    assert!(paths.production_valuation.ends_with(PRODUCTION_VALUATION_FILE));

    let rate_table = std::fs::read_to_string(&paths.oar_table).unwrap();
    assert_eq!(rate_table.lines().count(), 4);
    assert!(rate_table.starts_with("period,budgeted_overhead"));

    let valuation = std::fs::read_to_string(&paths.production_valuation).unwrap();
    let rows: Vec<&str> = valuation.lines().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], "P100,finished,10,,2,50,20,1,20,90,900,20");
    assert_eq!(rows[2], "P200,wip,20,0.5,1.5,30,10,0.5,15,42.5,850,15");
}

#[test]
fn test_run_dir_refuses_blocking_dq() {
    logging::init_test();

    let data_dir = TestDataBuilder::new()
        .price_book(&["P100,50,20"])
        .build()
        .unwrap();

    let api = CostingApi::new(ConfigManager::new());
    match api.run_dir(data_dir.path()) {
        Err(ApiError::DataQualityBlocked { blocked, report }) => {
            assert_eq!(blocked, 1);
            assert_eq!(report.errors().count(), 1);
        }
        other => panic!("expected DataQualityBlocked, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_config_file() {
    logging::init_test();

    let data_dir = create_standard_data_dir().unwrap();
    let config_path = write_config(data_dir.path(), r#"{"cap": 1.5}"#).unwrap();

    let api = CostingApi::from_config_file(Some(&config_path)).unwrap();
    assert!(matches!(
        api.run_dir(data_dir.path()),
        Err(ApiError::InvalidConfig(_))
    ));
}

#[test]
fn test_result_serializes_to_json() {
    logging::init_test();

    let data_dir = create_standard_data_dir().unwrap();
    let api = CostingApi::new(ConfigManager::new());
    let response = api.run_dir(data_dir.path()).unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["result"]["current"]["period"], "2024-03");
    assert_eq!(json["result"]["valuation"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(json["dq_report"]["summary"]["blocked"], 0);
}
