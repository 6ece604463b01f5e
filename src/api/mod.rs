// ==========================================
// 制造费用分摊率核算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供命令行调用
// ==========================================

pub mod costing_api;
pub mod error;
pub mod export;

// 重导出核心类型
pub use costing_api::{CostingApi, CostingResponse};
pub use error::{ApiError, ApiResult};
pub use export::{export_run, ExportPaths, OAR_TABLE_FILE, PRODUCTION_VALUATION_FILE};
