// ==========================================
// 制造费用分摊率核算系统 - 引擎层
// ==========================================
// 职责: 分摊率 / 计价 / 差异核对, 均为纯计算
// 红线: 引擎不读文件、不读配置文件, 参数全部显式传入
// ==========================================

pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod rate;
pub mod reconciliation;
pub mod valuation;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use inventory::InventoryEngine;
pub use orchestrator::{CostingOrchestrator, CostingRunResult};
pub use rate::{RateEngine, RateParams, RateProposal};
pub use reconciliation::ReconciliationEngine;
pub use valuation::ValuationEngine;
