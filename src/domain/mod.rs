// ==========================================
// 制造费用分摊率核算系统 - 领域模型层
// ==========================================
// 职责: 定义期间、生产行、差异汇总、DQ 记录
// 红线: 不含文件读取逻辑, 不含引擎逻辑
// ==========================================

pub mod dq;
pub mod period;
pub mod production;
pub mod reconciliation;
pub mod types;

// 重导出核心类型
pub use dq::{DqLevel, DqReport, DqSummary, DqViolation};
pub use period::{CurrentRates, PeriodRecord, RatedPeriod};
pub use production::{
    DriverEntry, InputSnapshot, InventorySummary, MissingJoin, PriceEntry, ProductionLine,
    ValuationResult, ValuedLine,
};
pub use reconciliation::ReconciliationSummary;
pub use types::{CostingRateSelector, InputTable, JoinSource, ProductStatus};
