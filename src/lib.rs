// ==========================================
// 制造费用分摊率核算系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV/Excel 输入
// 系统定位: 分摊率 → 存货计价 → 分摊差异核对
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 核算规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 核算参数
pub mod config;

// API 层 - 业务接口
pub mod api;

// 日志系统
pub mod logging;

// 性能计时
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CostingRateSelector, InputTable, JoinSource, ProductStatus};

// 领域实体
pub use domain::{
    CurrentRates, DqReport, InputSnapshot, InventorySummary, PeriodRecord, RatedPeriod,
    ReconciliationSummary, ValuationResult, ValuedLine,
};

// 引擎
pub use engine::{
    CostingOrchestrator, CostingRunResult, InventoryEngine, RateEngine, ReconciliationEngine,
    ValuationEngine,
};

// 配置
pub use config::{ConfigManager, OarConfig};

// API
pub use api::{ApiError, CostingApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制造费用分摊率核算系统";
