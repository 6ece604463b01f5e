// ==========================================
// 制造费用分摊率核算系统 - 引擎编排器
// ==========================================
// 用途: 协调三大核心引擎的执行顺序
// 流程: 分摊率 → 当期费率 → 计价 → 在库汇总 → 差异核对
// 红线: 数据单向流动, 每次运行从输入快照重新计算
// ==========================================

use crate::config::OarConfig;
use crate::domain::period::{CurrentRates, RatedPeriod};
use crate::domain::production::{InputSnapshot, InventorySummary, ValuationResult};
use crate::domain::reconciliation::ReconciliationSummary;
use crate::domain::types::CostingRateSelector;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::{InventoryEngine, RateEngine, ReconciliationEngine, ValuationEngine};
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ==========================================
// CostingRunResult - 核算结果
// ==========================================
// 不含时间戳/随机 ID: 同一输入两次运行结果完全一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostingRunResult {
    pub config: OarConfig,
    pub current: CurrentRates,
    pub rate_series: Vec<RatedPeriod>,
    pub valuation: ValuationResult,
    pub inventory: InventorySummary,
    pub reconciliation: ReconciliationSummary,
}

// ==========================================
// CostingOrchestrator - 引擎编排器
// ==========================================
pub struct CostingOrchestrator {
    config: OarConfig,
    rate: RateEngine,
    valuation: ValuationEngine,
    inventory: InventoryEngine,
    reconciliation: ReconciliationEngine,
}

impl CostingOrchestrator {
    /// 创建编排器（配置越界直接拒绝）
    pub fn new(config: OarConfig) -> EngineResult<Self> {
        config.validate()?;

        Ok(Self {
            rate: RateEngine::new(),
            valuation: ValuationEngine::new(config.default_wip_conv_pct),
            inventory: InventoryEngine::new(),
            reconciliation: ReconciliationEngine::new(),
            config,
        })
    }

    pub fn config(&self) -> &OarConfig {
        &self.config
    }

    /// 执行一次完整核算
    #[instrument(skip(self, snapshot), fields(
        periods = snapshot.periods.len(),
        lines = snapshot.production.len()
    ))]
    pub fn run(&self, snapshot: &InputSnapshot) -> EngineResult<CostingRunResult> {
        let mut perf = PerfGuard::new("costing_run");
        perf.set_rows(snapshot.periods.len() + snapshot.production.len());

        // 1. 分摊率序列
        let rate_series = self
            .rate
            .compute_rate_series(&snapshot.periods, &self.config.rate_params());

        // 2. 当期费率（最后一行）
        let today = self
            .rate
            .current(&rate_series)
            .ok_or(EngineError::EmptyPeriodSeries)?;
        let current = self.current_rates(today);
        info!(
            period = %current.period,
            oar_budget = current.oar_budget,
            oar_operational = current.oar_operational,
            oar_proposal = current.oar_proposal,
            variance_pct = current.variance_pct,
            "当期分摊率确定"
        );

        // 3. 计价
        let valuation = self.valuation.value_production(
            &snapshot.production,
            &snapshot.drivers,
            &snapshot.price_book,
            current.oar_for_costing,
        );

        // 4. 在库价值汇总
        let inventory = self.inventory.summarize(&valuation.lines);
        debug!(
            total_value = inventory.total_value,
            unvalued_lines = inventory.unvalued_lines,
            "在库价值汇总完成"
        );

        // 5. 分摊差异核对
        let reconciliation = self.reconciliation.reconcile(
            &valuation.lines,
            current.oar_budget,
            current.oar_operational,
            current.actual_overhead,
        );

        info!(
            total_value = inventory.total_value,
            driver_mh = reconciliation.driver_mh,
            under_over_vs_reporting = reconciliation.under_over_vs_reporting,
            "核算完成"
        );

        Ok(CostingRunResult {
            config: self.config,
            current,
            rate_series,
            valuation,
            inventory,
            reconciliation,
        })
    }

    /// 当期费率视图; 经营率取滚动率
    fn current_rates(&self, today: &RatedPeriod) -> CurrentRates {
        let oar_operational = today.oar_rolling;
        let oar_for_costing = match self.config.costing_rate {
            CostingRateSelector::Operational => oar_operational,
            CostingRateSelector::Budget => today.oar_budget,
        };

        CurrentRates {
            period: today.period().to_string(),
            oar_budget: today.oar_budget,
            oar_operational,
            oar_proposal: today.oar_proposal,
            variance_pct: today.variance_pct,
            actual_overhead: today.record.actual_overhead,
            oar_for_costing,
        }
    }
}
