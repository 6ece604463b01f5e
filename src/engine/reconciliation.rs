// ==========================================
// 制造费用分摊率核算系统 - 分摊差异核对引擎
// ==========================================
// 职责: 按两种费率计算已分摊制造费用及少/多分摊差异
// 输入: 计价行 + 预算率 + 经营率 + 当期实际制造费用
// 输出: ReconciliationSummary
// ==========================================
// 符号约定: 差异 = 实际 - 已分摊, 正数为少分摊
// ==========================================

use crate::domain::production::ValuedLine;
use crate::domain::reconciliation::ReconciliationSummary;
use tracing::debug;

pub struct ReconciliationEngine {
    // 纯函数引擎, 无内部状态
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 核对已分摊与实际制造费用
    ///
    /// driver_mh 为各行 mh_effective 之和; 关联缺失（mh_effective 为空）的行不计入
    pub fn reconcile(
        &self,
        valued_lines: &[ValuedLine],
        oar_budget: f64,
        oar_operational: f64,
        actual_overhead_period: f64,
    ) -> ReconciliationSummary {
        let driver_mh: f64 = valued_lines.iter().filter_map(|l| l.mh_effective).sum();

        self.reconcile_driver_hours(driver_mh, oar_budget, oar_operational, actual_overhead_period)
    }

    /// 按已汇总的有效机时核对
    pub fn reconcile_driver_hours(
        &self,
        driver_mh: f64,
        oar_budget: f64,
        oar_operational: f64,
        actual_overhead_period: f64,
    ) -> ReconciliationSummary {
        let applied_reporting = driver_mh * oar_budget;
        let applied_operational = driver_mh * oar_operational;

        let summary = ReconciliationSummary {
            driver_mh,
            applied_reporting,
            applied_operational,
            actual_overhead: actual_overhead_period,
            under_over_vs_reporting: actual_overhead_period - applied_reporting,
            under_over_vs_operational: actual_overhead_period - applied_operational,
        };

        debug!(
            driver_mh,
            under_over_vs_reporting = summary.under_over_vs_reporting,
            under_over_vs_operational = summary.under_over_vs_operational,
            "分摊差异核对完成"
        );
        summary
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}
