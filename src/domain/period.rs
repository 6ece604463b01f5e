// ==========================================
// 制造费用分摊率核算系统 - 期间记录
// ==========================================
// 职责: 期间预算/实际制造费用与机时
// 红线: 期间序列按期间顺序排列, 顺序参与滚动平滑计算
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PeriodRecord - 期间输入记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: String,             // 期间键（如 2024-01）
    pub budgeted_overhead: f64,     // 预算制造费用
    pub normal_capacity_mh: f64,    // 正常产能机时
    pub actual_overhead: f64,       // 实际制造费用
    pub actual_driver_mh: f64,      // 实际动因机时
}

impl PeriodRecord {
    pub fn new(
        period: impl Into<String>,
        budgeted_overhead: f64,
        normal_capacity_mh: f64,
        actual_overhead: f64,
        actual_driver_mh: f64,
    ) -> Self {
        Self {
            period: period.into(),
            budgeted_overhead,
            normal_capacity_mh,
            actual_overhead,
            actual_driver_mh,
        }
    }
}

// ==========================================
// RatedPeriod - 带分摊率的期间记录
// ==========================================
// 五个派生字段恒有值; 分母为零时以 0 代替
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPeriod {
    #[serde(flatten)]
    pub record: PeriodRecord,
    pub oar_budget: f64,    // 预算分摊率
    pub oar_actual: f64,    // 实际分摊率
    pub oar_rolling: f64,   // 滚动分摊率 (EWMA)
    pub oar_proposal: f64,  // 建议分摊率
    pub variance_pct: f64,  // 滚动 vs 预算偏差 (%)
}

impl RatedPeriod {
    pub fn period(&self) -> &str {
        &self.record.period
    }
}

// ==========================================
// CurrentRates - 当期费率视图
// ==========================================
// 取期间序列最后一行作为"当期"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentRates {
    pub period: String,
    pub oar_budget: f64,
    pub oar_operational: f64,
    pub oar_proposal: f64,
    pub variance_pct: f64,
    pub actual_overhead: f64,
    pub oar_for_costing: f64,
}
