// ==========================================
// 制造费用分摊率核算系统 - 分摊差异汇总
// ==========================================
// 符号约定: 正数 = 少分摊（实际 > 已分摊）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub driver_mh: f64,                  // 有效动因机时合计
    pub applied_reporting: f64,          // 按预算率分摊
    pub applied_operational: f64,        // 按滚动率分摊
    pub actual_overhead: f64,            // 实际制造费用
    pub under_over_vs_reporting: f64,    // 实际 - 预算口径分摊
    pub under_over_vs_operational: f64,  // 实际 - 经营口径分摊
}

impl ReconciliationSummary {
    /// 预算口径是否少分摊
    pub fn is_under_absorbed_vs_reporting(&self) -> bool {
        self.under_over_vs_reporting > 0.0
    }
}
