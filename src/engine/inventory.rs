// ==========================================
// 制造费用分摊率核算系统 - 在库价值汇总
// ==========================================
// 职责: 在库总价值 + 按产品汇总
// 说明: 未完成计价的行不计入合计, 单独计数
// ==========================================

use crate::domain::production::{InventorySummary, ValuedLine};
use std::collections::BTreeMap;

pub struct InventoryEngine {}

impl InventoryEngine {
    pub fn new() -> Self {
        Self {}
    }

    pub fn summarize(&self, lines: &[ValuedLine]) -> InventorySummary {
        let mut value_by_product: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_value = 0.0;
        let mut valued_lines = 0;

        for line in lines {
            if let Some(value) = line.line_value {
                *value_by_product.entry(line.product.clone()).or_insert(0.0) += value;
                total_value += value;
                valued_lines += 1;
            }
        }

        InventorySummary {
            total_value,
            value_by_product,
            valued_lines,
            unvalued_lines: lines.len() - valued_lines,
        }
    }
}

impl Default for InventoryEngine {
    fn default() -> Self {
        Self::new()
    }
}
