// ==========================================
// 制造费用分摊率核算系统 - 生产行记录
// ==========================================
// 依据: IAS 2 - 材料按 100% 计入, 人工与制造费用按约当产量计入
// ==========================================

use crate::domain::period::PeriodRecord;
use crate::domain::types::{JoinSource, ProductStatus};
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionLine - 当日生产数量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub product: String,               // 产品（关联键）
    pub status: ProductStatus,         // 完工 / 在制
    pub quantity: f64,                 // 数量（非负）
    pub wip_conv_pct: Option<f64>,     // 在制完工百分比 [0,1]，仅 wip 有意义
}

// ==========================================
// DriverEntry - 产品动因消耗
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub product: String,
    pub mh_per_unit: f64, // 单位机时
}

// ==========================================
// PriceEntry - 价格/成本簿
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub product: String,
    pub direct_material: f64, // 单位直接材料
    pub direct_labour: f64,   // 单位直接人工
}

// ==========================================
// InputSnapshot - 单次运行的输入快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub periods: Vec<PeriodRecord>,
    pub production: Vec<ProductionLine>,
    pub drivers: Vec<DriverEntry>,
    pub price_book: Vec<PriceEntry>,
}

// ==========================================
// ValuedLine - 计价后的生产行
// ==========================================
// 关联不到动因/价格的行, 成本字段为 None（不以 0 填充）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedLine {
    // 源字段（原样保留）
    pub product: String,
    pub status: ProductStatus,
    pub quantity: f64,
    pub wip_conv_pct: Option<f64>,
    pub mh_per_unit: Option<f64>,
    pub direct_material: Option<f64>,
    pub direct_labour: Option<f64>,

    // 派生字段
    pub completion_factor: f64,           // 成本计算用完工系数
    pub overhead_per_unit: Option<f64>,   // 单位制造费用
    pub unit_cost: Option<f64>,           // 单位成本
    pub line_value: Option<f64>,          // 行价值
    pub mh_effective: Option<f64>,        // 分摊用有效机时
}

impl ValuedLine {
    /// 是否完成计价（动因与价格均已关联）
    pub fn is_valued(&self) -> bool {
        self.unit_cost.is_some()
    }
}

// ==========================================
// MissingJoin - 关联缺失
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingJoin {
    pub product: String,
    pub missing: JoinSource,
}

// ==========================================
// ValuationResult - 计价输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub costing_rate: f64,
    pub lines: Vec<ValuedLine>,
    pub missing_joins: Vec<MissingJoin>,
}

// ==========================================
// InventorySummary - 在库价值汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total_value: f64,
    pub value_by_product: BTreeMap<String, f64>,
    pub valued_lines: usize,
    pub unvalued_lines: usize,
}
