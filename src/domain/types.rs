// ==========================================
// 制造费用分摊率核算系统 - 领域类型定义
// ==========================================
// 依据: IAS 2 存货准则 - 加工成本按正常产能分摊
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产品状态 (Product Status)
// ==========================================
// finished: 完工品, 人工/制造费用按 100% 计入
// wip: 在制品, 人工/制造费用按完工百分比计入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Finished, // 完工
    Wip,      // 在制
}

impl ProductStatus {
    /// 从字符串解析状态（大小写不敏感）
    ///
    /// 未识别的值返回 None，由导入层记为 DQ 错误
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "finished" => Some(ProductStatus::Finished),
            "wip" => Some(ProductStatus::Wip),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ProductStatus::Finished)
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Finished => write!(f, "finished"),
            ProductStatus::Wip => write!(f, "wip"),
        }
    }
}

// ==========================================
// 成本计算费率选择 (Costing Rate Selector)
// ==========================================
// budget: 预算分摊率（对外报告口径）
// operational: 滚动分摊率（经营口径）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostingRateSelector {
    Budget,
    Operational,
}

impl CostingRateSelector {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Some(CostingRateSelector::Budget),
            "operational" => Some(CostingRateSelector::Operational),
            _ => None,
        }
    }
}

impl fmt::Display for CostingRateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostingRateSelector::Budget => write!(f, "budget"),
            CostingRateSelector::Operational => write!(f, "operational"),
        }
    }
}

// ==========================================
// 输入表 (Input Table)
// ==========================================
// 用于 DQ 报告定位违规来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTable {
    Periods,
    Production,
    Drivers,
    PriceBook,
}

impl InputTable {
    /// 默认文件名（不含扩展名）
    pub fn file_stem(&self) -> &'static str {
        match self {
            InputTable::Periods => "oar_inputs",
            InputTable::Production => "production_today",
            InputTable::Drivers => "drivers_today",
            InputTable::PriceBook => "pricebook",
        }
    }
}

impl fmt::Display for InputTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

// ==========================================
// 关联来源 (Join Source)
// ==========================================
// 生产行在关联时缺失的一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSource {
    Drivers,
    PriceBook,
}

impl fmt::Display for JoinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSource::Drivers => write!(f, "drivers"),
            JoinSource::PriceBook => write!(f, "price_book"),
        }
    }
}
