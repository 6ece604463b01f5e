// ==========================================
// 制造费用分摊率核算系统 - 在产/完工计价引擎
// ==========================================
// 依据: IAS 2 - 材料按 100% 计入, 人工与制造费用按完工程度计入
// ==========================================
// 职责: 生产数量 ⋈ 动因 ⋈ 价格簿 → 单位成本 / 行价值 / 有效机时
// 输入: 当日生产行 + 动因表 + 价格簿 + 成本计算分摊率
// 输出: ValuationResult（逐行计价 + 关联缺失清单）
// ==========================================
// 红线: 关联缺失的行成本字段保持为空, 不以 0 填充
// ==========================================

use crate::domain::production::{
    DriverEntry, MissingJoin, PriceEntry, ProductionLine, ValuationResult, ValuedLine,
};
use crate::domain::types::JoinSource;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

// ==========================================
// ValuationEngine - 计价引擎
// ==========================================
pub struct ValuationEngine {
    // 在制品缺少完工百分比时使用的默认值（业务规则, 由配置显式给出）
    default_wip_conv_pct: f64,
}

impl ValuationEngine {
    /// 创建计价引擎
    ///
    /// # 参数
    /// - `default_wip_conv_pct`: 在制行缺少 wip_conv_pct 时的完工系数。
    ///   取 1.0 即按完工品计价, 动因数据不完整时会高估在制品价值。
    pub fn new(default_wip_conv_pct: f64) -> Self {
        Self {
            default_wip_conv_pct,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生产计价
    ///
    /// 以生产行为左表按产品号左外关联动因与价格簿。
    /// 动因/价格有重复键时取首条。
    ///
    /// # 返回
    /// 与生产行同序的计价行, 以及所有关联缺失
    #[instrument(skip(self, production, drivers, price_book), fields(lines = production.len()))]
    pub fn value_production(
        &self,
        production: &[ProductionLine],
        drivers: &[DriverEntry],
        price_book: &[PriceEntry],
        costing_rate: f64,
    ) -> ValuationResult {
        let driver_index = first_by_product(drivers, |d| d.product.as_str());
        let price_index = first_by_product(price_book, |p| p.product.as_str());

        let mut missing_joins = Vec::new();
        let lines: Vec<ValuedLine> = production
            .iter()
            .map(|line| {
                let driver = driver_index.get(line.product.as_str()).copied();
                let price = price_index.get(line.product.as_str()).copied();

                if driver.is_none() {
                    missing_joins.push(MissingJoin {
                        product: line.product.clone(),
                        missing: JoinSource::Drivers,
                    });
                }
                if price.is_none() {
                    missing_joins.push(MissingJoin {
                        product: line.product.clone(),
                        missing: JoinSource::PriceBook,
                    });
                }

                self.value_line(line, driver, price, costing_rate)
            })
            .collect();

        if !missing_joins.is_empty() {
            warn!(count = missing_joins.len(), "存在关联缺失的生产行, 成本字段为空");
        }
        debug!(lines = lines.len(), costing_rate, "生产计价完成");

        ValuationResult {
            costing_rate,
            lines,
            missing_joins,
        }
    }

    /// 成本计算用完工系数
    ///
    /// - finished → 1.0
    /// - wip → wip_conv_pct, 缺失时取默认值
    pub fn completion_factor(&self, line: &ProductionLine) -> f64 {
        if line.status.is_finished() {
            1.0
        } else {
            line.wip_conv_pct.unwrap_or(self.default_wip_conv_pct)
        }
    }

    /// 分摊用完工系数
    ///
    /// 目前与成本计算用完工系数取值相同, 二者服务于不同下游（分摊 vs 计价）, 分开保留。
    pub fn absorption_factor(&self, line: &ProductionLine) -> f64 {
        if line.status.is_finished() {
            1.0
        } else {
            line.wip_conv_pct.unwrap_or(self.default_wip_conv_pct)
        }
    }

    /// 单行计价
    ///
    /// unit_cost = DM + DL × cf + mh_per_unit × rate × cf
    /// line_value = unit_cost × quantity
    /// mh_effective = mh_per_unit × quantity × af
    fn value_line(
        &self,
        line: &ProductionLine,
        driver: Option<&DriverEntry>,
        price: Option<&PriceEntry>,
        costing_rate: f64,
    ) -> ValuedLine {
        let completion_factor = self.completion_factor(line);
        let absorption_factor = self.absorption_factor(line);

        let mh_per_unit = driver.map(|d| d.mh_per_unit);
        let direct_material = price.map(|p| p.direct_material);
        let direct_labour = price.map(|p| p.direct_labour);

        let overhead_per_unit = mh_per_unit.map(|mh| mh * costing_rate);
        let unit_cost = match (direct_material, direct_labour, overhead_per_unit) {
            (Some(dm), Some(dl), Some(oh)) => {
                Some(dm + dl * completion_factor + oh * completion_factor)
            }
            _ => None,
        };
        let line_value = unit_cost.map(|cost| cost * line.quantity);
        let mh_effective = mh_per_unit.map(|mh| mh * line.quantity * absorption_factor);

        ValuedLine {
            product: line.product.clone(),
            status: line.status,
            quantity: line.quantity,
            wip_conv_pct: line.wip_conv_pct,
            mh_per_unit,
            direct_material,
            direct_labour,
            completion_factor,
            overhead_per_unit,
            unit_cost,
            line_value,
            mh_effective,
        }
    }
}

/// 按产品号建立索引, 重复键保留首条
fn first_by_product<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_insert(row);
    }
    index
}
