// ==========================================
// 制造费用分摊率核算系统 - 数据质量校验器实现
// ==========================================
// 职责: 期间/生产/动因/价格簿 DQ 校验 + 关联键校验 + DQ 报告生成
// 红线: 只有 Error 阻断核算; 重复键按首条生效记为 Conflict
// ==========================================

use crate::domain::dq::{DqLevel, DqReport, DqViolation};
use crate::domain::period::PeriodRecord;
use crate::domain::production::{DriverEntry, PriceEntry, ProductionLine};
use crate::domain::types::InputTable;
use crate::importer::importer_trait::{DqValidator as DqValidatorTrait, MappedRow};
use chrono::NaiveDate;
use std::collections::HashSet;

pub struct DqValidator {
    default_wip_conv_pct: f64, // 在制品缺少完工百分比时的默认值（仅用于提示信息）
}

impl DqValidator {
    pub fn new(default_wip_conv_pct: f64) -> Self {
        Self {
            default_wip_conv_pct,
        }
    }

    /// 重复产品号检查（首条生效）
    fn duplicate_products<'a, I>(&self, table: InputTable, rows: I) -> Vec<DqViolation>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let mut seen = HashSet::new();
        rows.filter(|(_, product)| !seen.insert(*product))
            .map(|(row_number, product)| {
                DqViolation::new(
                    table,
                    row_number,
                    Some(product),
                    DqLevel::Conflict,
                    "product",
                    "重复产品号, 以首条为准",
                )
            })
            .collect()
    }
}

/// 解析期间键: YYYY-MM 或 YYYY-MM-DD; 其他格式返回 None（不参与顺序检查）
fn parse_period_key(period: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(period, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d"))
        .ok()
}

impl DqValidatorTrait for DqValidator {
    fn validate_periods(&self, periods: &[MappedRow<PeriodRecord>]) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if periods.is_empty() {
            violations.push(DqViolation::new(
                InputTable::Periods,
                0,
                None,
                DqLevel::Error,
                "period",
                "期间序列为空, 无法计算分摊率",
            ));
            return violations;
        }

        let mut seen = HashSet::new();
        let mut previous: Option<NaiveDate> = None;

        for row in periods {
            let record = &row.record;
            let key = Some(record.period.as_str());

            if !seen.insert(record.period.as_str()) {
                violations.push(DqViolation::new(
                    InputTable::Periods,
                    row.row_number,
                    key,
                    DqLevel::Conflict,
                    "period",
                    "重复期间",
                ));
            }

            // 顺序检查只比较相邻的可解析期间
            if let Some(current) = parse_period_key(&record.period) {
                if let Some(prev) = previous {
                    if current < prev {
                        violations.push(DqViolation::new(
                            InputTable::Periods,
                            row.row_number,
                            key,
                            DqLevel::Warning,
                            "period",
                            "期间未按升序排列, 滚动分摊率依赖行序",
                        ));
                    }
                }
                previous = Some(current);
            }

            if record.normal_capacity_mh <= 0.0 {
                violations.push(DqViolation::new(
                    InputTable::Periods,
                    row.row_number,
                    key,
                    DqLevel::Warning,
                    "normal_capacity_mh",
                    format!(
                        "正常产能机时非正 ({}), 预算分摊率按 0 计",
                        record.normal_capacity_mh
                    ),
                ));
            }

            if record.actual_driver_mh <= 0.0 {
                violations.push(DqViolation::new(
                    InputTable::Periods,
                    row.row_number,
                    key,
                    DqLevel::Warning,
                    "actual_driver_mh",
                    format!(
                        "实际动因机时非正 ({}), 实际分摊率按 0 计",
                        record.actual_driver_mh
                    ),
                ));
            }
        }

        violations
    }

    fn validate_production(&self, lines: &[MappedRow<ProductionLine>]) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        for row in lines {
            let line = &row.record;
            let key = Some(line.product.as_str());

            if line.quantity < 0.0 {
                violations.push(DqViolation::new(
                    InputTable::Production,
                    row.row_number,
                    key,
                    DqLevel::Error,
                    "quantity",
                    format!("数量为负数: {}", line.quantity),
                ));
            }

            match line.wip_conv_pct {
                Some(pct) if !(0.0..=1.0).contains(&pct) => {
                    violations.push(DqViolation::new(
                        InputTable::Production,
                        row.row_number,
                        key,
                        DqLevel::Error,
                        "wip_conv_pct",
                        format!("完工百分比超出 [0,1]: {}", pct),
                    ));
                }
                Some(_) if line.status.is_finished() => {
                    violations.push(DqViolation::new(
                        InputTable::Production,
                        row.row_number,
                        key,
                        DqLevel::Info,
                        "wip_conv_pct",
                        "完工品给出了完工百分比, 计价时忽略",
                    ));
                }
                None if !line.status.is_finished() => {
                    violations.push(DqViolation::new(
                        InputTable::Production,
                        row.row_number,
                        key,
                        DqLevel::Warning,
                        "wip_conv_pct",
                        format!(
                            "在制品缺少完工百分比, 使用默认值 {}",
                            self.default_wip_conv_pct
                        ),
                    ));
                }
                _ => {}
            }
        }

        violations
    }

    fn validate_drivers(&self, drivers: &[MappedRow<DriverEntry>]) -> Vec<DqViolation> {
        let mut violations = self.duplicate_products(
            InputTable::Drivers,
            drivers
                .iter()
                .map(|row| (row.row_number, row.record.product.as_str())),
        );

        for row in drivers {
            if row.record.mh_per_unit < 0.0 {
                violations.push(DqViolation::new(
                    InputTable::Drivers,
                    row.row_number,
                    Some(&row.record.product),
                    DqLevel::Warning,
                    "mh_per_unit",
                    format!("单位机时为负数: {}", row.record.mh_per_unit),
                ));
            }
        }

        violations
    }

    fn validate_price_book(&self, prices: &[MappedRow<PriceEntry>]) -> Vec<DqViolation> {
        let mut violations = self.duplicate_products(
            InputTable::PriceBook,
            prices
                .iter()
                .map(|row| (row.row_number, row.record.product.as_str())),
        );

        for row in prices {
            let price = &row.record;
            for (field, value) in [
                ("direct_material", price.direct_material),
                ("direct_labour", price.direct_labour),
            ] {
                if value < 0.0 {
                    violations.push(DqViolation::new(
                        InputTable::PriceBook,
                        row.row_number,
                        Some(&price.product),
                        DqLevel::Warning,
                        field,
                        format!("单价为负数: {}", value),
                    ));
                }
            }
        }

        violations
    }

    fn validate_join_keys(
        &self,
        production: &[MappedRow<ProductionLine>],
        drivers: &[MappedRow<DriverEntry>],
        prices: &[MappedRow<PriceEntry>],
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        let driver_keys: HashSet<&str> = drivers.iter().map(|r| r.record.product.as_str()).collect();
        let price_keys: HashSet<&str> = prices.iter().map(|r| r.record.product.as_str()).collect();
        let production_keys: HashSet<&str> =
            production.iter().map(|r| r.record.product.as_str()).collect();

        // 生产行缺少动因/价格 → 无法计价
        for row in production {
            let product = row.record.product.as_str();
            if !driver_keys.contains(product) {
                violations.push(DqViolation::new(
                    InputTable::Production,
                    row.row_number,
                    Some(product),
                    DqLevel::Error,
                    "product",
                    "动因表中无此产品, 无法计算单位机时",
                ));
            }
            if !price_keys.contains(product) {
                violations.push(DqViolation::new(
                    InputTable::Production,
                    row.row_number,
                    Some(product),
                    DqLevel::Error,
                    "product",
                    "价格簿中无此产品, 无法计算单位成本",
                ));
            }
        }

        // 动因/价格无对应生产行 → 仅提示
        let orphans = drivers
            .iter()
            .map(|r| (InputTable::Drivers, r.row_number, r.record.product.as_str()))
            .chain(
                prices
                    .iter()
                    .map(|r| (InputTable::PriceBook, r.row_number, r.record.product.as_str())),
            )
            .filter(|(_, _, product)| !production_keys.contains(product));

        for (table, row_number, product) in orphans {
            violations.push(DqViolation::new(
                table,
                row_number,
                Some(product),
                DqLevel::Info,
                "product",
                "当日生产中无此产品",
            ));
        }

        violations
    }

    fn generate_dq_report(&self, total_rows: usize, violations: Vec<DqViolation>) -> DqReport {
        DqReport::from_violations(total_rows, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductStatus;

    fn mapped<T>(row_number: usize, record: T) -> MappedRow<T> {
        MappedRow { row_number, record }
    }

    fn period(key: &str, capacity: f64, driver_mh: f64) -> MappedRow<PeriodRecord> {
        mapped(1, PeriodRecord::new(key, 1000.0, capacity, 1000.0, driver_mh))
    }

    fn production(product: &str, status: ProductStatus, qty: f64, pct: Option<f64>) -> MappedRow<ProductionLine> {
        mapped(
            1,
            ProductionLine {
                product: product.to_string(),
                status,
                quantity: qty,
                wip_conv_pct: pct,
            },
        )
    }

    fn levels(violations: &[DqViolation]) -> Vec<(DqLevel, &str)> {
        violations
            .iter()
            .map(|v| (v.level, v.field.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_periods_is_error() {
        let violations = DqValidator::new(1.0).validate_periods(&[]);
        assert_eq!(levels(&violations), vec![(DqLevel::Error, "period")]);
    }

    #[test]
    fn test_duplicate_and_unordered_periods() {
        let rows = vec![
            period("2024-02", 100.0, 100.0),
            period("2024-01", 100.0, 100.0),
            period("2024-01", 100.0, 100.0),
        ];

        let violations = DqValidator::new(1.0).validate_periods(&rows);

        assert_eq!(
            levels(&violations),
            vec![(DqLevel::Warning, "period"), (DqLevel::Conflict, "period")]
        );
    }

    #[test]
    fn test_unparseable_period_keys_skip_order_check() {
        let rows = vec![period("Q2", 100.0, 100.0), period("Q1", 100.0, 100.0)];
        assert!(DqValidator::new(1.0).validate_periods(&rows).is_empty());
    }

    #[test]
    fn test_period_zero_denominators_warn() {
        let rows = vec![period("2024-01-31", 0.0, -1.0)];
        let violations = DqValidator::new(1.0).validate_periods(&rows);
        assert_eq!(
            levels(&violations),
            vec![
                (DqLevel::Warning, "normal_capacity_mh"),
                (DqLevel::Warning, "actual_driver_mh")
            ]
        );
    }

    #[test]
    fn test_production_rules() {
        let rows = vec![
            production("A", ProductStatus::Finished, -1.0, None),
            production("B", ProductStatus::Wip, 1.0, Some(1.5)),
            production("C", ProductStatus::Wip, 1.0, None),
            production("D", ProductStatus::Finished, 1.0, Some(0.5)),
            production("E", ProductStatus::Wip, 1.0, Some(0.5)),
        ];

        let violations = DqValidator::new(1.0).validate_production(&rows);

        assert_eq!(
            levels(&violations),
            vec![
                (DqLevel::Error, "quantity"),
                (DqLevel::Error, "wip_conv_pct"),
                (DqLevel::Warning, "wip_conv_pct"),
                (DqLevel::Info, "wip_conv_pct"),
            ]
        );
    }

    #[test]
    fn test_duplicate_driver_is_conflict() {
        let rows = vec![
            mapped(1, DriverEntry { product: "A".to_string(), mh_per_unit: 1.0 }),
            mapped(2, DriverEntry { product: "A".to_string(), mh_per_unit: 2.0 }),
        ];

        let violations = DqValidator::new(1.0).validate_drivers(&rows);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Conflict);
        assert_eq!(violations[0].row_number, 2);
    }

    #[test]
    fn test_join_keys() {
        let production_rows = vec![production("A", ProductStatus::Finished, 1.0, None)];
        let drivers = vec![mapped(1, DriverEntry { product: "B".to_string(), mh_per_unit: 1.0 })];
        let prices = vec![mapped(
            1,
            PriceEntry {
                product: "A".to_string(),
                direct_material: 1.0,
                direct_labour: 1.0,
            },
        )];

        let violations =
            DqValidator::new(1.0).validate_join_keys(&production_rows, &drivers, &prices);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].level, DqLevel::Error);
        assert_eq!(violations[0].key.as_deref(), Some("A"));
        assert_eq!(violations[1].level, DqLevel::Info);
        assert_eq!(violations[1].table, InputTable::Drivers);
    }
}
