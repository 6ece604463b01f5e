// ==========================================
// 制造费用分摊率核算系统 - 字段映射器实现
// ==========================================
// 阶段 2: 源字段 → 标准字段映射 + 类型转换
// 列名已由解析器统一为小写
// ==========================================

use crate::domain::period::PeriodRecord;
use crate::domain::production::{DriverEntry, PriceEntry, ProductionLine};
use crate::domain::types::ProductStatus;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FieldMapper as FieldMapperTrait, RawRecord};

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_period(&self, raw: &RawRecord) -> ImportResult<PeriodRecord> {
        Ok(PeriodRecord {
            period: self.require_string(raw, "period")?,
            budgeted_overhead: self.require_f64(raw, "budgeted_overhead")?,
            normal_capacity_mh: self.require_f64(raw, "normal_capacity_mh")?,
            actual_overhead: self.require_f64(raw, "actual_overhead")?,
            actual_driver_mh: self.require_f64(raw, "actual_driver_mh")?,
        })
    }

    fn map_production(&self, raw: &RawRecord) -> ImportResult<ProductionLine> {
        let status_raw = self.require_string(raw, "status")?;
        let status =
            ProductStatus::parse(&status_raw).ok_or_else(|| ImportError::TypeConversionError {
                row: raw.row_number,
                field: "status".to_string(),
                message: format!("未识别的状态: {}（期望 finished 或 wip）", status_raw),
            })?;

        Ok(ProductionLine {
            product: self.require_string(raw, "product")?,
            status,
            quantity: self.require_f64(raw, "quantity")?,
            wip_conv_pct: self.parse_f64(raw, "wip_conv_pct")?,
        })
    }

    fn map_driver(&self, raw: &RawRecord) -> ImportResult<DriverEntry> {
        Ok(DriverEntry {
            product: self.require_string(raw, "product")?,
            mh_per_unit: self.require_f64(raw, "mh_per_unit")?,
        })
    }

    fn map_price(&self, raw: &RawRecord) -> ImportResult<PriceEntry> {
        Ok(PriceEntry {
            product: self.require_string(raw, "product")?,
            direct_material: self.require_f64(raw, "direct_material")?,
            direct_labour: self.require_f64(raw, "direct_labour")?,
        })
    }
}

impl FieldMapper {
    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, raw: &RawRecord, key: &str) -> Option<String> {
        let aliases: Vec<&str> = match key {
            "quantity" => vec!["quantity", "qty"],
            "wip_conv_pct" => vec!["wip_conv_pct", "wip_pct"],
            "direct_labour" => vec!["direct_labour", "direct_labor"],
            _ => vec![key],
        };

        for alias in aliases {
            if let Some(v) = raw.fields.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    fn require_string(&self, raw: &RawRecord, key: &str) -> ImportResult<String> {
        self.get_string(raw, key)
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                row: raw.row_number,
                field: key.to_string(),
            })
    }

    /// 解析浮点数; 空值返回 None, 非有限值视为错误
    fn parse_f64(&self, raw: &RawRecord, key: &str) -> ImportResult<Option<f64>> {
        match self.get_string(raw, key) {
            None => Ok(None),
            Some(value) => match value.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(ImportError::TypeConversionError {
                    row: raw.row_number,
                    field: key.to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
            },
        }
    }

    fn require_f64(&self, raw: &RawRecord, key: &str) -> ImportResult<f64> {
        self.parse_f64(raw, key)?
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                row: raw.row_number,
                field: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 1,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_map_period() {
        let record = FieldMapper
            .map_period(&raw(&[
                ("period", "2024-03"),
                ("budgeted_overhead", "120000"),
                ("normal_capacity_mh", "30000"),
                ("actual_overhead", "125500.5"),
                ("actual_driver_mh", "29000"),
            ]))
            .unwrap();

        assert_eq!(record.period, "2024-03");
        assert_eq!(record.actual_overhead, 125500.5);
    }

    #[test]
    fn test_map_production_with_alias_and_optional_pct() {
        let line = FieldMapper
            .map_production(&raw(&[("product", "A100"), ("status", "WIP"), ("qty", "12")]))
            .unwrap();

        assert_eq!(line.status, ProductStatus::Wip);
        assert_eq!(line.quantity, 12.0);
        assert_eq!(line.wip_conv_pct, None);
    }

    #[test]
    fn test_map_production_unknown_status() {
        let result = FieldMapper.map_production(&raw(&[
            ("product", "A100"),
            ("status", "scrap"),
            ("quantity", "1"),
        ]));

        match result {
            Err(e) => assert_eq!(e.field(), Some("status")),
            Ok(_) => panic!("expected status error"),
        }
    }

    #[test]
    fn test_map_driver_missing_field() {
        let result = FieldMapper.map_driver(&raw(&[("product", "A100"), ("mh_per_unit", "")]));
        assert!(matches!(
            result,
            Err(ImportError::RequiredFieldMissing { ref field, .. }) if field == "mh_per_unit"
        ));
    }

    #[test]
    fn test_map_price_invalid_number() {
        let result = FieldMapper.map_price(&raw(&[
            ("product", "A100"),
            ("direct_material", "ten"),
            ("direct_labour", "5"),
        ]));
        assert!(matches!(result, Err(ImportError::TypeConversionError { .. })));
    }

    #[test]
    fn test_nan_rejected() {
        let result = FieldMapper.map_production(&raw(&[
            ("product", "A100"),
            ("status", "wip"),
            ("quantity", "3"),
            ("wip_conv_pct", "NaN"),
        ]));
        assert!(result.is_err());
    }
}
