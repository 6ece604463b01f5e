// ==========================================
// 制造费用分摊率核算系统 - 结果导出
// ==========================================
// 职责: 分摊率表与生产计价明细导出为 CSV
// 红线: 缺失值输出为空单元格, 不以 0 填充
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::period::RatedPeriod;
use crate::domain::production::ValuedLine;
use crate::engine::CostingRunResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const OAR_TABLE_FILE: &str = "oar_table_out.csv";
pub const PRODUCTION_VALUATION_FILE: &str = "production_valuation_out.csv";

pub const OAR_TABLE_HEADERS: &[&str] = &[
    "period",
    "budgeted_overhead",
    "normal_capacity_mh",
    "actual_overhead",
    "actual_driver_mh",
    "oar_budget",
    "oar_actual",
    "oar_rolling",
    "oar_proposal",
    "variance_pct",
];

pub const PRODUCTION_VALUATION_HEADERS: &[&str] = &[
    "product",
    "status",
    "quantity",
    "wip_conv_pct",
    "mh_per_unit",
    "direct_material",
    "direct_labour",
    "completion_factor",
    "overhead_per_unit",
    "unit_cost",
    "line_value",
    "mh_effective",
];

/// 导出文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub oar_table: PathBuf,
    pub production_valuation: PathBuf,
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// 写出分摊率表
pub fn write_rate_table<W: io::Write>(writer: W, series: &[RatedPeriod]) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(OAR_TABLE_HEADERS)?;

    for row in series {
        let r = &row.record;
        wtr.write_record([
            r.period.clone(),
            r.budgeted_overhead.to_string(),
            r.normal_capacity_mh.to_string(),
            r.actual_overhead.to_string(),
            r.actual_driver_mh.to_string(),
            row.oar_budget.to_string(),
            row.oar_actual.to_string(),
            row.oar_rolling.to_string(),
            row.oar_proposal.to_string(),
            row.variance_pct.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 写出生产计价明细
pub fn write_valuation<W: io::Write>(writer: W, lines: &[ValuedLine]) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PRODUCTION_VALUATION_HEADERS)?;

    for line in lines {
        wtr.write_record([
            line.product.clone(),
            line.status.to_string(),
            line.quantity.to_string(),
            cell(line.wip_conv_pct),
            cell(line.mh_per_unit),
            cell(line.direct_material),
            cell(line.direct_labour),
            line.completion_factor.to_string(),
            cell(line.overhead_per_unit),
            cell(line.unit_cost),
            cell(line.line_value),
            cell(line.mh_effective),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 导出一次核算结果到目录（目录不存在时创建）
pub fn export_run(result: &CostingRunResult, out_dir: &Path) -> ApiResult<ExportPaths> {
    fs::create_dir_all(out_dir)?;

    let paths = ExportPaths {
        oar_table: out_dir.join(OAR_TABLE_FILE),
        production_valuation: out_dir.join(PRODUCTION_VALUATION_FILE),
    };

    write_rate_table(fs::File::create(&paths.oar_table)?, &result.rate_series)?;
    write_valuation(
        fs::File::create(&paths.production_valuation)?,
        &result.valuation.lines,
    )?;

    info!(out_dir = %out_dir.display(), "核算结果已导出");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::PeriodRecord;
    use crate::domain::types::ProductStatus;

    #[test]
    fn test_write_rate_table() {
        let series = vec![RatedPeriod {
            record: PeriodRecord::new("2024-01", 1000.0, 100.0, 1200.0, 100.0),
            oar_budget: 10.0,
            oar_actual: 12.0,
            oar_rolling: 12.0,
            oar_proposal: 11.0,
            variance_pct: 20.0,
        }];

        let mut buf = Vec::new();
        write_rate_table(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], OAR_TABLE_HEADERS.join(","));
        assert_eq!(lines[1], "2024-01,1000,100,1200,100,10,12,12,11,20");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_write_valuation_leaves_missing_values_blank() {
        let line = ValuedLine {
            product: "B".to_string(),
            status: ProductStatus::Wip,
            quantity: 2.0,
            wip_conv_pct: Some(0.5),
            mh_per_unit: None,
            direct_material: Some(1.0),
            direct_labour: Some(2.0),
            completion_factor: 0.5,
            overhead_per_unit: None,
            unit_cost: None,
            line_value: None,
            mh_effective: None,
        };

        let mut buf = Vec::new();
        write_valuation(&mut buf, &[line]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().nth(1), Some("B,wip,2,0.5,,1,2,0.5,,,,"));
    }
}
