// ==========================================
// 制造费用分摊率核算系统 - 输入快照导入器
// ==========================================
// 职责: 整合导入流程, 从四张输入表到类型化快照 + DQ 报告
// 流程: 解析 → 映射 → DQ 校验 → 快照
// ==========================================
// 红线: 映射失败的行记为 Error 并剔除, 不以默认值补齐
// ==========================================

use crate::domain::dq::{DqLevel, DqReport, DqViolation};
use crate::domain::production::InputSnapshot;
use crate::domain::types::InputTable;
use crate::importer::dq_validator::DqValidator as DefaultDqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DqValidator, FieldMapper, FileParser, MappedRow, RawRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

// 同名文件按此顺序优先
const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

// ==========================================
// RawTables - 四张输入表的原始行
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub periods: Vec<RawRecord>,
    pub production: Vec<RawRecord>,
    pub drivers: Vec<RawRecord>,
    pub price_book: Vec<RawRecord>,
}

impl RawTables {
    pub fn total_rows(&self) -> usize {
        self.periods.len() + self.production.len() + self.drivers.len() + self.price_book.len()
    }
}

// ==========================================
// SnapshotImport - 导入结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SnapshotImport {
    pub snapshot: InputSnapshot, // 映射成功的行
    pub dq_report: DqReport,     // 映射错误 + DQ 规则违规
}

// ==========================================
// SnapshotImporter - 输入快照导入器
// ==========================================
pub struct SnapshotImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    dq_validator: Box<dyn DqValidator>,
}

impl SnapshotImporter {
    /// 使用默认组件创建导入器
    ///
    /// # 参数
    /// - default_wip_conv_pct: 在制品缺少完工百分比时的默认值（用于 DQ 提示）
    pub fn new(default_wip_conv_pct: f64) -> Self {
        Self::with_components(
            Box::new(UniversalFileParser),
            Box::new(DefaultFieldMapper),
            Box::new(DefaultDqValidator::new(default_wip_conv_pct)),
        )
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        dq_validator: Box<dyn DqValidator>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            dq_validator,
        }
    }

    /// 定位目录下的输入表文件（csv 优先于 xlsx/xls）
    pub fn resolve_table_path(dir: &Path, table: InputTable) -> ImportResult<PathBuf> {
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", table.file_stem(), ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| ImportError::MissingTable {
                table,
                dir: dir.display().to_string(),
            })
    }

    /// 从数据目录导入四张输入表
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn import_dir<P: AsRef<Path>>(&self, dir: P) -> ImportResult<SnapshotImport> {
        let dir = dir.as_ref();
        self.import_files(
            &Self::resolve_table_path(dir, InputTable::Periods)?,
            &Self::resolve_table_path(dir, InputTable::Production)?,
            &Self::resolve_table_path(dir, InputTable::Drivers)?,
            &Self::resolve_table_path(dir, InputTable::PriceBook)?,
        )
    }

    /// 从四个文件导入
    pub fn import_files(
        &self,
        periods: &Path,
        production: &Path,
        drivers: &Path,
        price_book: &Path,
    ) -> ImportResult<SnapshotImport> {
        debug!("步骤 1: 解析文件");
        let raw = RawTables {
            periods: self.file_parser.parse_to_raw_records(periods)?,
            production: self.file_parser.parse_to_raw_records(production)?,
            drivers: self.file_parser.parse_to_raw_records(drivers)?,
            price_book: self.file_parser.parse_to_raw_records(price_book)?,
        };
        info!(total_rows = raw.total_rows(), "文件解析完成");

        Ok(self.import_records(raw))
    }

    /// 从已解析的原始行导入（映射 + DQ 校验）
    pub fn import_records(&self, raw: RawTables) -> SnapshotImport {
        let total_rows = raw.total_rows();
        let mut violations = Vec::new();

        debug!("步骤 2: 字段映射");
        let periods = map_rows(InputTable::Periods, &raw.periods, &mut violations, |r| {
            self.field_mapper.map_period(r)
        });
        let production = map_rows(InputTable::Production, &raw.production, &mut violations, |r| {
            self.field_mapper.map_production(r)
        });
        let drivers = map_rows(InputTable::Drivers, &raw.drivers, &mut violations, |r| {
            self.field_mapper.map_driver(r)
        });
        let price_book = map_rows(InputTable::PriceBook, &raw.price_book, &mut violations, |r| {
            self.field_mapper.map_price(r)
        });
        let mapping_errors = violations.len();

        debug!("步骤 3: DQ 校验");
        violations.extend(self.dq_validator.validate_periods(&periods));
        violations.extend(self.dq_validator.validate_production(&production));
        violations.extend(self.dq_validator.validate_drivers(&drivers));
        violations.extend(self.dq_validator.validate_price_book(&price_book));
        violations.extend(
            self.dq_validator
                .validate_join_keys(&production, &drivers, &price_book),
        );

        let dq_report = self.dq_validator.generate_dq_report(total_rows, violations);
        info!(
            mapping_errors,
            blocked = dq_report.summary.blocked,
            warning = dq_report.summary.warning,
            conflict = dq_report.summary.conflict,
            info = dq_report.summary.info,
            "DQ 校验完成"
        );

        let snapshot = InputSnapshot {
            periods: periods.into_iter().map(|r| r.record).collect(),
            production: production.into_iter().map(|r| r.record).collect(),
            drivers: drivers.into_iter().map(|r| r.record).collect(),
            price_book: price_book.into_iter().map(|r| r.record).collect(),
        };

        SnapshotImport {
            snapshot,
            dq_report,
        }
    }
}

/// 逐行映射; 失败行转为 Error 违规
fn map_rows<T, F>(
    table: InputTable,
    rows: &[RawRecord],
    violations: &mut Vec<DqViolation>,
    map: F,
) -> Vec<MappedRow<T>>
where
    F: Fn(&RawRecord) -> ImportResult<T>,
{
    let key_field = match table {
        InputTable::Periods => "period",
        _ => "product",
    };

    let mut mapped = Vec::with_capacity(rows.len());
    for raw in rows {
        match map(raw) {
            Ok(record) => mapped.push(MappedRow {
                row_number: raw.row_number,
                record,
            }),
            Err(e) => {
                warn!(%table, row_number = raw.row_number, error = %e, "字段映射失败");
                let key = raw
                    .fields
                    .get(key_field)
                    .map(|k| k.as_str())
                    .filter(|k| !k.is_empty());
                violations.push(DqViolation::new(
                    table,
                    raw.row_number,
                    key,
                    DqLevel::Error,
                    e.field().unwrap_or(key_field),
                    e.to_string(),
                ));
            }
        }
    }
    mapped
}
