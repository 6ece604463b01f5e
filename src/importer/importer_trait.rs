// ==========================================
// 制造费用分摊率核算系统 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 字段映射 → DQ 校验 → 输入快照
// ==========================================

use crate::domain::dq::{DqReport, DqViolation};
use crate::domain::period::PeriodRecord;
use crate::domain::production::{DriverEntry, PriceEntry, ProductionLine};
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRecord - 解析后的原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub row_number: usize,              // 数据行号（从 1 开始, 不含表头）
    pub fields: HashMap<String, String>, // 列名（小写）→ 原始值（已 trim）
}

// ==========================================
// MappedRow - 带行号的类型化记录
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow<T> {
    pub row_number: usize,
    pub record: T,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRecord>): 跳过完全空白行后的数据行
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 原始行 → 类型化记录（阶段 2）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    fn map_period(&self, raw: &RawRecord) -> ImportResult<PeriodRecord>;

    fn map_production(&self, raw: &RawRecord) -> ImportResult<ProductionLine>;

    fn map_driver(&self, raw: &RawRecord) -> ImportResult<DriverEntry>;

    fn map_price(&self, raw: &RawRecord) -> ImportResult<PriceEntry>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验（阶段 3）, 在核算之前发现问题
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 期间序列: 空表、重复期间、顺序、分母非正
    fn validate_periods(&self, periods: &[MappedRow<PeriodRecord>]) -> Vec<DqViolation>;

    /// 生产行: 数量、完工百分比
    fn validate_production(&self, lines: &[MappedRow<ProductionLine>]) -> Vec<DqViolation>;

    /// 动因表: 重复键、取值范围
    fn validate_drivers(&self, drivers: &[MappedRow<DriverEntry>]) -> Vec<DqViolation>;

    /// 价格簿: 重复键、取值范围
    fn validate_price_book(&self, prices: &[MappedRow<PriceEntry>]) -> Vec<DqViolation>;

    /// 关联键: 生产行缺少动因/价格, 动因/价格无对应生产行
    fn validate_join_keys(
        &self,
        production: &[MappedRow<ProductionLine>],
        drivers: &[MappedRow<DriverEntry>],
        prices: &[MappedRow<PriceEntry>],
    ) -> Vec<DqViolation>;

    /// 生成 DQ 报告
    fn generate_dq_report(&self, total_rows: usize, violations: Vec<DqViolation>) -> DqReport;
}
