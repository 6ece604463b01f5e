// ==========================================
// 制造费用分摊率核算系统 - 导入层
// ==========================================
// 职责: 外部数据导入, 生成输入快照与 DQ 报告
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod snapshot_importer;

// 重导出核心类型
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use snapshot_importer::{RawTables, SnapshotImport, SnapshotImporter};

// 重导出 Trait 接口
pub use importer_trait::{DqValidator, FieldMapper, FileParser, MappedRow, RawRecord};
