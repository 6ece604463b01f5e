// ==========================================
// 制造费用分摊率核算系统 - API层错误类型
// ==========================================
// 职责: 汇总配置/导入/引擎错误, 并给出 DQ 阻断与导出失败的显式原因
// ==========================================

use crate::config::ConfigError;
use crate::domain::dq::DqReport;
use crate::engine::EngineError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 各层错误
    // ==========================================
    #[error("配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("核算失败: {0}")]
    Engine(#[from] EngineError),

    // ==========================================
    // 数据质量
    // ==========================================
    /// 存在 Error 级违规, 拒绝核算
    #[error("数据质量校验未通过: {blocked} 条阻断级违规")]
    DataQualityBlocked {
        blocked: usize,
        report: Box<DqReport>,
    },

    // ==========================================
    // 输出
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
