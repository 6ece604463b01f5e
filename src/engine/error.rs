// ==========================================
// 制造费用分摊率核算系统 - 引擎错误类型
// ==========================================
// 说明: 分母为零不属于错误（按 0 费率继续核算）
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("期间序列为空, 无法确定当期费率")]
    EmptyPeriodSeries,

    #[error("核算配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
