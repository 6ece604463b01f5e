// ==========================================
// 制造费用分摊率核算系统 - 核算配置
// ==========================================
// 职责: 一次核算运行的全部显式参数
// 红线: 引擎不读取任何环境/全局状态, 参数只经由此结构传入
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::config_manager::config_keys;
use crate::domain::types::CostingRateSelector;
use crate::engine::rate::RateParams;
use serde::{Deserialize, Serialize};

// ==========================================
// 默认值
// ==========================================
pub const DEFAULT_BETA: f64 = 0.5;
pub const DEFAULT_DEADBAND: f64 = 0.05;
pub const DEFAULT_CAP: f64 = 0.10;
pub const DEFAULT_EWMA_ALPHA: f64 = 0.3;
pub const DEFAULT_COSTING_RATE: CostingRateSelector = CostingRateSelector::Operational;
/// 在制行缺少完工百分比时按完工品计价（会高估不完整数据下的在制品价值）
pub const DEFAULT_WIP_CONV_PCT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OarConfig {
    pub beta: f64,
    pub deadband: f64,
    pub cap: f64,
    pub ewma_alpha: f64,
    pub costing_rate: CostingRateSelector,
    pub default_wip_conv_pct: f64,
}

impl Default for OarConfig {
    fn default() -> Self {
        Self {
            beta: DEFAULT_BETA,
            deadband: DEFAULT_DEADBAND,
            cap: DEFAULT_CAP,
            ewma_alpha: DEFAULT_EWMA_ALPHA,
            costing_rate: DEFAULT_COSTING_RATE,
            default_wip_conv_pct: DEFAULT_WIP_CONV_PCT,
        }
    }
}

impl OarConfig {
    /// 校验所有比例参数在 [0,1] 内且为有限值
    pub fn validate(&self) -> ConfigResult<()> {
        check_fraction(config_keys::BETA, self.beta)?;
        check_fraction(config_keys::DEADBAND, self.deadband)?;
        check_fraction(config_keys::CAP, self.cap)?;
        check_fraction(config_keys::EWMA_ALPHA, self.ewma_alpha)?;
        check_fraction(config_keys::DEFAULT_WIP_CONV_PCT, self.default_wip_conv_pct)?;
        Ok(())
    }

    pub fn rate_params(&self) -> RateParams {
        RateParams::new(self.beta, self.deadband, self.cap, self.ewma_alpha)
    }
}

pub(crate) fn check_fraction(key: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}
