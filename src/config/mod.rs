// ==========================================
// 制造费用分摊率核算系统 - 配置层
// ==========================================
// 职责: 配置加载与边界校验
// 红线: 越界参数在此拒绝, 引擎不做截断
// ==========================================

pub mod config_manager;
pub mod error;
pub mod oar_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use oar_config::OarConfig;
