// ==========================================
// 制造费用分摊率核算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、校验
// 存储: 扁平 key-value（JSON 对象文件）, 不落库
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::oar_config::{
    check_fraction, OarConfig, DEFAULT_BETA, DEFAULT_CAP, DEFAULT_COSTING_RATE, DEFAULT_DEADBAND,
    DEFAULT_EWMA_ALPHA, DEFAULT_WIP_CONV_PCT,
};
use crate::domain::types::CostingRateSelector;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 配置文件加载
    ///
    /// # 文件格式
    /// ```json
    /// { "beta": 0.5, "deadband": 0.05, "costing_rate": "budget" }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileReadError(format!(
                "文件不存在: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), keys = manager.values.len(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载（值可为数字/布尔/字符串, null 视为未配置）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let object = parsed
            .as_object()
            .ok_or_else(|| ConfigError::ParseError("配置文件顶层必须是 JSON 对象".to_string()))?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            if !config_keys::ALL.contains(&key.as_str()) {
                warn!(config_key = %key, "未识别的配置项, 已忽略");
                continue;
            }

            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: key.clone(),
                        value: value.to_string(),
                        message: "仅支持标量配置值".to_string(),
                    })
                }
            };
            values.insert(key.clone(), text);
        }

        Ok(Self { values })
    }

    /// 由键值对构造
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 覆写单个配置值
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取原始配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 读取 [0,1] 比例参数; 不可解析或越界均报错
    fn get_fraction(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let value = match self.get_config_value(key) {
            None => return Ok(default),
            Some(raw) => raw.parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                message: "无法解析为浮点数".to_string(),
            })?,
        };

        check_fraction(key, value)?;
        Ok(value)
    }

    // ===== 分摊率参数 =====

    pub fn get_beta(&self) -> ConfigResult<f64> {
        self.get_fraction(config_keys::BETA, DEFAULT_BETA)
    }

    pub fn get_deadband(&self) -> ConfigResult<f64> {
        self.get_fraction(config_keys::DEADBAND, DEFAULT_DEADBAND)
    }

    pub fn get_cap(&self) -> ConfigResult<f64> {
        self.get_fraction(config_keys::CAP, DEFAULT_CAP)
    }

    pub fn get_ewma_alpha(&self) -> ConfigResult<f64> {
        self.get_fraction(config_keys::EWMA_ALPHA, DEFAULT_EWMA_ALPHA)
    }

    // ===== 计价参数 =====

    /// 成本计算费率选择
    ///
    /// 兼容布尔写法: true = operational, false = budget
    pub fn get_costing_rate(&self) -> ConfigResult<CostingRateSelector> {
        let value = self.get_config_or_default(
            config_keys::COSTING_RATE,
            &DEFAULT_COSTING_RATE.to_string(),
        );

        if let Some(selector) = CostingRateSelector::parse(&value) {
            return Ok(selector);
        }

        match value.to_lowercase().as_str() {
            "true" => Ok(CostingRateSelector::Operational),
            "false" => Ok(CostingRateSelector::Budget),
            _ => Err(ConfigError::InvalidValue {
                key: config_keys::COSTING_RATE.to_string(),
                value,
                message: "期望 budget 或 operational".to_string(),
            }),
        }
    }

    pub fn get_default_wip_conv_pct(&self) -> ConfigResult<f64> {
        self.get_fraction(config_keys::DEFAULT_WIP_CONV_PCT, DEFAULT_WIP_CONV_PCT)
    }

    /// 读取并校验完整核算配置
    pub fn load_oar_config(&self) -> ConfigResult<OarConfig> {
        let config = OarConfig {
            beta: self.get_beta()?,
            deadband: self.get_deadband()?,
            cap: self.get_cap()?,
            ewma_alpha: self.get_ewma_alpha()?,
            costing_rate: self.get_costing_rate()?,
            default_wip_conv_pct: self.get_default_wip_conv_pct()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 获取生效配置快照（JSON）
    ///
    /// 用于在输出中记录本次运行使用的参数
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config = self.load_oar_config()?;
        let mut snapshot = Map::new();
        snapshot.insert(config_keys::BETA.to_string(), json!(config.beta));
        snapshot.insert(config_keys::DEADBAND.to_string(), json!(config.deadband));
        snapshot.insert(config_keys::CAP.to_string(), json!(config.cap));
        snapshot.insert(config_keys::EWMA_ALPHA.to_string(), json!(config.ewma_alpha));
        snapshot.insert(
            config_keys::COSTING_RATE.to_string(),
            json!(config.costing_rate.to_string()),
        );
        snapshot.insert(
            config_keys::DEFAULT_WIP_CONV_PCT.to_string(),
            json!(config.default_wip_conv_pct),
        );
        Ok(serde_json::to_string(&snapshot)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分摊率平滑与调整
    pub const BETA: &str = "beta";
    pub const DEADBAND: &str = "deadband";
    pub const CAP: &str = "cap";
    pub const EWMA_ALPHA: &str = "ewma_alpha";

    // 计价
    pub const COSTING_RATE: &str = "costing_rate";
    pub const DEFAULT_WIP_CONV_PCT: &str = "default_wip_conv_pct";

    pub const ALL: &[&str] = &[
        BETA,
        DEADBAND,
        CAP,
        EWMA_ALPHA,
        COSTING_RATE,
        DEFAULT_WIP_CONV_PCT,
    ];
}
