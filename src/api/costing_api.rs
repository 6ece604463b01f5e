// ==========================================
// 制造费用分摊率核算系统 - 核算 API
// ==========================================
// 职责: 封装 配置 → 导入 → DQ 把关 → 核算 → 导出 的完整流程
// 红线: DQ 报告存在 Error 时拒绝核算
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::export::{export_run, ExportPaths};
use crate::config::{ConfigManager, OarConfig};
use crate::domain::dq::DqReport;
use crate::domain::production::InputSnapshot;
use crate::engine::{CostingOrchestrator, CostingRunResult};
use crate::importer::{SnapshotImport, SnapshotImporter};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// 完整核算响应
#[derive(Debug, Clone, Serialize)]
pub struct CostingResponse {
    /// DQ 报告（含 Warning/Info/Conflict 明细）
    pub dq_report: DqReport,
    /// 核算结果
    pub result: CostingRunResult,
}

// ==========================================
// CostingApi - 核算 API
// ==========================================
pub struct CostingApi {
    config_manager: ConfigManager,
}

impl CostingApi {
    pub fn new(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// 读取配置文件创建; 未给出文件时全部取默认值
    pub fn from_config_file(path: Option<&Path>) -> ApiResult<Self> {
        let config_manager = match path {
            Some(p) => ConfigManager::from_file(p)?,
            None => ConfigManager::new(),
        };
        Ok(Self::new(config_manager))
    }

    /// 生效配置（已校验）
    pub fn config(&self) -> ApiResult<OarConfig> {
        Ok(self.config_manager.load_oar_config()?)
    }

    /// 导入数据目录（不做阻断判断）
    pub fn import(&self, data_dir: &Path) -> ApiResult<SnapshotImport> {
        let config = self.config()?;
        let importer = SnapshotImporter::new(config.default_wip_conv_pct);
        Ok(importer.import_dir(data_dir)?)
    }

    /// 对已就绪的输入快照执行核算
    pub fn run_snapshot(&self, snapshot: &InputSnapshot) -> ApiResult<CostingRunResult> {
        let orchestrator = CostingOrchestrator::new(self.config()?)?;
        Ok(orchestrator.run(snapshot)?)
    }

    /// 导入 + DQ 把关 + 核算
    #[instrument(skip(self, data_dir), fields(data_dir = %data_dir.display()))]
    pub fn run_dir(&self, data_dir: &Path) -> ApiResult<CostingResponse> {
        let SnapshotImport {
            snapshot,
            dq_report,
        } = self.import(data_dir)?;

        if dq_report.is_blocking() {
            warn!(blocked = dq_report.summary.blocked, "DQ 存在阻断级违规, 拒绝核算");
            return Err(ApiError::DataQualityBlocked {
                blocked: dq_report.summary.blocked,
                report: Box::new(dq_report),
            });
        }

        let result = self.run_snapshot(&snapshot)?;
        info!(
            period = %result.current.period,
            oar_for_costing = result.current.oar_for_costing,
            "核算完成"
        );

        Ok(CostingResponse { dq_report, result })
    }

    /// 导出核算结果
    pub fn export(&self, result: &CostingRunResult, out_dir: &Path) -> ApiResult<ExportPaths> {
        export_run(result, out_dir)
    }
}
