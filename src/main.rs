// ==========================================
// 制造费用分摊率核算系统 - 命令行入口
// ==========================================
// 用法:
//   oar-costing [data_dir] [config.json] [out_dir]
//
// 默认: data_dir = data, 无配置文件（全部默认值）, out_dir = out
// 日志输出到 stderr, 核算结果 JSON 输出到 stdout
// ==========================================

use oar_costing::api::{ApiError, CostingApi};
use oar_costing::domain::DqLevel;
use oar_costing::logging;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ApiError::DataQualityBlocked { report, .. }) = e.downcast_ref::<ApiError>() {
                for v in report.violations.iter().filter(|v| v.level == DqLevel::Error) {
                    eprintln!(
                        "  [{}] 行 {} {} {}: {}",
                        v.table,
                        v.row_number,
                        v.key.as_deref().unwrap_or("-"),
                        v.field,
                        v.message
                    );
                }
            }
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".to_string()));
    let config_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "-")
        .map(PathBuf::from);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "out".to_string()));

    tracing::info!("==================================================");
    tracing::info!("{} v{}", oar_costing::APP_NAME, oar_costing::VERSION);
    tracing::info!("==================================================");

    let api = CostingApi::from_config_file(config_path.as_deref())?;
    let response = api.run_dir(&data_dir)?;

    let summary = &response.dq_report.summary;
    eprintln!(
        "DQ: 总行数 {} / 阻断 {} / 警告 {} / 冲突 {} / 提示 {}",
        summary.total_rows, summary.blocked, summary.warning, summary.conflict, summary.info
    );

    println!("{}", serde_json::to_string_pretty(&response)?);

    let paths = api.export(&response.result, &out_dir)?;
    eprintln!("已导出: {}", paths.oar_table.display());
    eprintln!("已导出: {}", paths.production_valuation.display());

    Ok(())
}
