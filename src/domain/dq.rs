// ==========================================
// 制造费用分摊率核算系统 - 数据质量记录
// ==========================================
// 职责: 导入阶段的 DQ 违规明细与汇总
// 红线: 只有 Error 级别阻断核算
// ==========================================

use crate::domain::types::InputTable;
use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,    // 错误（阻断核算）
    Warning,  // 警告（允许核算）
    Info,     // 提示（仅记录）
    Conflict, // 冲突（重复键, 取首条）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub table: InputTable,         // 来源表
    pub row_number: usize,         // 原始文件行号（0 = 表级）
    pub key: Option<String>,       // 产品号/期间键（如果可解析）
    pub level: DqLevel,            // 违规级别
    pub field: String,             // 违规字段
    pub message: String,           // 违规描述
}

impl DqViolation {
    pub fn new(
        table: InputTable,
        row_number: usize,
        key: Option<&str>,
        level: DqLevel,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            table,
            row_number,
            key: key.map(|k| k.to_string()),
            level,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 四张表总行数
    pub blocked: usize,    // ERROR
    pub warning: usize,    // WARNING
    pub info: usize,       // INFO
    pub conflict: usize,   // CONFLICT
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    /// 由违规明细生成报告
    pub fn from_violations(total_rows: usize, violations: Vec<DqViolation>) -> Self {
        let count = |level: DqLevel| violations.iter().filter(|v| v.level == level).count();

        let summary = DqSummary {
            total_rows,
            blocked: count(DqLevel::Error),
            warning: count(DqLevel::Warning),
            info: count(DqLevel::Info),
            conflict: count(DqLevel::Conflict),
        };

        Self {
            summary,
            violations,
        }
    }

    /// 是否存在阻断级违规
    pub fn is_blocking(&self) -> bool {
        self.summary.blocked > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &DqViolation> {
        self.violations.iter().filter(|v| v.level == DqLevel::Error)
    }
}
