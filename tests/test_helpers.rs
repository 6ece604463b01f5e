// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成四张输入表, 供导入/核算/导出测试使用
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PERIODS_HEADER: &str =
    "period,budgeted_overhead,normal_capacity_mh,actual_overhead,actual_driver_mh";
pub const PRODUCTION_HEADER: &str = "product,status,quantity,wip_conv_pct";
pub const DRIVERS_HEADER: &str = "product,mh_per_unit";
pub const PRICE_BOOK_HEADER: &str = "product,direct_material,direct_labour";

/// 标准期间序列: 预算率恒为 10, 实际率 10 → 10.5 → 11
pub const STANDARD_PERIODS: &[&str] = &[
    "2024-01,100000,10000,98000,9800",
    "2024-02,100000,10000,105000,10000",
    "2024-03,100000,10000,110000,10000",
];

/// 标准生产: 一行完工, 一行在制（50%）
pub const STANDARD_PRODUCTION: &[&str] = &["P100,finished,10,", "P200,wip,20,0.5"];

pub const STANDARD_DRIVERS: &[&str] = &["P100,2", "P200,1.5"];

pub const STANDARD_PRICE_BOOK: &[&str] = &["P100,50,20", "P200,30,10"];

/// 写入一张 CSV 表（表头 + 数据行）
pub fn write_csv(
    dir: &Path,
    file_name: &str,
    header: &str,
    rows: &[&str],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(file_name);
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// 输入数据目录构造器
///
/// 默认四张表均为标准数据, 可单独替换某张表
pub struct TestDataBuilder {
    periods: Vec<String>,
    production: Vec<String>,
    drivers: Vec<String>,
    price_book: Vec<String>,
    production_header: String,
}

impl TestDataBuilder {
    pub fn new() -> Self {
        let owned = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect();
        Self {
            periods: owned(STANDARD_PERIODS),
            production: owned(STANDARD_PRODUCTION),
            drivers: owned(STANDARD_DRIVERS),
            price_book: owned(STANDARD_PRICE_BOOK),
            production_header: PRODUCTION_HEADER.to_string(),
        }
    }

    pub fn periods(mut self, rows: &[&str]) -> Self {
        self.periods = rows.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn production(mut self, rows: &[&str]) -> Self {
        self.production = rows.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn production_header(mut self, header: &str) -> Self {
        self.production_header = header.to_string();
        self
    }

    pub fn drivers(mut self, rows: &[&str]) -> Self {
        self.drivers = rows.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn price_book(mut self, rows: &[&str]) -> Self {
        self.price_book = rows.iter().map(|r| r.to_string()).collect();
        self
    }

    /// 在临时目录中写出四张表（TempDir 需保持存活）
    pub fn build(&self) -> Result<TempDir, Box<dyn Error>> {
        fn refs(rows: &[String]) -> Vec<&str> {
            rows.iter().map(|r| r.as_str()).collect()
        }

        let dir = tempfile::tempdir()?;

        write_csv(dir.path(), "oar_inputs.csv", PERIODS_HEADER, &refs(&self.periods))?;
        write_csv(
            dir.path(),
            "production_today.csv",
            &self.production_header,
            &refs(&self.production),
        )?;
        write_csv(dir.path(), "drivers_today.csv", DRIVERS_HEADER, &refs(&self.drivers))?;
        write_csv(dir.path(), "pricebook.csv", PRICE_BOOK_HEADER, &refs(&self.price_book))?;

        Ok(dir)
    }
}

impl Default for TestDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 标准输入目录
pub fn create_standard_data_dir() -> Result<TempDir, Box<dyn Error>> {
    TestDataBuilder::new().build()
}

/// Excel 样例文件路径（期间列为日期格式单元格）
pub fn fixture_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("datasets")
        .join(file_name)
}

/// 期间表使用 Excel 样例, 其余三张表为标准 CSV
pub fn create_excel_periods_data_dir() -> Result<TempDir, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::copy(fixture_path("oar_inputs.xlsx"), dir.path().join("oar_inputs.xlsx"))?;
    write_csv(dir.path(), "production_today.csv", PRODUCTION_HEADER, STANDARD_PRODUCTION)?;
    write_csv(dir.path(), "drivers_today.csv", DRIVERS_HEADER, STANDARD_DRIVERS)?;
    write_csv(dir.path(), "pricebook.csv", PRICE_BOOK_HEADER, STANDARD_PRICE_BOOK)?;
    Ok(dir)
}

/// 写入 JSON 配置文件
pub fn write_config(dir: &Path, json: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("config.json");
    fs::write(&path, json)?;
    Ok(path)
}

/// 浮点近似断言
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} ≈ {}",
        actual,
        expected
    );
}
