// ==========================================
// 制造费用分摊率核算系统 - 分摊率引擎
// ==========================================
// 职责: 预算率 / 实际率 / 滚动率 / 建议率
// 输入: 按期间排序的期间记录 + 平滑参数
// 输出: 带五个派生字段的期间序列（顺序与行数不变）
// ==========================================
// 红线: 分母为零时费率取 0, 不报错
// 红线: 滚动率必须按期间顺序单次扫描
// ==========================================

use crate::domain::period::{PeriodRecord, RatedPeriod};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

// ==========================================
// RateParams - 平滑与调整参数
// ==========================================
// 各参数的预期取值范围均为 [0,1]。
// 超出范围时引擎照常计算（不截断），结果的阻尼语义反转，属未定义行为；
// 范围校验在配置边界完成（OarConfig::validate）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    pub beta: f64,       // 建议率向滚动率靠拢的力度
    pub deadband: f64,   // 死区（偏差小于此值不调整）
    pub cap: f64,        // 单期最大偏离比例
    pub ewma_alpha: f64, // 滚动平均中最新观测值的权重
}

impl RateParams {
    pub fn new(beta: f64, deadband: f64, cap: f64, ewma_alpha: f64) -> Self {
        Self {
            beta,
            deadband,
            cap,
            ewma_alpha,
        }
    }
}

// ==========================================
// RateProposal - 单期建议结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateProposal {
    pub proposal: f64,
    pub variance: f64, // 比例值（非百分比）
}

impl RateProposal {
    pub fn variance_pct(&self) -> f64 {
        self.variance * 100.0
    }
}

// ==========================================
// RateEngine - 分摊率引擎
// ==========================================
pub struct RateEngine {
    // 无状态引擎, 每次运行从头计算
}

impl RateEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算期间分摊率序列
    ///
    /// # 参数
    /// - `periods`: 按期间升序排列的期间记录
    /// - `params`: 平滑与调整参数
    ///
    /// # 返回
    /// 与输入同序同数量的 RatedPeriod 列表
    #[instrument(skip(self, periods), fields(count = periods.len()))]
    pub fn compute_rate_series(
        &self,
        periods: &[PeriodRecord],
        params: &RateParams,
    ) -> Vec<RatedPeriod> {
        // 1. 逐期实际率（无状态映射）
        let actual_rates: Vec<f64> = periods.iter().map(|p| self.actual_rate(p)).collect();

        // 2. 滚动率（顺序折叠）
        let rolling_rates = self.rolling_rates(&actual_rates, params.ewma_alpha);

        // 3. 建议率（无状态映射）
        let series: Vec<RatedPeriod> = periods
            .iter()
            .zip(actual_rates)
            .zip(rolling_rates)
            .map(|((record, oar_actual), oar_rolling)| {
                let oar_budget = self.budget_rate(record);
                let proposal = self.bounded_proposal(oar_budget, oar_rolling, params);

                RatedPeriod {
                    record: record.clone(),
                    oar_budget,
                    oar_actual,
                    oar_rolling,
                    oar_proposal: proposal.proposal,
                    variance_pct: proposal.variance_pct(),
                }
            })
            .collect();

        debug!(count = series.len(), "分摊率序列计算完成");
        series
    }

    /// 预算分摊率 = 预算制造费用 / 正常产能机时
    pub fn budget_rate(&self, record: &PeriodRecord) -> f64 {
        if record.normal_capacity_mh == 0.0 {
            warn!(period = %record.period, "正常产能机时为 0, 预算分摊率按 0 处理");
        }
        ratio_or_zero(record.budgeted_overhead, record.normal_capacity_mh)
    }

    /// 实际分摊率 = 实际制造费用 / 实际动因机时
    pub fn actual_rate(&self, record: &PeriodRecord) -> f64 {
        if record.actual_driver_mh == 0.0 {
            warn!(period = %record.period, "实际动因机时为 0, 实际分摊率按 0 处理");
        }
        ratio_or_zero(record.actual_overhead, record.actual_driver_mh)
    }

    /// 滚动分摊率（指数加权移动平均）
    ///
    /// r_0 = a_0
    /// r_t = alpha * a_t + (1 - alpha) * r_{t-1}
    pub fn rolling_rates(&self, actual_rates: &[f64], ewma_alpha: f64) -> Vec<f64> {
        actual_rates
            .iter()
            .fold(Vec::with_capacity(actual_rates.len()), |mut acc, &rate| {
                let rolling = match acc.last() {
                    None => rate,
                    Some(&prev) => ewma_alpha * rate + (1.0 - ewma_alpha) * prev,
                };
                acc.push(rolling);
                acc
            })
    }

    /// 有界建议率
    ///
    /// 规则:
    /// 1) variance = (滚动率 - 预算率) / 预算率, 预算率为 0 时取 0
    /// 2) |variance| < deadband → 建议率 = 预算率
    /// 3) 否则 建议率 = 预算率 × (1 + beta × variance),
    ///    截断到 [预算率 × (1 - cap), 预算率 × (1 + cap)]
    pub fn bounded_proposal(
        &self,
        oar_budget: f64,
        oar_rolling: f64,
        params: &RateParams,
    ) -> RateProposal {
        let variance = ratio_or_zero(oar_rolling - oar_budget, oar_budget);

        if variance.abs() < params.deadband {
            return RateProposal {
                proposal: oar_budget,
                variance,
            };
        }

        let raw = oar_budget * (1.0 + params.beta * variance);
        let lower = oar_budget * (1.0 - params.cap);
        let upper = oar_budget * (1.0 + params.cap);

        // f64::clamp 在 lower > upper 时 panic, 此处先取下界再取上界
        let proposal = raw.max(lower).min(upper);

        RateProposal { proposal, variance }
    }

    /// 当期（序列最后一行）
    pub fn current<'a>(&self, series: &'a [RatedPeriod]) -> Option<&'a RatedPeriod> {
        series.last()
    }
}

impl Default for RateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RateParams {
        RateParams::new(0.5, 0.05, 0.10, 0.3)
    }

    fn period(name: &str, budget: f64, cap_mh: f64, actual: f64, driver_mh: f64) -> PeriodRecord {
        PeriodRecord::new(name, budget, cap_mh, actual, driver_mh)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {} ≈ {}", a, b);
    }

    // ==========================================
    // 预算率 / 实际率
    // ==========================================

    #[test]
    fn test_zero_denominators_yield_zero_rates() {
        let engine = RateEngine::new();
        let series = engine.compute_rate_series(
            &[period("2024-01", 1000.0, 0.0, 900.0, 0.0)],
            &params(),
        );

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].oar_budget, 0.0);
        assert_eq!(series[0].oar_actual, 0.0);
        assert_eq!(series[0].oar_rolling, 0.0);
        assert_eq!(series[0].oar_proposal, 0.0);
        assert_eq!(series[0].variance_pct, 0.0);
    }

    #[test]
    fn test_budget_and_actual_rates() {
        let engine = RateEngine::new();
        let record = period("2024-01", 1000.0, 250.0, 1200.0, 300.0);

        assert_close(engine.budget_rate(&record), 4.0);
        assert_close(engine.actual_rate(&record), 4.0);
    }

    // ==========================================
    // 滚动率
    // ==========================================

    #[test]
    fn test_rolling_rate_seeded_with_first_value() {
        let engine = RateEngine::new();
        let rolling = engine.rolling_rates(&[10.0, 20.0, 30.0], 0.5);

        assert_close(rolling[0], 10.0);
        assert_close(rolling[1], 15.0);
        assert_close(rolling[2], 22.5);
    }

    #[test]
    fn test_rolling_rate_is_order_sensitive() {
        let engine = RateEngine::new();
        let forward = vec![
            period("2024-01", 1000.0, 100.0, 1000.0, 100.0),
            period("2024-02", 1000.0, 100.0, 2000.0, 100.0),
            period("2024-03", 1000.0, 100.0, 3000.0, 100.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a: Vec<f64> = engine
            .compute_rate_series(&forward, &params())
            .iter()
            .map(|p| p.oar_rolling)
            .collect();
        let b: Vec<f64> = engine
            .compute_rate_series(&reversed, &params())
            .iter()
            .map(|p| p.oar_rolling)
            .collect();

        assert_ne!(a, b);
    }

    #[test]
    fn test_rolling_rate_equal_actuals_is_flat() {
        let engine = RateEngine::new();
        let rolling = engine.rolling_rates(&[8.0, 8.0, 8.0], 0.3);
        assert!(rolling.iter().all(|r| (*r - 8.0).abs() < 1e-12));
    }

    #[test]
    fn test_rolling_rate_empty_series() {
        let engine = RateEngine::new();
        assert!(engine.rolling_rates(&[], 0.3).is_empty());
        assert!(engine.compute_rate_series(&[], &params()).is_empty());
    }

    // ==========================================
    // 建议率
    // ==========================================

    #[test]
    fn test_proposal_inside_deadband_equals_budget() {
        let engine = RateEngine::new();
        let proposal = engine.bounded_proposal(10.0, 10.2, &params());

        assert_eq!(proposal.proposal, 10.0);
        assert_close(proposal.variance_pct(), 2.0);
    }

    #[test]
    fn test_proposal_is_capped() {
        let engine = RateEngine::new();
        let proposal = engine.bounded_proposal(10.0, 20.0, &params());

        assert_close(proposal.variance, 1.0);
        assert_close(proposal.proposal, 11.0);

        let proposal = engine.bounded_proposal(10.0, 2.0, &params());
        assert_close(proposal.proposal, 9.0);
    }

    #[test]
    fn test_proposal_partial_nudge() {
        let engine = RateEngine::new();
        let proposal = engine.bounded_proposal(10.0, 10.8, &params());

        // 10 × (1 + 0.5 × 0.08) = 10.4
        assert_close(proposal.proposal, 10.4);
    }

    #[test]
    fn test_proposal_zero_budget() {
        let engine = RateEngine::new();
        let proposal = engine.bounded_proposal(0.0, 5.0, &RateParams::new(0.5, 0.0, 0.1, 0.3));

        assert_eq!(proposal.variance, 0.0);
        assert_eq!(proposal.proposal, 0.0);
    }

    #[test]
    fn test_proposal_out_of_range_cap_does_not_panic() {
        let engine = RateEngine::new();
        // cap < 0 使下界高于上界, 结果取上界
        let proposal = engine.bounded_proposal(10.0, 20.0, &RateParams::new(0.5, 0.05, -0.1, 0.3));
        assert_close(proposal.proposal, 9.0);
    }

    #[test]
    fn test_series_proposals_within_bounds() {
        let engine = RateEngine::new();
        let p = params();
        let periods = vec![
            period("2024-01", 12000.0, 1000.0, 11000.0, 950.0),
            period("2024-02", 12000.0, 1000.0, 15000.0, 900.0),
            period("2024-03", 12000.0, 1000.0, 9000.0, 1100.0),
            period("2024-04", 12000.0, 1000.0, 12500.0, 1000.0),
        ];

        let series = engine.compute_rate_series(&periods, &p);

        assert_eq!(series.len(), periods.len());
        for (rated, source) in series.iter().zip(periods.iter()) {
            assert_eq!(&rated.record, source);
            let lower = rated.oar_budget * (1.0 - p.cap);
            let upper = rated.oar_budget * (1.0 + p.cap);
            assert!(rated.oar_proposal >= lower - 1e-12);
            assert!(rated.oar_proposal <= upper + 1e-12);
            if (rated.variance_pct / 100.0).abs() < p.deadband {
                assert_eq!(rated.oar_proposal, rated.oar_budget);
            }
        }
    }

    #[test]
    fn test_current_is_last_row() {
        let engine = RateEngine::new();
        let series = engine.compute_rate_series(
            &[
                period("2024-01", 1000.0, 100.0, 1000.0, 100.0),
                period("2024-02", 1100.0, 100.0, 1000.0, 100.0),
            ],
            &params(),
        );

        assert_eq!(engine.current(&series).map(|p| p.period()), Some("2024-02"));
        assert!(engine.current(&[]).is_none());
    }
}
