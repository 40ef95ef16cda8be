//! 纯度汇总模块
//!
//! 将各峰的校正面积汇总为占总校正面积的百分比（放射化学纯度）。

use serde::Serialize;

/// 单峰最终结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakResult {
    /// 峰序号（从1开始，按峰索引升序）
    pub ordinal: usize,

    /// 未校正的积分面积
    pub original_area: f64,

    /// 衰变校正后的积分面积
    pub corrected_area: f64,

    /// 占全部校正面积的百分比
    pub percentage_of_total: f64,
}

/// 汇总结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurityOutcome {
    /// 正常：百分比之和为100
    Complete,

    /// 没有峰通过过滤，结果为空
    NoPeaksDetected,

    /// 校正面积总和为0，百分比全部记为0
    ZeroTotalArea,
}

impl PurityOutcome {
    pub fn description(&self) -> &'static str {
        match self {
            PurityOutcome::Complete => "完成 / complete",
            PurityOutcome::NoPeaksDetected => "未检测到峰 / no peaks detected",
            PurityOutcome::ZeroTotalArea => "校正面积总和为零 / total corrected area is zero",
        }
    }
}

/// 纯度报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurityReport {
    pub results: Vec<PeakResult>,
    pub total_corrected_area: f64,
    pub outcome: PurityOutcome,
}

impl PurityReport {
    /// 百分比最高的峰（主峰）
    pub fn main_peak(&self) -> Option<&PeakResult> {
        self.results
            .iter()
            .max_by(|a, b| a.percentage_of_total.total_cmp(&b.percentage_of_total))
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.outcome != PurityOutcome::Complete
    }
}

/// 纯度汇总器
#[derive(Debug, Clone, Copy, Default)]
pub struct PurityReporter;

impl PurityReporter {
    /// 汇总 `(ordinal, original_area, corrected_area)` 序列
    pub fn report(peaks: &[(usize, f64, f64)]) -> PurityReport {
        if peaks.is_empty() {
            return PurityReport {
                results: Vec::new(),
                total_corrected_area: 0.0,
                outcome: PurityOutcome::NoPeaksDetected,
            };
        }

        let total: f64 = peaks.iter().map(|&(_, _, corrected)| corrected).sum();
        let outcome = if total == 0.0 {
            log::warn!(
                "{}个峰的校正面积总和为零 / corrected areas of {} peaks sum to zero",
                peaks.len(),
                peaks.len()
            );
            PurityOutcome::ZeroTotalArea
        } else {
            PurityOutcome::Complete
        };

        let results = peaks
            .iter()
            .map(|&(ordinal, original_area, corrected_area)| PeakResult {
                ordinal,
                original_area,
                corrected_area,
                percentage_of_total: match outcome {
                    PurityOutcome::Complete => corrected_area / total * 100.0,
                    _ => 0.0,
                },
            })
            .collect();

        PurityReport {
            results,
            total_corrected_area: total,
            outcome,
        }
    }
}
