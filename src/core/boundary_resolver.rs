//! 峰边界解析模块
//!
//! 在峰的突出度基准上按相对高度求左右交叉点：
//! `boundary_height = height - prominence * rel_height`。
//! 交叉点先线性插值得到分数位置，再向下取整作为积分窗口索引。

use super::peak_detector::Peak;
use super::signal_series::SignalSeries;
use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::ops::Range;

/// 单个峰的边界
///
/// 保证 `left_base <= left_index <= peak_index <= right_index <= right_base`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakBoundary {
    pub peak_index: usize,
    pub left_index: usize,
    pub right_index: usize,

    /// 左侧插值交叉位置（分数索引）
    pub left_ip: f64,

    /// 右侧插值交叉位置（分数索引）
    pub right_ip: f64,

    /// 交叉所用的强度阈值
    pub boundary_height: f64,
}

impl PeakBoundary {
    /// 积分窗口：半开区间 `left_index..right_index`
    #[inline]
    pub fn window(&self) -> Range<usize> {
        self.left_index..self.right_index
    }

    /// 插值宽度（样本数）
    #[inline]
    pub fn width(&self) -> f64 {
        self.right_ip - self.left_ip
    }
}

/// 边界解析器
#[derive(Debug, Clone, Copy)]
pub struct BoundaryResolver {
    rel_height: f64,
}

impl BoundaryResolver {
    pub fn new(rel_height: f64) -> AnalysisResult<Self> {
        if !(rel_height > 0.0 && rel_height <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "rel_height必须位于(0, 1] / rel_height must be in (0, 1]: {rel_height}"
            )));
        }
        Ok(Self { rel_height })
    }

    #[inline]
    pub fn rel_height(&self) -> f64 {
        self.rel_height
    }

    /// 解析单个峰的边界
    pub fn resolve(&self, series: &SignalSeries, peak: &Peak) -> PeakBoundary {
        let y = series.intensities();
        let boundary_height = peak.height - peak.prominence * self.rel_height;
        let (left_ip, right_ip) = interpolated_crossings(
            y,
            peak.index,
            boundary_height,
            peak.left_base,
            peak.right_base,
        );

        // 分数位置非负，as usize 即向下取整
        let left_index = (left_ip.floor() as usize).clamp(peak.left_base, peak.index);
        let right_index = (right_ip.floor() as usize).clamp(peak.index, peak.right_base);

        PeakBoundary {
            peak_index: peak.index,
            left_index,
            right_index,
            left_ip,
            right_ip,
            boundary_height,
        }
    }

    /// 按输入顺序解析全部峰
    pub fn resolve_all(&self, series: &SignalSeries, peaks: &[Peak]) -> Vec<PeakBoundary> {
        peaks.iter().map(|p| self.resolve(series, p)).collect()
    }
}

/// 在 `[left_base, right_base]` 内求阈值的左右插值交叉位置
///
/// 从峰顶向外扫描，遇到 `<= threshold` 的样本即停止；若该样本严格低于
/// 阈值，则向内侧相邻样本线性插值。未找到交叉时返回对应谷底索引。
pub(crate) fn interpolated_crossings(
    y: &[f64],
    peak: usize,
    threshold: f64,
    left_base: usize,
    right_base: usize,
) -> (f64, f64) {
    let mut i = peak;
    while left_base < i && threshold < y[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if y[i] < threshold {
        // y[i+1] > threshold > y[i]，分母严格为正
        left_ip += (threshold - y[i]) / (y[i + 1] - y[i]);
    }

    let mut i = peak;
    while i < right_base && threshold < y[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if y[i] < threshold {
        right_ip -= (threshold - y[i]) / (y[i - 1] - y[i]);
    }

    (left_ip, right_ip)
}
