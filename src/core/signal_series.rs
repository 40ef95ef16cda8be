//! 检测器信号序列
//!
//! 单通道放射性检测器强度样本 + 严格递增的时间轴。
//! 构造时完成全部校验，之后不可变，流水线各阶段只读访问。

use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDateTime;

/// 有序的 (时间戳, 强度) 样本序列
///
/// 时间以相对首个样本的经过秒数存储；若来源是挂钟时间戳，
/// 则同时保留起始时刻，供报告显示保留时间。
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    elapsed: Vec<f64>,
    intensities: Vec<f64>,
    start_time: Option<NaiveDateTime>,
}

impl SignalSeries {
    /// 从挂钟时间戳创建序列（CSV输入路径）
    pub fn from_timestamps(
        timestamps: Vec<NaiveDateTime>,
        intensities: Vec<f64>,
    ) -> AnalysisResult<Self> {
        let Some(&start) = timestamps.first() else {
            return Err(AnalysisError::InvalidSeries(
                "序列至少需要1个样本 / series needs at least 1 sample".to_string(),
            ));
        };

        let elapsed = timestamps
            .iter()
            .map(|t| {
                let delta = *t - start;
                // 微秒精度在数天的运行时长内都不会溢出
                match delta.num_microseconds() {
                    Some(us) => us as f64 / 1_000_000.0,
                    None => delta.num_milliseconds() as f64 / 1000.0,
                }
            })
            .collect();

        let mut series = Self::from_elapsed_seconds(elapsed, intensities)?;
        series.start_time = Some(start);
        Ok(series)
    }

    /// 从经过秒数创建序列（合成数据或已换算的输入）
    pub fn from_elapsed_seconds(times: Vec<f64>, intensities: Vec<f64>) -> AnalysisResult<Self> {
        if times.is_empty() {
            return Err(AnalysisError::InvalidSeries(
                "序列至少需要1个样本 / series needs at least 1 sample".to_string(),
            ));
        }
        if times.len() != intensities.len() {
            return Err(AnalysisError::InvalidSeries(format!(
                "时间戳数量({})与强度数量({})不一致 / timestamp and intensity counts differ",
                times.len(),
                intensities.len()
            )));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(AnalysisError::InvalidSeries(format!(
                "第{i}个时间值非有限 / non-finite time at sample {i}"
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnalysisError::InvalidSeries(format!(
                "时间戳必须严格递增 / timestamps must be strictly increasing (sample {} -> {})",
                i,
                i + 1
            )));
        }
        if let Some(i) = intensities.iter().position(|y| !y.is_finite()) {
            return Err(AnalysisError::InvalidSeries(format!(
                "第{i}个强度值非有限 / non-finite intensity at sample {i}: {}",
                intensities[i]
            )));
        }

        // 统一以首个样本为零点
        let t0 = times[0];
        let elapsed = times.into_iter().map(|t| t - t0).collect();

        Ok(Self {
            elapsed,
            intensities,
            start_time: None,
        })
    }

    /// 样本数量
    #[inline]
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    /// 构造保证至少1个样本，恒为false
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    #[inline]
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// 相对首个样本的经过秒数
    #[inline]
    pub fn elapsed_seconds(&self) -> &[f64] {
        &self.elapsed
    }

    /// 运行起始的挂钟时刻（仅当由时间戳构造时存在）
    #[inline]
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    /// 第 `index` 个样本的挂钟时刻
    pub fn timestamp(&self, index: usize) -> Option<NaiveDateTime> {
        let start = self.start_time?;
        let secs = *self.elapsed.get(index)?;
        let micros = (secs * 1_000_000.0).round() as i64;
        Some(start + chrono::TimeDelta::microseconds(micros))
    }

    /// 整个运行的时长（秒）
    #[inline]
    pub fn duration_seconds(&self) -> f64 {
        self.elapsed.last().copied().unwrap_or(0.0)
    }
}
