//! 峰检测配置
//!
//! 核心层不提供默认值：各阈值必须由调用方按仪器调校后传入。
//! 命令行工具的默认值见 `tools::constants::detection_defaults`。

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// 峰检测与边界解析参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// 最小峰高（强度单位）
    pub min_height: f64,

    /// 相邻保留峰之间的最小样本间距
    pub min_distance: usize,

    /// 最小突出度（强度单位）
    pub min_prominence: f64,

    /// 半突出度处的最小宽度（样本数）
    pub min_width: f64,

    /// 边界解析的相对高度，取值 (0, 1]
    pub rel_height: f64,
}

impl DetectionConfig {
    /// 校验所有字段的取值范围
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.min_height.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_height必须为有限值 / min_height must be finite: {}",
                self.min_height
            )));
        }
        if !self.min_prominence.is_finite() || self.min_prominence < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_prominence必须为非负有限值 / min_prominence must be finite and >= 0: {}",
                self.min_prominence
            )));
        }
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_width必须为非负有限值 / min_width must be finite and >= 0: {}",
                self.min_width
            )));
        }
        if !(self.rel_height > 0.0 && self.rel_height <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "rel_height必须位于(0, 1] / rel_height must be in (0, 1]: {}",
                self.rel_height
            )));
        }
        Ok(())
    }
}
