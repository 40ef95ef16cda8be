//! Radio-HPLC Peak Purity Analyzer
//!
//! 放射性检测器色谱曲线的峰检测与衰变校正纯度计算。
//!
//! ## 核心特性
//! - 局部极大值扫描（含平台峰）+ 高度/突出度/宽度/最小间距过滤
//! - 基于突出度的相对高度边界解析（线性插值交叉点）
//! - 放射性衰变校正：λ = ln2 / T½，窗口末端或运行起点参考
//! - 非均匀梯形积分（x轴为经过秒数）
//! - 各峰校正面积占比（放射化学纯度）
//! - CSV输入（Shift_JIS/UTF-8）、文本/表格/JSON报告、多文件并行批处理

pub mod core;
pub mod error;
pub mod tools;

// 重新导出核心类型
pub use core::{
    DecayReference, DetectionConfig, Isotope, Peak, PeakBoundary, PeakResult, PipelineOutput,
    PurityOutcome, PurityReport, SignalSeries, analyze, analyze_with_reference,
};
pub use error::{AnalysisError, AnalysisResult};
