//! 核心算法模块
//!
//! 峰检测、边界解析、衰变校正、面积积分与纯度汇总。

pub mod area_integrator;
pub mod boundary_resolver;
pub mod decay_corrector;
pub mod detection_config;
pub mod peak_detector;
pub mod pipeline;
pub mod purity_reporter;
pub mod signal_series;

// 重新导出公共接口
pub use area_integrator::AreaIntegrator;
pub use boundary_resolver::{BoundaryResolver, PeakBoundary};
pub use decay_corrector::{DecayCorrector, DecayReference, Isotope, decay_constant_from_half_life};
pub use detection_config::DetectionConfig;
pub use peak_detector::{Peak, PeakDetector};
pub use pipeline::{PipelineOutput, analyze, analyze_with_reference};
pub use purity_reporter::{PeakResult, PurityOutcome, PurityReport, PurityReporter};
pub use signal_series::SignalSeries;
