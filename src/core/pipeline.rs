//! 峰检测与衰变校正积分流水线
//!
//! `SignalSeries → PeakDetector → BoundaryResolver → DecayCorrector →
//! AreaIntegrator → PurityReporter`
//!
//! 纯函数：不做I/O、不持有跨调用状态，可在多个线程中独立调用。

use super::area_integrator::AreaIntegrator;
use super::boundary_resolver::{BoundaryResolver, PeakBoundary};
use super::decay_corrector::{DecayCorrector, DecayReference};
use super::detection_config::DetectionConfig;
use super::peak_detector::{Peak, PeakDetector};
use super::purity_reporter::{PeakResult, PurityReport, PurityReporter};
use super::signal_series::SignalSeries;
use crate::error::AnalysisResult;
use serde::Serialize;

/// 流水线输出：峰、边界（供叠加绘制）与纯度报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub peaks: Vec<Peak>,
    pub boundaries: Vec<PeakBoundary>,
    pub report: PurityReport,
    pub decay_constant: f64,
    pub decay_reference: DecayReference,
}

impl PipelineOutput {
    /// 逐峰遍历 (峰, 边界, 结果)，三者长度一致
    pub fn rows(&self) -> impl Iterator<Item = (&Peak, &PeakBoundary, &PeakResult)> {
        self.peaks
            .iter()
            .zip(&self.boundaries)
            .zip(&self.report.results)
            .map(|((p, b), r)| (p, b, r))
    }
}

/// 以窗口末端为衰变参考运行完整流水线
pub fn analyze(
    series: &SignalSeries,
    config: &DetectionConfig,
    decay_constant: f64,
) -> AnalysisResult<PipelineOutput> {
    analyze_with_reference(series, config, decay_constant, DecayReference::WindowEnd)
}

/// 指定衰变参考运行完整流水线
///
/// 配置或衰变常数无效时立即返回错误，不产生部分结果。
pub fn analyze_with_reference(
    series: &SignalSeries,
    config: &DetectionConfig,
    decay_constant: f64,
    reference: DecayReference,
) -> AnalysisResult<PipelineOutput> {
    let detector = PeakDetector::new(*config)?;
    let resolver = BoundaryResolver::new(config.rel_height)?;
    let corrector = DecayCorrector::new(decay_constant)?;

    let peaks = detector.detect(series);
    let boundaries = resolver.resolve_all(series, &peaks);

    let elapsed = series.elapsed_seconds();
    let intensities = series.intensities();

    let areas: Vec<(usize, f64, f64)> = boundaries
        .iter()
        .enumerate()
        .map(|(i, boundary)| {
            let window = boundary.window();
            let origin = elapsed[boundary.left_index];
            let x: Vec<f64> = elapsed[window.clone()].iter().map(|t| t - origin).collect();
            let y = &intensities[window];

            let corrected_y = match reference {
                DecayReference::WindowEnd => corrector.correct(&x, y),
                DecayReference::RunStart => {
                    corrector.correct_from_run_start(elapsed[boundary.peak_index], y)
                }
            };

            let original_area = AreaIntegrator::integrate(&x, y);
            let corrected_area = AreaIntegrator::integrate(&x, &corrected_y);
            (i + 1, original_area, corrected_area)
        })
        .collect();

    let report = PurityReporter::report(&areas);
    if peaks.is_empty() {
        log::info!(
            "{}个样本中未检测到峰 / no peaks detected in {} samples",
            series.len(),
            series.len()
        );
    }

    Ok(PipelineOutput {
        peaks,
        boundaries,
        report,
        decay_constant,
        decay_reference: reference,
    })
}
