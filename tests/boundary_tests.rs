//! 边界和异常测试
//!
//! 测试平台峰、序列端点、退化窗口等边界条件

mod signal_test_fixtures;

use radio_hplc_purity::core::{
    AreaIntegrator, BoundaryResolver, DecayCorrector, DetectionConfig, PeakDetector,
    PurityOutcome, PurityReporter, SignalSeries, analyze,
};
use signal_test_fixtures::{log, uniform_times};

fn series(y: &[f64]) -> SignalSeries {
    SignalSeries::from_elapsed_seconds(uniform_times(y.len(), 1.0), y.to_vec()).unwrap()
}

fn permissive() -> DetectionConfig {
    DetectionConfig {
        min_height: 0.0,
        min_distance: 1,
        min_prominence: 0.0,
        min_width: 0.0,
        rel_height: 0.5,
    }
}

fn detect_indices(y: &[f64], config: DetectionConfig) -> Vec<usize> {
    PeakDetector::new(config)
        .unwrap()
        .detect(&series(y))
        .iter()
        .map(|p| p.index)
        .collect()
}

/// 奇数长度平台取中点
#[test]
fn test_plateau_peak_midpoint() {
    log("平台峰中点", "Plateau peak midpoint");

    let peaks = PeakDetector::new(permissive())
        .unwrap()
        .detect(&series(&[0.0, 1.0, 5.0, 5.0, 5.0, 1.0, 0.0]));
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 3);
    assert_eq!((peaks[0].plateau_left, peaks[0].plateau_right), (2, 4));
}

/// 偶数长度平台向下取整
#[test]
fn test_even_plateau_rounds_down() {
    assert_eq!(detect_indices(&[0.0, 5.0, 5.0, 0.0], permissive()), vec![1]);
}

/// 序列端点和延伸到末端的平台不构成峰
#[test]
fn test_edges_are_never_peaks() {
    log("端点不是峰", "Edges are never peaks");

    assert!(detect_indices(&[9.0, 1.0, 0.0, 1.0, 9.0], permissive()).is_empty());
    assert!(detect_indices(&[0.0, 1.0, 5.0, 5.0], permissive()).is_empty());
    assert!(detect_indices(&[1.0, 2.0, 3.0, 4.0], permissive()).is_empty());
}

/// 高度阈值为闭区间
#[test]
fn test_height_threshold_is_inclusive() {
    let y = [0.0, 20.0, 0.0, 19.9, 0.0];
    let config = DetectionConfig {
        min_height: 20.0,
        ..permissive()
    };
    assert_eq!(detect_indices(&y, config), vec![1]);
}

/// 突出度以较高的一侧谷底为准
#[test]
fn test_prominence_uses_higher_base() {
    // 峰3左侧谷底2，右侧谷底0：突出度 = 8 - 2
    let y = [0.0, 10.0, 2.0, 8.0, 0.0];
    let peaks = PeakDetector::new(permissive()).unwrap().detect(&series(&y));
    let peak = peaks.iter().find(|p| p.index == 3).unwrap();
    assert_eq!(peak.prominence, 6.0);
    assert_eq!(peak.left_base, 2);
    assert_eq!(peak.right_base, 4);

    let strict = DetectionConfig {
        min_prominence: 7.0,
        ..permissive()
    };
    assert_eq!(detect_indices(&y, strict), vec![1]);
}

/// 等高峰冲突时保留索引较小的
#[test]
fn test_equal_height_tie_keeps_lower_index() {
    let y = [0.0, 10.0, 0.0, 10.0, 0.0];
    let config = DetectionConfig {
        min_distance: 3,
        ..permissive()
    };
    assert_eq!(detect_indices(&y, config), vec![1]);
}

/// 尖峰配合很小的rel_height：窗口只含一个样本，面积为零
#[test]
fn test_degenerate_window_yields_zero_total() {
    log("退化窗口", "Degenerate window");

    let s = series(&[0.0, 0.0, 10.0, 0.0, 0.0]);
    let config = DetectionConfig {
        rel_height: 0.01,
        ..permissive()
    };
    let output = analyze(&s, &config, 0.0).unwrap();

    assert_eq!(output.peaks.len(), 1);
    assert_eq!(output.boundaries[0].window(), 1..2);
    assert_eq!(output.report.outcome, PurityOutcome::ZeroTotalArea);
    assert!(output.report.is_degenerate());
    assert_eq!(output.report.results[0].percentage_of_total, 0.0);
}

/// rel_height = 1 时边界落在谷底
#[test]
fn test_full_relative_height_reaches_bases() {
    let s = series(&[3.0, 1.0, 4.0, 9.0, 4.0, 2.0, 6.0]);
    let peaks = PeakDetector::new(permissive()).unwrap().detect(&s);
    let peak = peaks.iter().find(|p| p.index == 3).unwrap();

    let boundary = BoundaryResolver::new(1.0).unwrap().resolve(&s, peak);
    assert_eq!(boundary.boundary_height, 2.0);
    // 左侧在1和2之间插值：1 + (2-1)/(4-1)
    assert!((boundary.left_ip - 4.0 / 3.0).abs() < 1e-12);
    assert_eq!(boundary.right_ip, 5.0);
    assert_eq!(boundary.window(), 1..5);
}

#[test]
fn test_rel_height_out_of_range_rejected() {
    assert!(BoundaryResolver::new(0.0).is_err());
    assert!(BoundaryResolver::new(1.5).is_err());
    assert!(BoundaryResolver::new(f64::NAN).is_err());
    assert_eq!(BoundaryResolver::new(1.0).unwrap().rel_height(), 1.0);

    let detector = PeakDetector::new(permissive()).unwrap();
    assert_eq!(detector.config(), &permissive());
    assert!(
        PeakDetector::new(DetectionConfig {
            rel_height: 2.0,
            ..permissive()
        })
        .is_err()
    );
}

/// 平坦窗口衰变校正：越早的样本校正后越小，末端不变
#[test]
fn test_flat_window_decay_is_monotone() {
    let corrector = DecayCorrector::new(0.01).unwrap();
    let x = [0.0, 10.0, 20.0, 35.0, 60.0];
    let corrected = corrector.correct(&x, &[100.0; 5]);

    assert!(corrected.windows(2).all(|w| w[0] <= w[1]), "{corrected:?}");
    assert_eq!(corrected[4], 100.0);
    assert!((corrected[0] - 100.0 * (-0.6f64).exp()).abs() < 1e-9);
}

#[test]
fn test_integrator_edge_cases() {
    assert_eq!(AreaIntegrator::integrate(&[], &[]), 0.0);
    assert_eq!(AreaIntegrator::integrate(&[1.0], &[5.0]), 0.0);
    // 非均匀间隔
    let area = AreaIntegrator::integrate(&[0.0, 1.0, 4.0], &[2.0, 4.0, 0.0]);
    assert!((area - (3.0 + 6.0)).abs() < 1e-12);
}

#[test]
fn test_reporter_empty_and_zero() {
    let empty = PurityReporter::report(&[]);
    assert_eq!(empty.outcome, PurityOutcome::NoPeaksDetected);
    assert!(empty.results.is_empty());

    let zero = PurityReporter::report(&[(1, 0.0, 0.0), (2, 0.0, 0.0)]);
    assert_eq!(zero.outcome, PurityOutcome::ZeroTotalArea);
    assert!(zero.results.iter().all(|r| r.percentage_of_total == 0.0));
}

/// 负基线信号：阈值允许为负
#[test]
fn test_negative_baseline_signal() {
    let y = [-5.0, -5.0, -1.0, 3.0, -1.0, -5.0, -5.0];
    let config = DetectionConfig {
        min_height: -10.0,
        ..permissive()
    };
    assert_eq!(detect_indices(&y, config), vec![3]);
}
