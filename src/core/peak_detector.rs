//! 峰检测模块
//!
//! 在单通道检测器信号中定位候选峰，并依次按高度、突出度、宽度、
//! 最小间距过滤。
//!
//! ## 过滤顺序
//!
//! 1. 局部极大值扫描（含平台峰，取平台中点）
//! 2. 高度过滤：`intensity >= min_height`
//! 3. 突出度计算与过滤：`prominence >= min_prominence`
//! 4. 半突出度宽度过滤：`width >= min_width`
//! 5. 最小间距：强度降序贪心保留，强度相同时索引小者优先
//!
//! 最终按索引升序返回。

use super::boundary_resolver::interpolated_crossings;
use super::detection_config::DetectionConfig;
use super::signal_series::SignalSeries;
use crate::error::AnalysisResult;
use serde::Serialize;

/// 宽度过滤固定使用的相对高度（半突出度）
const WIDTH_FILTER_REL_HEIGHT: f64 = 0.5;

/// 通过全部过滤的峰
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    /// 峰顶在序列中的索引（平台峰为平台中点）
    pub index: usize,

    /// 峰顶强度
    pub height: f64,

    /// 突出度：峰顶强度减去两侧谷底中较高者
    pub prominence: f64,

    /// 左侧谷底索引
    pub left_base: usize,

    /// 右侧谷底索引
    pub right_base: usize,

    /// 平台左边缘（尖峰时等于 `index`）
    pub plateau_left: usize,

    /// 平台右边缘（尖峰时等于 `index`）
    pub plateau_right: usize,

    /// 半突出度处的插值宽度（样本数）
    pub width: f64,
}

/// 局部极大值候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    index: usize,
    plateau_left: usize,
    plateau_right: usize,
}

/// 峰检测器
#[derive(Debug, Clone)]
pub struct PeakDetector {
    config: DetectionConfig,
}

impl PeakDetector {
    /// 创建检测器（配置在此处校验）
    pub fn new(config: DetectionConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// 检测信号中的峰，按索引升序返回
    pub fn detect(&self, series: &SignalSeries) -> Vec<Peak> {
        let y = series.intensities();
        if y.len() < 3 {
            log::debug!("样本数不足3个，跳过峰检测 / fewer than 3 samples, no peaks");
            return Vec::new();
        }

        let candidates = find_local_maxima(y);
        let maxima_count = candidates.len();

        let mut peaks: Vec<Peak> = candidates
            .into_iter()
            .filter(|c| y[c.index] >= self.config.min_height)
            .filter_map(|c| {
                let (prominence, left_base, right_base) = peak_prominence(y, c.index);
                (prominence >= self.config.min_prominence).then_some(Peak {
                    index: c.index,
                    height: y[c.index],
                    prominence,
                    left_base,
                    right_base,
                    plateau_left: c.plateau_left,
                    plateau_right: c.plateau_right,
                    width: 0.0,
                })
            })
            .collect();

        for peak in &mut peaks {
            let threshold = peak.height - peak.prominence * WIDTH_FILTER_REL_HEIGHT;
            let (left_ip, right_ip) = interpolated_crossings(
                y,
                peak.index,
                threshold,
                peak.left_base,
                peak.right_base,
            );
            peak.width = right_ip - left_ip;
        }
        peaks.retain(|p| p.width >= self.config.min_width);

        let before_distance = peaks.len();
        let peaks = enforce_min_distance(peaks, self.config.min_distance);

        log::debug!(
            "峰检测 / peak detection: maxima={maxima_count}, filtered={before_distance}, kept={}",
            peaks.len()
        );

        peaks
    }
}

/// 扫描局部极大值（含两侧严格更低的平台）
fn find_local_maxima(y: &[f64]) -> Vec<Candidate> {
    let n = y.len();
    let mut candidates = Vec::new();
    let mut i = 1;

    while i + 1 < n {
        if y[i - 1] < y[i] {
            let mut ahead = i + 1;
            while ahead + 1 < n && y[ahead] == y[i] {
                ahead += 1;
            }

            // 平台延伸到序列末端时 y[ahead] == y[i]，不构成极大值
            if y[ahead] < y[i] {
                let plateau_left = i;
                let plateau_right = ahead - 1;
                candidates.push(Candidate {
                    index: (plateau_left + plateau_right) / 2,
                    plateau_left,
                    plateau_right,
                });
                i = ahead;
            }
        }
        i += 1;
    }

    candidates
}

/// 计算突出度及左右谷底索引
///
/// 从峰顶向两侧扫描，直到序列边界或遇到严格更高的样本；
/// 谷底取扫描范围内的最小值位置（距峰顶最近的那个）。
fn peak_prominence(y: &[f64], peak: usize) -> (f64, usize, usize) {
    let apex = y[peak];

    let mut left_min = apex;
    let mut left_base = peak;
    let mut i = peak;
    loop {
        if y[i] > apex {
            break;
        }
        if y[i] < left_min {
            left_min = y[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = apex;
    let mut right_base = peak;
    for (j, &v) in y.iter().enumerate().skip(peak) {
        if v > apex {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = j;
        }
    }

    (apex - left_min.max(right_min), left_base, right_base)
}

/// 贪心最小间距：强度高者优先，强度相同时索引小者优先
///
/// 输入需按索引升序，输出同样按索引升序。
fn enforce_min_distance(peaks: Vec<Peak>, min_distance: usize) -> Vec<Peak> {
    if min_distance <= 1 || peaks.len() < 2 {
        return peaks;
    }

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        peaks[b]
            .height
            .total_cmp(&peaks[a].height)
            .then(peaks[a].index.cmp(&peaks[b].index))
    });

    let mut keep = vec![true; peaks.len()];
    for &k in &order {
        if !keep[k] {
            continue;
        }
        let center = peaks[k].index;

        let mut j = k;
        while j > 0 {
            j -= 1;
            if center - peaks[j].index >= min_distance {
                break;
            }
            keep[j] = false;
        }

        for j in (k + 1)..peaks.len() {
            if peaks[j].index - center >= min_distance {
                break;
            }
            keep[j] = false;
        }
    }

    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(y: &[f64]) -> SignalSeries {
        let t = (0..y.len()).map(|i| i as f64).collect();
        SignalSeries::from_elapsed_seconds(t, y.to_vec()).unwrap()
    }

    fn permissive() -> DetectionConfig {
        DetectionConfig {
            min_height: f64::MIN,
            min_distance: 1,
            min_prominence: 0.0,
            min_width: 0.0,
            rel_height: 0.5,
        }
    }

    #[test]
    fn test_sharp_maxima() {
        let c = find_local_maxima(&[0.0, 2.0, 1.0, 3.0, 0.0]);
        let idx: Vec<usize> = c.iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![1, 3]);
    }

    #[test]
    fn test_plateau_midpoint_floor() {
        let c = find_local_maxima(&[0.0, 5.0, 5.0, 5.0, 5.0, 1.0]);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].index, 2);
        assert_eq!(c[0].plateau_left, 1);
        assert_eq!(c[0].plateau_right, 4);
    }

    #[test]
    fn test_plateau_touching_end_is_not_peak() {
        assert!(find_local_maxima(&[0.0, 1.0, 3.0, 3.0, 3.0]).is_empty());
        assert!(find_local_maxima(&[3.0, 3.0, 1.0, 0.0]).is_empty());
    }

    #[test]
    fn test_prominence_and_bases() {
        //            0    1    2    3    4    5    6
        let y = [1.0, 4.0, 2.0, 6.0, 0.5, 3.0, 2.0];
        let (prom, lb, rb) = peak_prominence(&y, 1);
        // 左侧最低1.0，右侧在遇到6.0前最低2.0 => 4 - 2
        assert_eq!(prom, 2.0);
        assert_eq!(lb, 0);
        assert_eq!(rb, 2);

        let (prom, lb, rb) = peak_prominence(&y, 3);
        assert_eq!(prom, 6.0 - 1.0);
        assert_eq!(lb, 0);
        assert_eq!(rb, 4);
    }

    #[test]
    fn test_height_filter_keeps_equal() {
        let cfg = DetectionConfig {
            min_height: 4.0,
            ..permissive()
        };
        let peaks = PeakDetector::new(cfg)
            .unwrap()
            .detect(&series(&[0.0, 4.0, 0.0, 3.0, 0.0]));
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].index, 1);
    }

    #[test]
    fn test_distance_tie_prefers_lower_index() {
        let cfg = DetectionConfig {
            min_distance: 3,
            ..permissive()
        };
        let peaks = PeakDetector::new(cfg)
            .unwrap()
            .detect(&series(&[0.0, 5.0, 0.0, 5.0, 0.0, 0.0]));
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].index, 1);
    }

    #[test]
    fn test_distance_chain() {
        // 中间峰最高：去掉两侧；若按索引顺序处理会保留错误的峰
        let cfg = DetectionConfig {
            min_distance: 3,
            ..permissive()
        };
        let y = [0.0, 4.0, 0.0, 9.0, 0.0, 4.0, 0.0, 0.0, 7.0, 0.0];
        let peaks = PeakDetector::new(cfg).unwrap().detect(&series(&y));
        let idx: Vec<usize> = peaks.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![3, 8]);
    }

    #[test]
    fn test_width_filter() {
        let narrow = [0.0, 0.0, 10.0, 0.0, 0.0];
        let cfg = DetectionConfig {
            min_width: 2.0,
            ..permissive()
        };
        assert!(PeakDetector::new(cfg).unwrap().detect(&series(&narrow)).is_empty());

        let cfg = DetectionConfig {
            min_width: 1.0,
            ..permissive()
        };
        let peaks = PeakDetector::new(cfg).unwrap().detect(&series(&narrow));
        assert_eq!(peaks.len(), 1);
        assert!((peaks[0].width - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_and_flat_series() {
        let det = PeakDetector::new(permissive()).unwrap();
        assert!(det.detect(&series(&[1.0, 2.0])).is_empty());
        assert!(det.detect(&series(&[3.0; 20])).is_empty());
    }
}
