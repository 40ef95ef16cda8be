//! 峰面积积分模块
//!
//! 非均匀间隔梯形积分，x 轴为经过秒数。

/// 梯形积分器
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaIntegrator;

impl AreaIntegrator {
    /// 梯形法则积分
    ///
    /// 少于2个样本时返回0.0；相邻x相等的区间面积为0，不做除法。
    pub fn integrate(x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        if n < 2 {
            return 0.0;
        }

        x[..n]
            .windows(2)
            .zip(y[..n].windows(2))
            .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
            .sum()
    }
}
