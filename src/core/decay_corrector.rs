//! 放射性衰变校正模块
//!
//! 衰变常数 `λ = ln2 / T½`。窗口内每个样本按
//! `y[i] * exp(λ (x[i] - T))` 归一化到窗口末端（衰变最多的时刻），
//! 其中 `x` 为相对窗口首样本的经过秒数，`T = x[last]`。
//!
//! 另一种参考点（运行起点 → 峰顶时刻）通过 [`DecayReference::RunStart`]
//! 显式选择，两者不等价。

use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 常用正电子核素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Isotope {
    /// 氟-18
    F18,
    /// 碳-11
    C11,
    /// 氮-13
    N13,
    /// 氧-15
    O15,
    /// 镓-68
    Ga68,
    /// 铜-64
    Cu64,
}

impl Isotope {
    pub const ALL: [Isotope; 6] = [
        Isotope::F18,
        Isotope::C11,
        Isotope::N13,
        Isotope::O15,
        Isotope::Ga68,
        Isotope::Cu64,
    ];

    /// 半衰期（分钟）
    pub fn half_life_minutes(&self) -> f64 {
        match self {
            Isotope::F18 => 110.0,
            Isotope::C11 => 20.33,
            Isotope::N13 => 9.965,
            Isotope::O15 => 2.04,
            Isotope::Ga68 => 67.71,
            Isotope::Cu64 => 12.7 * 60.0,
        }
    }

    #[inline]
    pub fn half_life_seconds(&self) -> f64 {
        self.half_life_minutes() * 60.0
    }

    /// 衰变常数（1/秒）
    #[inline]
    pub fn decay_constant(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_seconds()
    }

    /// 显示标签（质量数在前，与检测器软件一致）
    pub fn label(&self) -> &'static str {
        match self {
            Isotope::F18 => "18F",
            Isotope::C11 => "11C",
            Isotope::N13 => "13N",
            Isotope::O15 => "15O",
            Isotope::Ga68 => "68Ga",
            Isotope::Cu64 => "64Cu",
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Isotope {
    type Err = AnalysisError;

    /// 接受 `18F` / `F18` / `F-18` / `f-18` 等写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        Isotope::ALL
            .into_iter()
            .find(|iso| {
                let label = iso.label().to_ascii_uppercase();
                let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
                let symbol: String = label.chars().filter(|c| c.is_ascii_alphabetic()).collect();
                normalized == label || normalized == format!("{symbol}{digits}")
            })
            .ok_or_else(|| {
                let known: Vec<&str> = Isotope::ALL.iter().map(|i| i.label()).collect();
                AnalysisError::InvalidConfig(format!(
                    "未知核素 / unknown isotope '{s}' (supported: {})",
                    known.join(", ")
                ))
            })
    }
}

/// 由半衰期（秒）计算衰变常数
pub fn decay_constant_from_half_life(half_life_seconds: f64) -> AnalysisResult<f64> {
    if !half_life_seconds.is_finite() || half_life_seconds <= 0.0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "半衰期必须为正有限值 / half-life must be positive and finite: {half_life_seconds}"
        )));
    }
    Ok(std::f64::consts::LN_2 / half_life_seconds)
}

/// 衰变校正的参考时刻
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DecayReference {
    /// 归一化到每个积分窗口自身的末端
    #[default]
    WindowEnd,

    /// 以运行起点为参考，按峰顶时刻整体乘以 `exp(λ t_peak)`
    RunStart,
}

impl FromStr for DecayReference {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "window-end" | "window_end" | "window" => Ok(DecayReference::WindowEnd),
            "run-start" | "run_start" | "run" => Ok(DecayReference::RunStart),
            _ => Err(AnalysisError::InvalidConfig(format!(
                "未知衰变参考 / unknown decay reference '{s}' (window-end | run-start)"
            ))),
        }
    }
}

impl fmt::Display for DecayReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecayReference::WindowEnd => f.write_str("window-end"),
            DecayReference::RunStart => f.write_str("run-start"),
        }
    }
}

/// 衰变校正器
#[derive(Debug, Clone, Copy)]
pub struct DecayCorrector {
    decay_constant: f64,
}

impl DecayCorrector {
    /// `decay_constant` 必须为非负有限值；0 表示不校正
    pub fn new(decay_constant: f64) -> AnalysisResult<Self> {
        if !decay_constant.is_finite() || decay_constant < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "衰变常数必须为非负有限值 / decay constant must be finite and >= 0: {decay_constant}"
            )));
        }
        Ok(Self { decay_constant })
    }

    pub fn from_isotope(isotope: Isotope) -> Self {
        Self {
            decay_constant: isotope.decay_constant(),
        }
    }

    #[inline]
    pub fn decay_constant(&self) -> f64 {
        self.decay_constant
    }

    /// 窗口末端参考校正
    ///
    /// `x` 为相对窗口首样本的经过秒数（升序），长度须与 `y` 相同。
    pub fn correct(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), y.len());
        let Some(&end) = x.last() else {
            return Vec::new();
        };
        x.iter()
            .zip(y)
            .map(|(&xi, &yi)| yi * (self.decay_constant * (xi - end)).exp())
            .collect()
    }

    /// 运行起点参考校正：整个窗口乘以同一因子 `exp(λ t_peak)`
    ///
    /// `peak_elapsed` 为峰顶相对运行起点的经过秒数。
    pub fn correct_from_run_start(&self, peak_elapsed: f64, y: &[f64]) -> Vec<f64> {
        let factor = (self.decay_constant * peak_elapsed).exp();
        y.iter().map(|&yi| yi * factor).collect()
    }
}
