//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 峰检测默认参数（针对RI6放射性检测器通道调校）
///
/// 核心层不带默认值；这些数值只在命令行工具中作为起点，
/// 可被 `--config` JSON 文件和单项命令行参数覆盖。
pub mod detection_defaults {
    /// 最小峰高
    pub const MIN_HEIGHT: f64 = 20.0;

    /// 最小峰间距（样本数）
    pub const MIN_DISTANCE: usize = 10;

    /// 最小突出度
    pub const MIN_PROMINENCE: f64 = 5.0;

    /// 半突出度最小宽度（样本数）
    pub const MIN_WIDTH: f64 = 5.0;

    /// 边界相对高度
    ///
    /// 0.88 使边界接近峰的局部基线而非零点
    pub const REL_HEIGHT: f64 = 0.88;
}

/// 检测器导出CSV的默认布局
pub mod input_defaults {
    /// 时间戳列名（检测器软件导出的“日時”列）
    pub const TIME_COLUMN: &str = "日時";

    /// 信号列名匹配片段（首个包含该片段的列）
    pub const SIGNAL_COLUMN_HINT: &str = "RI6";

    /// 时间戳格式（解析前将 `;` 替换为 `:`）
    pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    /// 非UTF-8文件的回退编码
    pub const ENCODING: &str = "shift_jis";

    /// 默认核素
    pub const ISOTOPE: &str = "18F";

    /// 支持的输入扩展名
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv"];
}

/// 默认配置值
pub mod defaults {
    /// 默认多文件并行并发度
    ///
    /// 4并发度在多数场景下提供良好的性能/资源平衡
    pub const PARALLEL_FILES_DEGREE: usize = 4;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 单个色谱文件很小，超过16个并发只会增加调度开销
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}
