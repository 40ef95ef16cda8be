//! 统一错误处理框架
//!
//! 分析流水线与输入/输出工具共用的错误类型定义。
//! `ZeroTotalArea` 与 `NoPeaksDetected` 属于合法的分析结果，
//! 由 [`crate::core::PurityOutcome`] 表达，不在此处建模。

use std::fmt;
use std::io;

/// 色谱分析相关的统一错误类型
#[derive(Debug)]
pub enum AnalysisError {
    /// 信号序列无效（空序列、时间戳非严格递增、强度非有限值）
    InvalidSeries(String),

    /// 检测配置或衰变参数超出取值范围
    InvalidConfig(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 输入格式错误（CSV解析、文本编码、列定位、时间戳解析）
    FormatError(String),

    /// 资源访问错误（线程池创建等）
    ResourceError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidSeries(msg) => write!(f, "信号序列无效 / Invalid series: {msg}"),
            AnalysisError::InvalidConfig(msg) => {
                write!(f, "配置无效 / Invalid configuration: {msg}")
            }
            AnalysisError::IoError(err) => write!(f, "文件I/O错误 / I/O error: {err}"),
            AnalysisError::FormatError(msg) => write!(f, "输入格式错误 / Format error: {msg}"),
            AnalysisError::ResourceError(msg) => {
                write!(f, "资源访问错误 / Resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AnalysisError {
    fn from(err: io::Error) -> Self {
        AnalysisError::IoError(err)
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::FormatError(format!("CSV解析错误 / CSV parse error: {err}"))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AnalysisError::IoError(io::Error::other(err))
        } else {
            AnalysisError::InvalidConfig(format!("JSON配置错误 / JSON config error: {err}"))
        }
    }
}

/// 分析操作的标准Result类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;

// ==================== 错误转换Helper函数 ====================

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> AnalysisError {
    AnalysisError::FormatError(format!("{context}: {err}"))
}

/// 创建配置错误的helper函数
#[inline]
pub fn config_error<E: fmt::Display>(context: &str, err: E) -> AnalysisError {
    AnalysisError::InvalidConfig(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 输入文件格式相关错误（编码、列缺失、时间戳无法解析）
    Format,
    /// 信号数据本身不满足流水线前提
    Series,
    /// 配置相关错误
    Config,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从AnalysisError提取错误类别
    pub fn from_analysis_error(e: &AnalysisError) -> Self {
        match e {
            AnalysisError::FormatError(_) => Self::Format,
            AnalysisError::InvalidSeries(_) => Self::Series,
            AnalysisError::InvalidConfig(_) => Self::Config,
            AnalysisError::IoError(_) => Self::Io,
            AnalysisError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误 / Format",
            Self::Series => "信号错误 / Series",
            Self::Config => "配置错误 / Config",
            Self::Io => "I/O错误 / I/O",
            Self::Other => "其他错误 / Other",
        }
    }
}
