//! 工具函数模块
//!
//! 提供文件路径处理、显示宽度对齐、并发度计算等通用工具函数。

use super::constants::parallel_limits;

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（统一处理路径提取逻辑）
    #[inline]
    pub fn extract_filename(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
    }

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 安全提取文件stem（返回String）
    #[inline]
    pub fn extract_file_stem_string(path: &Path) -> String {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("trace")
            .to_string()
    }

    /// 获取父目录，如果不存在则返回当前目录
    #[inline]
    pub fn get_parent_dir(path: &Path) -> &Path {
        path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// 按显示宽度对齐的列工具
///
/// 列名常含全角字符（如“日時”），按字节或字符数对齐会错位。
pub mod table {
    use unicode_width::UnicodeWidthStr;

    /// 字符串的终端显示宽度
    #[inline]
    pub fn display_width(s: &str) -> usize {
        UnicodeWidthStr::width(s)
    }

    /// 一组标签中的最大显示宽度
    pub fn max_display_width(labels: &[&str]) -> usize {
        labels.iter().map(|s| display_width(s)).max().unwrap_or(0)
    }

    /// 按显示宽度右侧补空格
    pub fn pad_to_width(s: &str, width: usize) -> String {
        let w = display_width(s);
        let mut out = String::with_capacity(s.len() + width.saturating_sub(w));
        out.push_str(s);
        out.extend(std::iter::repeat_n(' ', width.saturating_sub(w)));
        out
    }

    /// 格式化一行多列文本（宽度为0的列不补齐），以换行结尾
    pub fn format_cols_line(cols: &[&str], widths: &[usize], sep: &str) -> String {
        let mut line = String::new();
        for (i, col) in cols.iter().enumerate() {
            if i > 0 {
                line.push_str(sep);
            }
            match widths.get(i).copied().unwrap_or(0) {
                0 => line.push_str(col),
                w => line.push_str(&pad_to_width(col, w)),
            }
        }
        line.push('\n');
        line
    }
}

/// 计算有效并发度（限制在允许范围内，且不超过任务数）
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    let degree = requested.clamp(
        parallel_limits::MIN_PARALLEL_DEGREE,
        parallel_limits::MAX_PARALLEL_DEGREE,
    );
    match task_count {
        Some(n) => degree.min(n.max(1)),
        None => degree,
    }
}

// 重新导出为平级函数，保持调用简洁
pub use path::{extract_file_stem_string, extract_filename, extract_filename_lossy, get_parent_dir};
