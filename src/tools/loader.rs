//! 检测器CSV读取模块
//!
//! 将检测器软件导出的CSV转换为 [`SignalSeries`]：
//! 文本解码（UTF-8 / BOM / 旧式编码回退）→ 列定位 → 时间戳解析。
//! 时间戳非单调的数据在构造序列时被拒绝，不会进入核心流水线。

use super::constants::input_defaults;
use crate::core::SignalSeries;
use crate::error::{AnalysisError, AnalysisResult, config_error, format_error};
use chrono::NaiveDateTime;
use std::path::Path;

/// 读取选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// 时间戳列名（精确匹配，忽略首尾空白）
    pub time_column: String,

    /// 信号列名片段（首个包含该片段的列）
    pub signal_column_hint: String,

    /// chrono 时间格式
    pub time_format: String,

    /// 非UTF-8文件的编码标签（WHATWG标签，如 `shift_jis`）
    pub encoding: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            time_column: input_defaults::TIME_COLUMN.to_string(),
            signal_column_hint: input_defaults::SIGNAL_COLUMN_HINT.to_string(),
            time_format: input_defaults::TIME_FORMAT.to_string(),
            encoding: input_defaults::ENCODING.to_string(),
        }
    }
}

/// 读取结果
#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub series: SignalSeries,

    /// 实际选中的信号列名
    pub signal_column: String,

    /// 实际使用的文本编码
    pub encoding: &'static str,
}

/// 读取检测器CSV文件
pub fn load_signal_csv(path: &Path, options: &LoaderOptions) -> AnalysisResult<LoadedTrace> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_text(&bytes, &options.encoding)?;

    log::debug!(
        "读取 / reading {} ({} bytes, {encoding})",
        path.display(),
        bytes.len()
    );

    let (series, signal_column) = parse_signal_csv(&text, options)?;
    Ok(LoadedTrace {
        series,
        signal_column,
        encoding,
    })
}

/// 解码文本：UTF-8（可带BOM）优先，否则按 `fallback_label` 解码
pub fn decode_text(bytes: &[u8], fallback_label: &str) -> AnalysisResult<(String, &'static str)> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((text.to_string(), encoding_rs::UTF_8.name()));
    }

    let encoding = encoding_rs::Encoding::for_label(fallback_label.as_bytes())
        .ok_or_else(|| config_error("未知编码 / unknown encoding", fallback_label))?;
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(AnalysisError::FormatError(format!(
            "文本无法按{}解码 / text is not valid {}",
            actual.name(),
            actual.name()
        )));
    }
    Ok((text.into_owned(), actual.name()))
}

/// 解析已解码的CSV文本，返回序列与选中的信号列名
pub fn parse_signal_csv(
    text: &str,
    options: &LoaderOptions,
) -> AnalysisResult<(SignalSeries, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let time_idx = headers
        .iter()
        .position(|h| h == options.time_column)
        .ok_or_else(|| {
            AnalysisError::FormatError(format!(
                "缺少时间戳列 / missing time column '{}'",
                options.time_column
            ))
        })?;
    let (signal_idx, signal_column) = find_signal_column(headers.iter(), &options.signal_column_hint)
        .ok_or_else(|| {
            AnalysisError::FormatError(format!(
                "没有包含'{}'的信号列 / no signal column containing '{}'",
                options.signal_column_hint, options.signal_column_hint
            ))
        })?;

    let mut timestamps = Vec::new();
    let mut intensities = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // 表头为第1行
        let line = row + 2;

        let raw_time = record.get(time_idx).unwrap_or_default();
        let raw_value = record.get(signal_idx).unwrap_or_default();

        timestamps.push(
            parse_timestamp(raw_time, &options.time_format)
                .map_err(|e| format_error(&format!("第{line}行 / line {line}"), e))?,
        );
        intensities.push(raw_value.parse::<f64>().map_err(|e| {
            format_error(
                &format!("第{line}行信号值 / line {line} value '{raw_value}'"),
                e,
            )
        })?);
    }

    let series = SignalSeries::from_timestamps(timestamps, intensities)?;
    Ok((series, signal_column))
}

/// 定位信号列：首个包含 `hint` 的列名
pub fn find_signal_column<'a, I>(headers: I, hint: &str) -> Option<(usize, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .enumerate()
        .find(|(_, h)| h.contains(hint))
        .map(|(i, h)| (i, h.to_string()))
}

/// 解析时间戳（先将 `;` 替换为 `:`）
pub fn parse_timestamp(raw: &str, format: &str) -> AnalysisResult<NaiveDateTime> {
    let normalized = raw.trim().replace(';', ":");
    NaiveDateTime::parse_from_str(&normalized, format)
        .map_err(|e| format_error(&format!("时间戳 / timestamp '{raw}'"), e))
}
