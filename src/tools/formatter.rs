//! 输出格式化模块
//!
//! 负责峰纯度结果的文本、表格和JSON输出。

use super::cli::{AppConfig, OutputFormat};
use super::utils;
use crate::core::{PipelineOutput, PurityOutcome, SignalSeries};
use crate::error::{AnalysisError, AnalysisResult};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::Path;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------\n";

/// 创建输出文件头部信息
pub fn create_output_header(config: &AppConfig, file_path: &Path, signal_column: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Radio-HPLC Purity Analyzer v{VERSION} / Peak detection with decay correction\n"
    ));
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("log date: {now}\n\n"));
    output.push_str(SEPARATOR);

    let file_name = utils::extract_filename(file_path);
    let d = &config.detection;
    let labels = [
        "Statistics for:",
        "Signal column:",
        "Isotope:",
        "Decay reference:",
        "Detection:",
    ];
    let values = [
        file_name.to_string(),
        signal_column.to_string(),
        config.decay.label(),
        config.decay.reference.to_string(),
        format!(
            "height>={} distance>={} prominence>={} width>={} rel_height={}",
            d.min_height, d.min_distance, d.min_prominence, d.min_width, d.rel_height
        ),
    ];
    let label_width = utils::table::max_display_width(&labels);
    for (label, value) in labels.iter().zip(&values) {
        output.push_str(&utils::table::format_cols_line(
            &[*label, value.as_str()],
            &[label_width, 0],
            " ",
        ));
    }

    output.push_str(SEPARATOR);
    output.push('\n');
    output
}

/// 简要汇总：每峰一行
pub fn format_text_summary(output: &PipelineOutput) -> String {
    let mut text = String::new();

    for result in &output.report.results {
        text.push_str(&format!(
            "Peak {} Area: {:.1} ({:.1}%)\n",
            result.ordinal, result.corrected_area, result.percentage_of_total
        ));
    }
    text.push_str(&outcome_note(output));

    text
}

/// 详细表格：保留时间、窗口、原始/校正面积、占比
pub fn format_table(series: &SignalSeries, output: &PipelineOutput) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Peak",
            "RT (s)",
            "Time",
            "Height",
            "Window",
            "Area",
            "Corrected",
            "%",
        ]);

    let elapsed = series.elapsed_seconds();
    for (peak, boundary, result) in output.rows() {
        let wall_clock = series
            .timestamp(peak.index)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(result.ordinal).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", elapsed[peak.index])).set_alignment(CellAlignment::Right),
            Cell::new(wall_clock),
            Cell::new(format!("{:.1}", peak.height)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}..{}", boundary.left_index, boundary.right_index)),
            Cell::new(format!("{:.1}", result.original_area)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", result.corrected_area)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", result.percentage_of_total))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    let mut text = format!("{table}\n");
    text.push_str(&format!(
        "Total corrected area: {:.1}\n",
        output.report.total_corrected_area
    ));
    text.push_str(&outcome_note(output));
    text
}

/// JSON报告
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    tool_version: &'static str,
    file: &'a str,
    signal_column: &'a str,
    isotope: String,
    #[serde(flatten)]
    output: &'a PipelineOutput,
}

pub fn format_json(
    config: &AppConfig,
    file_path: &Path,
    signal_column: &str,
    output: &PipelineOutput,
) -> AnalysisResult<String> {
    let report = JsonReport {
        tool_version: VERSION,
        file: utils::extract_filename(file_path),
        signal_column,
        isotope: config.decay.label(),
        output,
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| AnalysisError::FormatError(format!("JSON序列化失败 / JSON encoding: {e}")))
}

/// 按配置的格式生成完整报告
pub fn render_report(
    config: &AppConfig,
    file_path: &Path,
    signal_column: &str,
    series: &SignalSeries,
    output: &PipelineOutput,
) -> AnalysisResult<String> {
    match config.output_format {
        OutputFormat::Json => format_json(config, file_path, signal_column, output),
        OutputFormat::Text => Ok(format!(
            "{}{}",
            create_output_header(config, file_path, signal_column),
            format_text_summary(output)
        )),
        OutputFormat::Table => Ok(format!(
            "{}{}",
            create_output_header(config, file_path, signal_column),
            format_table(series, output)
        )),
    }
}

/// 写入输出文件或打印到控制台
pub fn write_output(content: &str, output_path: Option<&Path>) -> AnalysisResult<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, content).map_err(AnalysisError::IoError)?;
            println!("结果已保存 / Results saved to: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn outcome_note(output: &PipelineOutput) -> String {
    match output.report.outcome {
        PurityOutcome::Complete => String::new(),
        PurityOutcome::NoPeaksDetected => {
            "[WARNING] 未检测到峰 / No peaks detected\n".to_string()
        }
        PurityOutcome::ZeroTotalArea => {
            "[WARNING] 校正面积总和为零，百分比记为0 / Total corrected area is zero, percentages reported as 0\n"
                .to_string()
        }
    }
}
