//! 色谱文件处理模块
//!
//! 负责单个检测器文件的读取、流水线分析和结果输出。

use super::cli::AppConfig;
use super::loader::{LoadedTrace, load_signal_csv};
use super::{formatter, utils};
use crate::core::{PipelineOutput, analyze_with_reference};
use crate::error::AnalysisResult;
use std::path::{Path, PathBuf};

/// 单个文件的分析结果
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub trace: LoadedTrace,
    pub output: PipelineOutput,
}

/// 读取并分析单个检测器文件
pub fn process_trace_file(path: &Path, config: &AppConfig) -> AnalysisResult<FileAnalysis> {
    let trace = load_signal_csv(path, &config.loader)?;
    let decay_constant = config.decay.decay_constant()?;
    let output = analyze_with_reference(
        &trace.series,
        &config.detection,
        decay_constant,
        config.decay.reference,
    )?;
    Ok(FileAnalysis { trace, output })
}

/// 处理单个文件并显示详细信息
pub fn process_single_trace_file(
    file_path: &Path,
    config: &AppConfig,
) -> AnalysisResult<FileAnalysis> {
    if config.verbose {
        println!("加载检测器文件 / Loading detector file: {}", file_path.display());
    }

    let analysis = process_trace_file(file_path, config)?;

    if config.verbose {
        let series = &analysis.trace.series;
        let labels = [
            "信号列 / Signal column:",
            "编码 / Encoding:",
            "样本数 / Samples:",
            "时长 / Duration:",
            "峰数 / Peaks:",
        ];
        let label_width = utils::table::max_display_width(&labels);
        let values = [
            analysis.trace.signal_column.clone(),
            analysis.trace.encoding.to_string(),
            series.len().to_string(),
            format!("{:.1} seconds", series.duration_seconds()),
            analysis.output.peaks.len().to_string(),
        ];
        for (label, value) in labels.iter().zip(&values) {
            let line =
                utils::table::format_cols_line(&[*label, value.as_str()], &[label_width, 0], " ");
            print!("   {line}");
        }
    }

    Ok(analysis)
}

/// 单个结果文件路径：`<stem>_Purity_Analysis.<ext>`（与输入文件同目录）
pub fn individual_result_path(file_path: &Path, config: &AppConfig) -> PathBuf {
    let stem = utils::extract_file_stem_string(file_path);
    utils::get_parent_dir(file_path).join(format!(
        "{stem}_Purity_Analysis.{}",
        config.output_format.extension()
    ))
}

/// 输出单文件结果
///
/// 指定了 `--output` 时写入该文件；否则打印到控制台，
/// `auto_save` 为真时同时保存到输入文件旁。
pub fn output_results(
    analysis: &FileAnalysis,
    file_path: &Path,
    config: &AppConfig,
    auto_save: bool,
) -> AnalysisResult<()> {
    let content = formatter::render_report(
        config,
        file_path,
        &analysis.trace.signal_column,
        &analysis.trace.series,
        &analysis.output,
    )?;

    match &config.output_path {
        Some(path) => formatter::write_output(&content, Some(path.as_path())),
        None => {
            formatter::write_output(&content, None)?;
            if auto_save {
                let path = individual_result_path(file_path, config);
                formatter::write_output(&content, Some(path.as_path()))?;
            }
            Ok(())
        }
    }
}

/// 添加单个文件结果到批量输出（文件名、峰数、主峰占比、状态）
pub fn add_to_batch_output(batch_output: &mut String, analysis: &FileAnalysis, file_path: &Path) {
    let file_name = utils::extract_filename_lossy(file_path);
    let report = &analysis.output.report;
    let main = report
        .main_peak()
        .map(|r| format!("#{} {:.1}%", r.ordinal, r.percentage_of_total))
        .unwrap_or_else(|| "-".to_string());

    batch_output.push_str(&format!(
        "{file_name}\t{}\t{main}\t{:.1}\t{}\n",
        analysis.output.peaks.len(),
        report.total_corrected_area,
        report.outcome.description()
    ));
}

/// 添加处理失败的文件到批量输出
pub fn add_failed_to_batch_output(batch_output: &mut String, file_path: &Path) {
    let file_name = utils::extract_filename_lossy(file_path);
    batch_output.push_str(&format!("{file_name}\t-\t-\t-\t[处理失败 / failed]\n"));
}
