//! 文件扫描模块
//!
//! 负责扫描目录中的检测器CSV文件，并生成批量输出的头尾信息。

use super::cli::AppConfig;
use super::constants::input_defaults::SUPPORTED_EXTENSIONS;
use super::utils;
use crate::error::{AnalysisError, AnalysisResult, ErrorCategory};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 扫描目录中的检测器文件（不递归子目录，按文件名排序）
pub fn scan_trace_files(dir_path: &Path) -> AnalysisResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(AnalysisError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在 / directory not found: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(AnalysisError::InvalidConfig(format!(
            "路径不是目录 / not a directory: {}",
            dir_path.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            AnalysisError::IoError(std::io::Error::other(format!(
                "目录遍历失败 / walk failed: {e}"
            )))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);

        // 跳过本工具生成的结果文件
        let is_own_output = utils::extract_filename(path).contains("_Purity_");

        if is_supported && !is_own_output {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, files: &[PathBuf]) {
    if files.is_empty() {
        println!(
            "[WARNING] 在目录 {} 中没有找到CSV文件 / no CSV files found",
            config.input_path.display()
        );
        return;
    }

    println!("扫描目录 / Scanning: {}", config.input_path.display());
    println!("找到 {} 个检测器文件 / detector files found", files.len());

    if config.verbose {
        for (i, file) in files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}

/// 生成批量输出的头部信息
pub fn create_batch_output_header(config: &AppConfig, files: &[PathBuf]) -> String {
    let mut batch_output = String::new();

    batch_output.push_str("=====================================\n");
    batch_output.push_str("   Radio-HPLC Purity Report\n");
    batch_output.push_str("   批量分析结果 / Batch results\n");
    batch_output.push_str("=====================================\n\n");

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    batch_output.push_str(&format!("log date: {now}\n"));
    batch_output.push_str(&format!("扫描目录 / Directory: {}\n", config.input_path.display()));
    batch_output.push_str(&format!("核素 / Isotope: {}\n", config.decay.label()));
    batch_output.push_str(&format!("处理文件数 / Files: {}\n\n", files.len()));

    batch_output.push_str("文件名\t峰数\t主峰占比\t校正总面积\t状态\n");
    batch_output.push_str("--------------------------------------------------------\n");

    batch_output
}

/// 生成批量输出的统计信息
pub fn create_batch_output_footer(
    files: &[PathBuf],
    processed_count: usize,
    failed_count: usize,
    error_stats: &HashMap<ErrorCategory, Vec<String>>,
) -> String {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    let mut output = String::new();

    output.push('\n');
    output.push_str("=====================================\n");
    output.push_str("批量处理统计 / Batch statistics:\n");
    output.push_str(&format!("   总文件数 / Total: {}\n", files.len()));
    output.push_str(&format!("   成功处理 / Processed: {processed_count}\n"));
    output.push_str(&format!("   处理失败 / Failed: {failed_count}\n"));
    if !files.is_empty() {
        output.push_str(&format!(
            "   处理成功率 / Success rate: {:.1}%\n",
            processed_count as f64 / files.len() as f64 * 100.0
        ));
    }

    if !error_stats.is_empty() {
        output.push_str("\n失败分类 / Failures by category:\n");
        let mut categories: Vec<_> = error_stats.iter().collect();
        categories.sort_by_key(|(category, _)| category.display_name());
        for (category, names) in categories {
            output.push_str(&format!(
                "   {} ({}): {}\n",
                category.display_name(),
                names.len(),
                names.join(", ")
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!("生成工具 / Generated by: Radio-HPLC Purity Analyzer v{VERSION}\n"));

    output
}

/// 生成批量输出文件路径
pub fn generate_batch_output_path(config: &AppConfig) -> PathBuf {
    config.output_path.clone().unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        config
            .input_path
            .join(format!("Batch_Purity_Results_{timestamp}.txt"))
    })
}

/// 显示批量处理完成信息
pub fn show_batch_completion_info(
    output_path: &Path,
    processed_count: usize,
    total_count: usize,
    failed_count: usize,
) {
    println!();
    println!("批量处理完成 / Batch complete!");
    println!("   成功处理 / Processed: {processed_count} / {total_count}");
    if failed_count > 0 {
        println!("   失败文件 / Failed: {failed_count}");
    }
    println!("   批量汇总 / Summary: {}", output_path.display());
}

/// 统一收尾：写入批量汇总文件（多文件）或显示单文件完成信息
#[allow(clippy::too_many_arguments)]
pub fn finalize_and_write_batch_output(
    config: &AppConfig,
    files: &[PathBuf],
    mut batch_output: String,
    processed: usize,
    failed: usize,
    error_stats: &HashMap<ErrorCategory, Vec<String>>,
    is_single_file: bool,
) -> AnalysisResult<()> {
    if is_single_file {
        if processed > 0 {
            println!("[OK] 单文件处理完成 / Single file processed");
        } else {
            println!("[FAIL] 单文件处理失败 / Single file failed");
        }
        return Ok(());
    }

    batch_output.push_str(&create_batch_output_footer(
        files,
        processed,
        failed,
        error_stats,
    ));

    let output_path = generate_batch_output_path(config);
    std::fs::write(&output_path, &batch_output).map_err(AnalysisError::IoError)?;

    show_batch_completion_info(&output_path, processed, files.len(), failed);
    Ok(())
}
