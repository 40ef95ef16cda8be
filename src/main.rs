//! Radio-HPLC Purity Analyzer - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成纯度分析任务。

use radio_hplc_purity::{
    error::{AnalysisError, ErrorCategory},
    tools::{self, AppConfig},
};
use std::path::PathBuf;
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误（I/O等）
    pub const GENERAL_ERROR: i32 = 1;
    /// 输入文件格式错误
    pub const FORMAT_ERROR: i32 = 2;
    /// 信号数据无效
    pub const SERIES_ERROR: i32 = 3;
    /// 参数/配置错误
    pub const CONFIG_ERROR: i32 = 4;
    /// 资源/并发错误
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &AnalysisError) -> &'static str {
    match error {
        AnalysisError::ResourceError(_) => {
            "资源不可用，请重试或使用 --serial 串行模式 / Resource unavailable, retry or use --serial"
        }
        _ => match ErrorCategory::from_analysis_error(error) {
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读 / Check that the path exists and is readable"
            }
            ErrorCategory::Format => {
                "检查CSV列名、时间格式和编码（--time-column / --signal-column / --time-format / --encoding） / Check CSV columns, time format and encoding"
            }
            ErrorCategory::Series => {
                "检测器数据为空、长度不一致或时间戳非递增 / Detector data is empty, misaligned or not increasing in time"
            }
            ErrorCategory::Config => {
                "检查命令行参数或配置文件，使用 --help 查看完整用法 / Check arguments or config file, see --help"
            }
            ErrorCategory::Other => {
                "请检查输入文件和参数设置 / Please check input file and parameter settings"
            }
        },
    }
}

/// 错误处理和建议
fn handle_error(error: AnalysisError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        AnalysisError::ResourceError(_) => exit_codes::RESOURCE_ERROR,
        _ => match ErrorCategory::from_analysis_error(&error) {
            ErrorCategory::Format => exit_codes::FORMAT_ERROR,
            ErrorCategory::Series => exit_codes::SERIES_ERROR,
            ErrorCategory::Config => exit_codes::CONFIG_ERROR,
            ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

/// 初始化日志（`RUST_LOG` 优先；否则 verbose 时为 debug，默认 warn）
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// 批量处理检测器文件
fn process_batch_mode(config: &AppConfig) -> Result<(), AnalysisError> {
    let trace_files = tools::scan_trace_files(&config.input_path)?;

    tools::show_scan_results(config, &trace_files);

    if trace_files.is_empty() {
        return Ok(());
    }

    match config.parallel_files {
        None => process_batch_serial(config, &trace_files),
        Some(degree) => {
            let actual_degree =
                tools::utils::effective_parallel_degree(degree, Some(trace_files.len()));

            if actual_degree == 1 {
                if config.verbose {
                    println!("[INFO] 并发度为1，使用串行模式 / Parallelism=1, using serial mode");
                }
                process_batch_serial(config, &trace_files)
            } else {
                tools::process_batch_parallel(&trace_files, config, actual_degree).or_else(|e| {
                    eprintln!(
                        "[WARNING] 并行处理失败 / Parallel processing failed: {e}，回退到串行模式 / fallback to serial"
                    );
                    process_batch_serial(config, &trace_files)
                })
            }
        }
    }
}

/// 串行批量处理检测器文件
fn process_batch_serial(config: &AppConfig, trace_files: &[PathBuf]) -> Result<(), AnalysisError> {
    let is_single_file = trace_files.len() == 1;
    let mut batch_output = if is_single_file {
        String::new()
    } else {
        tools::create_batch_output_header(config, trace_files)
    };

    let mut stats = tools::SerialBatchStats::new();

    for (index, trace_file) in trace_files.iter().enumerate() {
        let filename = tools::utils::extract_filename_lossy(trace_file);
        if config.verbose {
            println!(
                "[PROCESSING] [{}/{}] 处理 / Processing: {filename}",
                index + 1,
                trace_files.len(),
            );
        }

        match tools::process_single_trace_file(trace_file, config) {
            Ok(analysis) => {
                stats.inc_processed();

                if is_single_file {
                    tools::output_results(&analysis, trace_file, config, true)?;
                } else {
                    tools::add_to_batch_output(&mut batch_output, &analysis, trace_file);
                }

                if config.verbose {
                    println!("   [OK] 处理成功 / Processing succeeded");
                }
            }
            Err(e) => {
                let category = ErrorCategory::from_analysis_error(&e);
                println!(
                    "[FAIL] [{}/{}] {filename} - [{}] {e}",
                    index + 1,
                    trace_files.len(),
                    category.display_name()
                );

                if !is_single_file {
                    tools::add_failed_to_batch_output(&mut batch_output, trace_file);
                }
                stats.record_failure(&e, filename);
            }
        }
    }

    let snapshot = stats.snapshot();
    tools::finalize_and_write_batch_output(
        config,
        trace_files,
        batch_output,
        snapshot.processed,
        snapshot.failed,
        &snapshot.error_stats,
        is_single_file,
    )
}

/// 单文件处理模式
fn process_single_mode(config: &AppConfig) -> Result<(), AnalysisError> {
    let analysis = tools::process_single_trace_file(&config.input_path, config)?;

    // 未指定输出文件时同时保存到输入文件旁
    tools::output_results(
        &analysis,
        &config.input_path,
        config,
        config.output_path.is_none(),
    )
}

/// 应用程序主逻辑
fn run() -> Result<(), AnalysisError> {
    let config = tools::parse_args()?;
    init_logging(config.verbose);

    tools::show_startup_info(&config);

    if config.is_batch_mode() {
        process_batch_mode(&config)?;
    } else {
        process_single_mode(&config)?;
    }

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
