//! 多文件并行处理模块
//!
//! 使用rayon实现文件级并行处理，汇总输出保持扫描顺序。

use super::batch_state::ParallelBatchStats;
use super::cli::AppConfig;
use super::processor::{
    FileAnalysis, add_failed_to_batch_output, add_to_batch_output, output_results,
    process_single_trace_file,
};
use super::scanner::{create_batch_output_header, finalize_and_write_batch_output};
use super::utils;
use crate::error::{AnalysisError, AnalysisResult};
use rayon::prelude::*;
use std::path::PathBuf;

/// 有序结果容器
struct OrderedResult {
    index: usize,
    file_path: PathBuf,
    result: AnalysisResult<FileAnalysis>,
}

/// 多文件并行处理
///
/// 每个文件在独立线程中静默分析，完成后按原始索引排序再写入汇总，
/// 因此汇总内容与串行模式一致。
pub fn process_batch_parallel(
    trace_files: &[PathBuf],
    config: &AppConfig,
    parallel_degree: usize,
) -> AnalysisResult<()> {
    println!("启用多文件并行处理 / Parallel file processing: {parallel_degree} workers");

    let stats = ParallelBatchStats::new();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_degree)
        .thread_name(|i| format!("purity-worker-{i}"))
        .build()
        .map_err(|e| {
            AnalysisError::ResourceError(format!("线程池创建失败 / thread pool: {e}"))
        })?;

    let mut results: Vec<OrderedResult> = pool.install(|| {
        trace_files
            .par_iter()
            .enumerate()
            .map(|(index, trace_file)| {
                let silent_config = AppConfig {
                    verbose: false,
                    ..config.clone()
                };

                let result = process_single_trace_file(trace_file, &silent_config);
                let filename = utils::extract_filename_lossy(trace_file);

                match &result {
                    Ok(_) => {
                        let count = stats.inc_processed();
                        log::info!("[{count}/{}] {filename}", trace_files.len());
                    }
                    Err(e) => {
                        let count = stats.record_failure(e, filename.clone());
                        log::warn!("[{count} failed] {filename}: {e}");
                    }
                }

                OrderedResult {
                    index,
                    file_path: trace_file.clone(),
                    result,
                }
            })
            .collect()
    });

    results.sort_by_key(|r| r.index);

    let is_single_file = trace_files.len() == 1;
    let mut batch_output = if is_single_file {
        String::new()
    } else {
        create_batch_output_header(config, trace_files)
    };

    for ordered in &results {
        match &ordered.result {
            Ok(analysis) if is_single_file => {
                output_results(analysis, &ordered.file_path, config, true)?;
            }
            Ok(analysis) => add_to_batch_output(&mut batch_output, analysis, &ordered.file_path),
            Err(e) if is_single_file => {
                eprintln!("[ERROR] {}: {e}", ordered.file_path.display());
            }
            Err(_) => add_failed_to_batch_output(&mut batch_output, &ordered.file_path),
        }
    }

    let snapshot = stats.snapshot();
    finalize_and_write_batch_output(
        config,
        trace_files,
        batch_output,
        snapshot.processed,
        snapshot.failed,
        &snapshot.error_stats,
        is_single_file,
    )
}
