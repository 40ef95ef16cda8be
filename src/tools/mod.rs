//! 工具模块集合
//!
//! 包含CLI、文件读取、处理、格式化等工具模块，支持main.rs的流程控制。

pub mod batch_state;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod loader;
pub mod parallel_processor;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use batch_state::{BatchStatsSnapshot, ParallelBatchStats, SerialBatchStats};
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use formatter::{create_output_header, render_report, write_output};
pub use loader::{LoadedTrace, LoaderOptions, load_signal_csv};
pub use parallel_processor::process_batch_parallel;
pub use processor::{
    FileAnalysis, add_failed_to_batch_output, add_to_batch_output, output_results,
    process_single_trace_file, process_trace_file,
};
pub use scanner::{
    create_batch_output_footer, create_batch_output_header, finalize_and_write_batch_output,
    generate_batch_output_path, scan_trace_files, show_batch_completion_info, show_scan_results,
};
pub use utils::path;
