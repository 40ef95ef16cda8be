//! 批处理状态管理模块
//!
//! 串行与并行两种批处理模式共用的成功/失败计数和失败分类。

use crate::error::{AnalysisError, ErrorCategory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 批处理统计快照
#[derive(Debug, Clone, Default)]
pub struct BatchStatsSnapshot {
    pub processed: usize,
    pub failed: usize,
    /// 错误类型 -> 失败文件名列表
    pub error_stats: HashMap<ErrorCategory, Vec<String>>,
}

/// 串行批处理统计
#[derive(Debug, Default)]
pub struct SerialBatchStats {
    processed: usize,
    failed: usize,
    error_stats: HashMap<ErrorCategory, Vec<String>>,
}

impl SerialBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_processed(&mut self) -> usize {
        self.processed += 1;
        self.processed
    }

    /// 记录一次失败，按错误类型归类文件名
    pub fn record_failure(&mut self, error: &AnalysisError, filename: String) -> usize {
        self.failed += 1;
        self.error_stats
            .entry(ErrorCategory::from_analysis_error(error))
            .or_default()
            .push(filename);
        self.failed
    }

    pub fn snapshot(&self) -> BatchStatsSnapshot {
        BatchStatsSnapshot {
            processed: self.processed,
            failed: self.failed,
            error_stats: self.error_stats.clone(),
        }
    }
}

/// 并行批处理统计（克隆后共享同一状态）
#[derive(Debug, Clone, Default)]
pub struct ParallelBatchStats {
    processed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    error_stats: Arc<Mutex<HashMap<ErrorCategory, Vec<String>>>>,
}

impl ParallelBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_processed(&self) -> usize {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_failure(&self, error: &AnalysisError, filename: String) -> usize {
        let count = self.failed.fetch_add(1, Ordering::Relaxed) + 1;

        if let Ok(mut stats) = self.error_stats.lock() {
            stats
                .entry(ErrorCategory::from_analysis_error(error))
                .or_default()
                .push(filename);
        }

        count
    }

    pub fn snapshot(&self) -> BatchStatsSnapshot {
        BatchStatsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            error_stats: self
                .error_stats
                .lock()
                .map(|stats| stats.clone())
                .unwrap_or_default(),
        }
    }
}
