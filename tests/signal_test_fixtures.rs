//! 检测器测试固件生成器
//!
//! 生成合成高斯峰信号，以及检测器软件风格的CSV文件（UTF-8 / Shift_JIS）。

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fs2::FileExt;
use std::fs::{File, OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

pub fn log(msg_zh: impl AsRef<str>, msg_en: impl AsRef<str>) {
    println!("{} / {}", msg_zh.as_ref(), msg_en.as_ref());
}

/// 单个高斯峰：(中心索引, 峰高, 标准差)
#[derive(Debug, Clone, Copy)]
pub struct Bump {
    pub center: f64,
    pub amplitude: f64,
    pub sigma: f64,
}

impl Bump {
    pub const fn new(center: f64, amplitude: f64, sigma: f64) -> Self {
        Self {
            center,
            amplitude,
            sigma,
        }
    }

    fn value_at(&self, i: f64) -> f64 {
        let d = i - self.center;
        self.amplitude * (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }
}

/// 在恒定基线上叠加若干高斯峰
pub fn gaussian_trace(len: usize, baseline: f64, bumps: &[Bump]) -> Vec<f64> {
    (0..len)
        .map(|i| baseline + bumps.iter().map(|b| b.value_at(i as f64)).sum::<f64>())
        .collect()
}

/// 等间隔时间轴（秒）
pub fn uniform_times(len: usize, step_seconds: f64) -> Vec<f64> {
    (0..len).map(|i| i as f64 * step_seconds).collect()
}

/// CSV文本编码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureEncoding {
    Utf8,
    ShiftJis,
}

/// 固件时间戳起点
pub fn run_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("有效的固件日期")
}

/// 生成检测器导出格式的CSV文本（时间以 `;` 分隔，如 `10;00;01`）
pub fn detector_csv_text(intensities: &[f64], step_seconds: i64) -> String {
    let mut text = String::from("日時,UV(mV),RI5(cps),RI6(cps)\n");
    let start = run_start();
    for (i, y) in intensities.iter().enumerate() {
        let t = start + Duration::seconds(step_seconds * i as i64);
        text.push_str(&format!(
            "{},0.0,0,{y:.4}\n",
            t.format("%Y/%m/%d %H;%M;%S")
        ));
    }
    text
}

/// 写入CSV文件
pub fn write_csv(path: &Path, text: &str, encoding: FixtureEncoding) {
    let bytes = match encoding {
        FixtureEncoding::Utf8 => text.as_bytes().to_vec(),
        FixtureEncoding::ShiftJis => encoding_rs::SHIFT_JIS.encode(text).0.into_owned(),
    };
    std::fs::write(path, bytes).expect("无法写入固件文件");
}

fn fixtures_base_dir() -> &'static PathBuf {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let path = match std::env::var("RADIO_HPLC_FIXTURES_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => PathBuf::from("tests/fixtures"),
        };
        create_dir_all(&path).expect("无法创建测试固件目录");
        path
    })
}

pub fn fixtures_dir() -> PathBuf {
    fixtures_base_dir().clone()
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_base_dir().join(name)
}

/// 批量测试目录（仅包含可分析文件和一个失败文件）
pub fn batch_dir() -> PathBuf {
    fixtures_base_dir().join("batch")
}

/// 跨进程文件锁 + 进程内互斥，避免并发写入导致的截断文件。
struct FixtureLock {
    _mutex_guard: std::sync::MutexGuard<'static, ()>,
    lock_file: File,
}

impl FixtureLock {
    fn acquire() -> Self {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        let mutex = MUTEX.get_or_init(|| Mutex::new(()));
        let guard = mutex.lock().unwrap_or_else(|e| e.into_inner());

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(fixtures_base_dir().join(".lock"))
            .expect("无法创建固件锁文件");
        file.lock_exclusive()
            .expect("无法获取固件文件锁，可能被其他进程占用");

        Self {
            _mutex_guard: guard,
            lock_file: file,
        }
    }
}

impl Drop for FixtureLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.lock_file);
    }
}

/// 双峰信号：主峰（RI6约100 cps）+ 杂质峰（约25 cps）
pub fn two_peak_intensities() -> Vec<f64> {
    gaussian_trace(
        300,
        0.0,
        &[Bump::new(100.0, 100.0, 6.0), Bump::new(200.0, 25.0, 6.0)],
    )
}

/// 确保所有固件生成完毕（幂等）
pub fn ensure_fixtures_generated() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _lock = FixtureLock::acquire();
        log("生成检测器固件", "Generating detector fixtures");

        let two_peaks = detector_csv_text(&two_peak_intensities(), 1);
        write_csv(
            &fixture_path("two_peaks_utf8.csv"),
            &two_peaks,
            FixtureEncoding::Utf8,
        );
        write_csv(
            &fixture_path("two_peaks_sjis.csv"),
            &two_peaks,
            FixtureEncoding::ShiftJis,
        );

        let flat = detector_csv_text(&[3.0; 50], 1);
        write_csv(&fixture_path("flat.csv"), &flat, FixtureEncoding::Utf8);

        let non_monotonic = "日時,RI6(cps)\n2024/05/01 10;00;01,1\n2024/05/01 10;00;00,2\n";
        write_csv(
            &fixture_path("non_monotonic.csv"),
            non_monotonic,
            FixtureEncoding::Utf8,
        );

        let batch = batch_dir();
        create_dir_all(&batch).expect("无法创建批量固件目录");
        write_csv(
            &batch.join("a_two_peaks.csv"),
            &two_peaks,
            FixtureEncoding::ShiftJis,
        );
        write_csv(&batch.join("b_flat.csv"), &flat, FixtureEncoding::Utf8);
        write_csv(
            &batch.join("c_missing_column.csv"),
            "日時,UV(mV)\n2024/05/01 10;00;00,1\n",
            FixtureEncoding::Utf8,
        );
        std::fs::write(batch.join("notes.txt"), "not a trace").expect("无法写入固件文件");
    });
}
