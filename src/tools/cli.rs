//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。
//!
//! 检测参数按以下优先级合并：内置默认值 < `--config` JSON < 单项命令行参数。

use super::constants::{defaults, detection_defaults, input_defaults};
use super::loader::LoaderOptions;
use crate::core::{DecayReference, DetectionConfig, Isotope, decay_constant_from_half_life};
use crate::error::{AnalysisError, AnalysisResult, config_error};
use clap::{Arg, ArgMatches, Command};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 每峰一行的简要汇总
    #[default]
    Text,
    /// 带保留时间与窗口的表格
    Table,
    /// JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}")),
        }
    }
}

impl OutputFormat {
    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text | OutputFormat::Table => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// 衰变校正设置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySettings {
    /// 选定的核素（直接给出半衰期时为None）
    pub isotope: Option<Isotope>,

    /// 半衰期（秒）
    pub half_life_seconds: f64,

    pub reference: DecayReference,
}

impl DecaySettings {
    pub fn from_isotope(isotope: Isotope) -> Self {
        Self {
            isotope: Some(isotope),
            half_life_seconds: isotope.half_life_seconds(),
            reference: DecayReference::WindowEnd,
        }
    }

    /// 衰变常数（1/秒）
    pub fn decay_constant(&self) -> AnalysisResult<f64> {
        decay_constant_from_half_life(self.half_life_seconds)
    }

    /// 用于报告显示的核素标签
    pub fn label(&self) -> String {
        match self.isotope {
            Some(iso) => iso.label().to_string(),
            None => format!("T½={:.2} min", self.half_life_seconds / 60.0),
        }
    }
}

/// JSON配置文件 / 命令行中的检测参数覆盖项
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionOverrides {
    pub min_height: Option<f64>,
    pub min_distance: Option<usize>,
    pub min_prominence: Option<f64>,
    pub min_width: Option<f64>,
    pub rel_height: Option<f64>,
}

impl DetectionOverrides {
    /// 从JSON文件读取（字段均可省略）
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| config_error(&format!("配置文件 / config file {}", path.display()), e))
    }

    pub fn apply_to(&self, config: &mut DetectionConfig) {
        if let Some(v) = self.min_height {
            config.min_height = v;
        }
        if let Some(v) = self.min_distance {
            config.min_distance = v;
        }
        if let Some(v) = self.min_prominence {
            config.min_prominence = v;
        }
        if let Some(v) = self.min_width {
            config.min_width = v;
        }
        if let Some(v) = self.rel_height {
            config.rel_height = v;
        }
    }
}

/// 命令行工具使用的默认检测参数
pub fn default_detection_config() -> DetectionConfig {
    DetectionConfig {
        min_height: detection_defaults::MIN_HEIGHT,
        min_distance: detection_defaults::MIN_DISTANCE,
        min_prominence: detection_defaults::MIN_PROMINENCE,
        min_width: detection_defaults::MIN_WIDTH,
        rel_height: detection_defaults::REL_HEIGHT,
    }
}

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件路径（单文件模式）或扫描目录（批量模式）
    pub input_path: PathBuf,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 输出文件路径（可选，批量模式时自动生成）
    pub output_path: Option<PathBuf>,

    pub output_format: OutputFormat,

    pub detection: DetectionConfig,

    pub decay: DecaySettings,

    pub loader: LoaderOptions,

    /// 多文件并行度（None 表示串行）
    pub parallel_files: Option<usize>,
}

impl AppConfig {
    /// 以默认参数为输入路径创建配置
    pub fn with_defaults(input_path: PathBuf) -> Self {
        Self {
            input_path,
            verbose: false,
            output_path: None,
            output_format: OutputFormat::default(),
            detection: default_detection_config(),
            decay: DecaySettings::from_isotope(Isotope::F18),
            loader: LoaderOptions::default(),
            parallel_files: Some(defaults::PARALLEL_FILES_DEGREE),
        }
    }

    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("radio-hplc-purity")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("Radio-HPLC Analyzer Team")
        .arg(
            Arg::new("INPUT")
                .help("检测器CSV文件或目录路径 / detector CSV file or directory")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("isotope")
                .long("isotope")
                .short('i')
                .help("核素 (18F, 11C, 13N, 15O, 68Ga, 64Cu) / radionuclide")
                .value_name("ISOTOPE")
                .default_value(input_defaults::ISOTOPE),
        )
        .arg(
            Arg::new("half-life-min")
                .long("half-life-min")
                .help("直接指定半衰期（分钟），优先于 --isotope / half-life in minutes")
                .value_name("MINUTES")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("decay-reference")
                .long("decay-reference")
                .help("衰变参考点 / decay reference: window-end | run-start")
                .value_name("REF")
                .default_value("window-end"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("检测参数JSON文件 / detection parameter JSON file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("min-height")
                .long("min-height")
                .value_name("VALUE")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("min-distance")
                .long("min-distance")
                .value_name("SAMPLES")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("min-prominence")
                .long("min-prominence")
                .value_name("VALUE")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("min-width")
                .long("min-width")
                .value_name("SAMPLES")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("rel-height")
                .long("rel-height")
                .value_name("FRACTION")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("signal-column")
                .long("signal-column")
                .help("信号列名匹配片段 / substring of the signal column name")
                .value_name("HINT")
                .default_value(input_defaults::SIGNAL_COLUMN_HINT),
        )
        .arg(
            Arg::new("time-column")
                .long("time-column")
                .value_name("NAME")
                .default_value(input_defaults::TIME_COLUMN),
        )
        .arg(
            Arg::new("time-format")
                .long("time-format")
                .value_name("FORMAT")
                .default_value(input_defaults::TIME_FORMAT),
        )
        .arg(
            Arg::new("encoding")
                .long("encoding")
                .help("非UTF-8文件的编码 / encoding for non-UTF-8 files")
                .value_name("LABEL")
                .default_value(input_defaults::ENCODING),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("输出格式 / output format: text | table | json")
                .value_name("FORMAT")
                .default_value("text"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出结果到文件")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("parallel-files")
                .long("parallel-files")
                .help("批量模式并行文件数 / files processed in parallel")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .help("批量模式串行处理 / process batch serially")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("parallel-files"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(clap::ArgAction::SetTrue),
        )
}

/// 解析进程命令行参数并创建配置
pub fn parse_args() -> AnalysisResult<AppConfig> {
    config_from_matches(&build_command().get_matches())
}

/// 解析给定参数列表（首项为程序名）
pub fn parse_args_from<I, T>(args: I) -> AnalysisResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| config_error("命令行参数 / command line", e))?;
    config_from_matches(&matches)
}

fn config_from_matches(matches: &ArgMatches) -> AnalysisResult<AppConfig> {
    let input_path = matches
        .get_one::<String>("INPUT")
        .map(PathBuf::from)
        .ok_or_else(|| AnalysisError::InvalidConfig("缺少输入路径 / missing INPUT".to_string()))?;

    let mut detection = default_detection_config();
    if let Some(path) = matches.get_one::<String>("config") {
        DetectionOverrides::load(Path::new(path))?.apply_to(&mut detection);
    }
    DetectionOverrides {
        min_height: matches.get_one::<f64>("min-height").copied(),
        min_distance: matches.get_one::<usize>("min-distance").copied(),
        min_prominence: matches.get_one::<f64>("min-prominence").copied(),
        min_width: matches.get_one::<f64>("min-width").copied(),
        rel_height: matches.get_one::<f64>("rel-height").copied(),
    }
    .apply_to(&mut detection);
    detection.validate()?;

    let mut decay = match matches.get_one::<f64>("half-life-min") {
        Some(&minutes) => DecaySettings {
            isotope: None,
            half_life_seconds: minutes * 60.0,
            reference: DecayReference::WindowEnd,
        },
        None => {
            let label = matches
                .get_one::<String>("isotope")
                .map(String::as_str)
                .unwrap_or(input_defaults::ISOTOPE);
            DecaySettings::from_isotope(label.parse()?)
        }
    };
    if let Some(reference) = matches.get_one::<String>("decay-reference") {
        decay.reference = reference.parse()?;
    }
    // 提前校验半衰期
    decay.decay_constant()?;

    let output_format = matches
        .get_one::<String>("format")
        .map(|s| s.parse::<OutputFormat>())
        .transpose()
        .map_err(AnalysisError::InvalidConfig)?
        .unwrap_or_default();

    let loader = LoaderOptions {
        time_column: string_arg(matches, "time-column", input_defaults::TIME_COLUMN),
        signal_column_hint: string_arg(
            matches,
            "signal-column",
            input_defaults::SIGNAL_COLUMN_HINT,
        ),
        time_format: string_arg(matches, "time-format", input_defaults::TIME_FORMAT),
        encoding: string_arg(matches, "encoding", input_defaults::ENCODING),
    };

    let parallel_files = if matches.get_flag("serial") {
        None
    } else {
        Some(
            matches
                .get_one::<usize>("parallel-files")
                .copied()
                .unwrap_or(defaults::PARALLEL_FILES_DEGREE),
        )
    };

    Ok(AppConfig {
        input_path,
        verbose: matches.get_flag("verbose"),
        output_path: matches.get_one::<String>("output").map(PathBuf::from),
        output_format,
        detection,
        decay,
        loader,
        parallel_files,
    })
}

fn string_arg(matches: &ArgMatches, id: &str, fallback: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("Radio-HPLC Purity Analyzer v{VERSION}");
    println!("{DESCRIPTION}");
    if config.verbose {
        let d = &config.detection;
        println!(
            "[INFO] 核素 / Isotope: {} ({}), 参考 / reference: {}",
            config.decay.label(),
            config
                .decay
                .decay_constant()
                .map(|l| format!("λ={l:.3e} s⁻¹"))
                .unwrap_or_default(),
            config.decay.reference
        );
        println!(
            "[INFO] 检测参数 / Detection: height>={}, distance>={}, prominence>={}, width>={}, rel_height={}",
            d.min_height, d.min_distance, d.min_prominence, d.min_width, d.rel_height
        );
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("[OK] 所有任务处理完成 / All tasks completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_args() {
        let config = parse_args_from(["radio-hplc-purity", "run.csv"]).unwrap();
        assert_eq!(config.input_path, PathBuf::from("run.csv"));
        assert_eq!(config.detection, default_detection_config());
        assert_eq!(config.decay.isotope, Some(Isotope::F18));
        assert_eq!(config.decay.reference, DecayReference::WindowEnd);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.parallel_files, Some(defaults::PARALLEL_FILES_DEGREE));
        assert_eq!(config.loader.time_column, "日時");
    }

    #[test]
    fn test_overrides_and_half_life() {
        let config = parse_args_from([
            "radio-hplc-purity",
            "run.csv",
            "--min-distance",
            "3",
            "--rel-height",
            "0.5",
            "--half-life-min",
            "20.33",
            "--decay-reference",
            "run-start",
            "--format",
            "json",
            "--serial",
        ])
        .unwrap();
        assert_eq!(config.detection.min_distance, 3);
        assert_eq!(config.detection.rel_height, 0.5);
        assert_eq!(config.decay.isotope, None);
        assert!((config.decay.half_life_seconds - 20.33 * 60.0).abs() < 1e-9);
        assert_eq!(config.decay.reference, DecayReference::RunStart);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.parallel_files, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            parse_args_from(["radio-hplc-purity", "run.csv", "--rel-height", "1.5"]),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_args_from(["radio-hplc-purity", "run.csv", "--isotope", "99mTc"]),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_args_from(["radio-hplc-purity", "run.csv", "--half-life-min", "0"]),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(parse_args_from(["radio-hplc-purity", "run.csv", "--min-distance", "-3"]).is_err());
    }

    #[test]
    fn test_partial_json_overrides() {
        let overrides: DetectionOverrides =
            serde_json::from_str(r#"{"min_height": 50, "rel_height": 0.6}"#).unwrap();
        let mut config = default_detection_config();
        overrides.apply_to(&mut config);
        assert_eq!(config.min_height, 50.0);
        assert_eq!(config.rel_height, 0.6);
        assert_eq!(config.min_distance, detection_defaults::MIN_DISTANCE);

        assert!(serde_json::from_str::<DetectionOverrides>(r#"{"height": 1}"#).is_err());
    }
}
