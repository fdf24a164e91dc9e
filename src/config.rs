use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub augment: AugmentConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Panoptic データセットのルート
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// 出力 JSON のパス
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// 3Dポーズフォルダを識別するパス文字列
    #[serde(default = "default_marker")]
    pub marker: String,
    /// フレーム間引き（2 = 1フレームおき）
    #[serde(default = "default_frame_step")]
    pub frame_step: usize,
    /// データ拡張の乱数シード（未指定なら実行ごとに変わる）
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_input_dir() -> PathBuf { PathBuf::from("./panoptic_dataset") }
fn default_output_path() -> PathBuf { PathBuf::from("./data/panoptic_dataset.json") }
fn default_marker() -> String { "hdPose3d_stage1".to_string() }
fn default_frame_step() -> usize { 2 }

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_path: default_output_path(),
            marker: default_marker(),
            frame_step: default_frame_step(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AugmentConfig {
    /// 回転拡張の最大角度（度）。[-max, +max] から一様に選ぶ
    #[serde(default = "default_max_rotation_deg")]
    pub max_rotation_deg: f64,
    /// ノイズ幅 = 先頭骨格の標準偏差 / noise_divisor
    #[serde(default = "default_noise_divisor")]
    pub noise_divisor: f64,
}

fn default_max_rotation_deg() -> f64 { 20.0 }
fn default_noise_divisor() -> f64 { 10.0 }

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            max_rotation_deg: default_max_rotation_deg(),
            noise_divisor: default_noise_divisor(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewConfig {
    /// 表示するサンプル数
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_window_width")]
    pub width: usize,
    #[serde(default = "default_window_height")]
    pub height: usize,
    /// 各パネルの表示範囲 [-limit, limit]
    #[serde(default = "default_axis_limit")]
    pub axis_limit: f64,
    /// 3Dビューの方位角（度）
    #[serde(default = "default_azimuth_deg")]
    pub azimuth_deg: f64,
    /// 3Dビューの仰角（度）
    #[serde(default = "default_elevation_deg")]
    pub elevation_deg: f64,
}

fn default_samples() -> usize { 2 }
fn default_window_width() -> usize { 800 }
fn default_window_height() -> usize { 800 }
fn default_axis_limit() -> f64 { 2.0 }
fn default_azimuth_deg() -> f64 { -45.0 }
fn default_elevation_deg() -> f64 { 10.0 }

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            width: default_window_width(),
            height: default_window_height(),
            axis_limit: default_axis_limit(),
            azimuth_deg: default_azimuth_deg(),
            elevation_deg: default_elevation_deg(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// ファイルが無い場合だけデフォルト値を使う
    ///
    /// 存在するが読めない・壊れている・検証に失敗する場合はエラー。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found; using default settings", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset.frame_step == 0 {
            bail!("dataset.frame_step must be at least 1");
        }
        if !(self.augment.max_rotation_deg >= 0.0 && self.augment.max_rotation_deg.is_finite()) {
            bail!("augment.max_rotation_deg must be a non-negative number");
        }
        if !(self.augment.noise_divisor > 0.0 && self.augment.noise_divisor.is_finite()) {
            bail!("augment.noise_divisor must be positive");
        }
        if self.review.axis_limit <= 0.0 {
            bail!("review.axis_limit must be positive");
        }
        Ok(())
    }
}
