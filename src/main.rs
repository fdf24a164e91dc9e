use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use panoptic_pose_dataset::config::Config;
use panoptic_pose_dataset::dataset::{generate_dataset, DatasetBuilder};
use panoptic_pose_dataset::logging;

/// CMU Panoptic の骨格フレームから 3D/2D ポーズデータセットを生成
#[derive(Parser, Debug)]
#[command(name = "panoptic-pose-dataset", version, about)]
struct Args {
    /// 設定ファイル (TOML)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Panoptic データセットのルート（設定より優先）
    #[arg(long)]
    input: Option<PathBuf>,
    /// 出力 JSON のパス（設定より優先）
    #[arg(long)]
    output: Option<PathBuf>,
    /// 3Dポーズフォルダのマーカー文字列
    #[arg(long)]
    marker: Option<String>,
    /// フレーム間引き間隔
    #[arg(long)]
    frame_step: Option<usize>,
    /// データ拡張の乱数シード
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.dataset.input_dir = input;
        }
        if let Some(output) = self.output {
            config.dataset.output_path = output;
        }
        if let Some(marker) = self.marker {
            config.dataset.marker = marker;
        }
        if let Some(step) = self.frame_step {
            config.dataset.frame_step = step;
        }
        if self.seed.is_some() {
            config.dataset.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    println!("=== Panoptic Pose Dataset ===");
    println!("Input:  {}", config.dataset.input_dir.display());
    println!("Output: {}", config.dataset.output_path.display());
    println!("Marker: {}, frame step: {}", config.dataset.marker, config.dataset.frame_step);
    match config.dataset.seed {
        Some(seed) => println!("Seed:   {}", seed),
        None => println!("Seed:   (random)"),
    }
    println!();

    let mut rng = match config.dataset.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let builder = DatasetBuilder::from_config(&config)?;
    let dataset = generate_dataset(&config.dataset, &builder, &mut rng)?;

    println!("Samples: {} (3D) / {} (2D)", dataset.skeletons_3d.len(), dataset.skeletons_2d.len());
    Ok(())
}
