use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use panoptic_pose_dataset::config::Config;
use panoptic_pose_dataset::dataset::PoseDataset;
use panoptic_pose_dataset::logging;
use panoptic_pose_dataset::render::{draw_review, pick_samples, Canvas, Key, MinifbViewer};

/// 生成済みデータセットからランダムなサンプルを表示
#[derive(Parser, Debug)]
#[command(name = "review_dataset", version, about)]
struct Args {
    /// 設定ファイル (TOML)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// データセット JSON（省略時は設定の出力パス）
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// サンプル選択の乱数シード
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let config = Config::load_or_default(&args.config)?;
    let review = &config.review;

    let path = args.dataset.unwrap_or_else(|| config.dataset.output_path.clone());
    println!("Loading {}...", path.display());
    let dataset = PoseDataset::load(&path)?;
    if dataset.is_empty() {
        bail!("Dataset {} has no samples", path.display());
    }
    println!("{} samples", dataset.len());
    println!("操作: [Space] 別のサンプル  [Esc] 終了");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut canvas = Canvas::new(review.width, review.height);
    let mut viewer = MinifbViewer::new("Panoptic Dataset Review", review.width, review.height)?;

    let mut samples = pick_samples(&dataset, review.samples, &mut rng);
    println!("Samples: {:?}", samples);
    draw_review(&mut canvas, &dataset, &samples, review);

    while viewer.is_open() {
        if viewer.is_key_pressed(Key::Space) {
            samples = pick_samples(&dataset, review.samples, &mut rng);
            println!("Samples: {:?}", samples);
            draw_review(&mut canvas, &dataset, &samples, review);
        }
        viewer.present(&canvas)?;
    }

    Ok(())
}
