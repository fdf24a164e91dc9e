use rand::Rng;

use crate::config::ReviewConfig;
use crate::dataset::PoseDataset;
use crate::render::canvas::{Canvas, Panel, ViewCamera};

/// データセットからランダムにサンプルを選ぶ
///
/// 空なら空を返す。重複は許す。
pub fn pick_samples<R: Rng + ?Sized>(dataset: &PoseDataset, count: usize, rng: &mut R) -> Vec<usize> {
    if dataset.is_empty() {
        return Vec::new();
    }
    (0..count).map(|_| rng.gen_range(0..dataset.len())).collect()
}

/// 各行に1サンプル: 左に3Dビュー、右に2D投影
pub fn draw_review(canvas: &mut Canvas, dataset: &PoseDataset, samples: &[usize], config: &ReviewConfig) {
    canvas.clear();
    let rows = samples.len().max(1);
    let camera = ViewCamera {
        azimuth_deg: config.azimuth_deg,
        elevation_deg: config.elevation_deg,
    };

    for (row, &index) in samples.iter().enumerate() {
        let Some((skel_3d, skel_2d)) = dataset.get(index) else {
            tracing::warn!("Sample {} is out of range ({} samples)", index, dataset.len());
            continue;
        };
        let left = Panel::grid(canvas.width(), canvas.height(), rows, 2, row, 0);
        let right = Panel::grid(canvas.width(), canvas.height(), rows, 2, row, 1);

        canvas.draw_panel_frame(&left);
        canvas.draw_panel_frame(&right);
        canvas.draw_skeleton_3d(&left, skel_3d, &camera, config.axis_limit);
        canvas.draw_skeleton_2d(&right, skel_2d, config.axis_limit);
    }
}
