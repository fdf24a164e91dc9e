use anyhow::{Context, Result};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::augment::Augmenter;
use crate::config::{Config, DatasetConfig};
use crate::dataset::frame::FrameFile;
use crate::dataset::store::PoseDataset;
use crate::pose::{normalize_skeleton, project_skeleton, Skeleton3d};

/// Panoptic のディレクトリツリーからデータセットを組み立てる
pub struct DatasetBuilder {
    marker: String,
    frame_step: usize,
    augmenter: Augmenter,
}

impl DatasetBuilder {
    pub fn new(marker: impl Into<String>, frame_step: usize, augmenter: Augmenter) -> Self {
        Self {
            marker: marker.into(),
            frame_step: frame_step.max(1),
            augmenter,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.dataset.marker.clone(),
            config.dataset.frame_step,
            Augmenter::from_config(&config.augment)?,
        ))
    }

    /// マーカーを含むディレクトリ配下のフレームファイルを列挙
    ///
    /// 各ディレクトリのエントリは名前順。ディレクトリ自身のファイルを先に、
    /// サブディレクトリはその後に辿る。
    pub fn collect_frame_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk(root, &mut files)?;
        Ok(files)
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory {}", dir.display()))?
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Cannot list directory {}", dir.display()))?;
        entries.sort_by_key(|e| e.file_name());

        let is_pose_dir = dir.to_string_lossy().contains(&self.marker);
        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Cannot stat {}", path.display()))?;
            if file_type.is_dir() {
                subdirs.push(path);
            } else if is_pose_dir {
                files.push(path);
            }
        }

        for sub in subdirs {
            self.walk(&sub, files)?;
        }
        Ok(())
    }

    /// 全フレームを読み込んで検証してから `frame_step` ごとに間引く
    ///
    /// 間引かれる位置のファイルが壊れていてもエラーになる。
    pub fn load_frames(&self, files: &[PathBuf]) -> Result<Vec<FrameFile>> {
        let frames = files
            .iter()
            .map(|path| {
                tracing::debug!("Loading frame {}", path.display());
                FrameFile::load(path)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(frames.into_iter().step_by(self.frame_step).collect())
    }

    /// 全ボディを正規化
    pub fn normalize_frames(&self, frames: &[FrameFile]) -> Result<Vec<Skeleton3d>> {
        let mut skeletons = Vec::new();
        for frame in frames {
            if frame.frame.bodies.is_empty() {
                tracing::debug!("No bodies in {}", frame.path.display());
            }
            for (i, raw) in frame.raw_skeletons()?.iter().enumerate() {
                let skel = normalize_skeleton(raw)
                    .with_context(|| format!("Cannot normalize body {} in {}", i, frame.path.display()))?;
                skeletons.push(skel);
            }
        }
        Ok(skeletons)
    }

    /// ディレクトリツリーからデータセットを生成（保存はしない）
    pub fn build<R: Rng + ?Sized>(&self, root: &Path, rng: &mut R) -> Result<PoseDataset> {
        let files = self.collect_frame_files(root)?;
        if files.is_empty() {
            tracing::warn!("No frame files found under {} (marker \"{}\")", root.display(), self.marker);
        }
        let frames = self.load_frames(&files)?;
        tracing::info!("Loaded {} of {} frames", frames.len(), files.len());

        let mut skeletons_3d = self.normalize_frames(&frames)?;
        tracing::info!("Normalized {} skeletons", skeletons_3d.len());

        let augmented = self.augmenter.augment(&skeletons_3d, rng);
        skeletons_3d.extend(augmented);

        let skeletons_2d = skeletons_3d.iter().map(project_skeleton).collect();
        PoseDataset::new(skeletons_3d, skeletons_2d)
    }
}

/// データセットを生成して保存する
pub fn generate_dataset<R: Rng + ?Sized>(config: &DatasetConfig, builder: &DatasetBuilder, rng: &mut R) -> Result<PoseDataset> {
    let dataset = builder.build(&config.input_dir, rng)?;
    dataset.save(&config.output_path)?;
    tracing::info!("Saved {} samples to {}", dataset.len(), config.output_path.display());
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::pose::{joint_position, shoulder_distance, JointIndex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct TempTree {
        root: PathBuf,
    }

    impl TempTree {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!("panoptic_builder_{}_{}", std::process::id(), name));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    /// 手計算しやすい1人分の joints19
    fn body_json(shift: f64) -> String {
        let mut values = Vec::with_capacity(76);
        for j in 0..JointIndex::COUNT {
            let (x, y, z) = match j {
                3 => (shift + 20.0, -150.0, 5.0),
                9 => (shift - 20.0, -150.0, 5.0),
                _ => (shift + j as f64, -100.0 + 5.0 * j as f64, 5.0 + j as f64 * 0.5),
            };
            values.extend([x, y, z, 0.9]);
        }
        let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!(r#"{{"id": 0, "joints19": [{}]}}"#, joined.join(", "))
    }

    fn frame_json(bodies: &[String]) -> String {
        format!(r#"{{"version": 0.7, "univTime": 1.0, "bodies": [{}]}}"#, bodies.join(", "))
    }

    fn builder() -> DatasetBuilder {
        DatasetBuilder::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_collect_frame_files_sorted_and_filtered() {
        let tree = TempTree::new("collect");
        tree.write("seq_b/hdPose3d_stage1/body3DScene_00000002.json", "{}");
        tree.write("seq_b/hdPose3d_stage1/body3DScene_00000001.json", "{}");
        tree.write("seq_a/hdPose3d_stage1/body3DScene_00000005.json", "{}");
        tree.write("seq_a/hdImgs/00_00_00000001.jpg", "");
        tree.write("seq_a/calibration.json", "{}");

        let files = builder().collect_frame_files(&tree.root).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(&tree.root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            rel,
            vec![
                "seq_a/hdPose3d_stage1/body3DScene_00000005.json",
                "seq_b/hdPose3d_stage1/body3DScene_00000001.json",
                "seq_b/hdPose3d_stage1/body3DScene_00000002.json",
            ]
        );
    }

    #[test]
    fn test_collect_missing_root() {
        let err = builder().collect_frame_files(Path::new("/nonexistent/panoptic_dataset")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/panoptic_dataset"));
    }

    #[test]
    fn test_end_to_end_single_body() {
        let tree = TempTree::new("e2e");
        tree.write("seq/hdPose3d_stage1/body3DScene_00000000.json", &frame_json(&[body_json(0.0)]));

        let mut rng = StdRng::seed_from_u64(42);
        let dataset = builder().build(&tree.root, &mut rng).unwrap();

        assert_eq!(dataset.skeletons_3d.len(), 3);
        assert_eq!(dataset.skeletons_2d.len(), 3);

        let first = &dataset.skeletons_3d[0];
        assert!(joint_position(first, JointIndex::Neck).norm() < 1e-9);
        assert!((shoulder_distance(first) - 1.0).abs() < 1e-9);

        // 肩は X 軸上: 左肩 (-0.5, 0, 0), 右肩 (0.5, 0, 0)
        let left = joint_position(first, JointIndex::LeftShoulder);
        assert!((left - nalgebra::Vector3::new(-0.5, 0.0, 0.0)).norm() < 1e-9);

        for (s3, s2) in dataset.skeletons_3d.iter().zip(&dataset.skeletons_2d) {
            assert_eq!(project_skeleton(s3), *s2);
        }
        assert_eq!(joint_position(&dataset.skeletons_3d[2], JointIndex::Neck), nalgebra::Vector3::zeros());
    }

    #[test]
    fn test_frame_step_downsamples() {
        let tree = TempTree::new("step");
        for i in 0..5 {
            tree.write(
                &format!("seq/hdPose3d_stage1/body3DScene_{:08}.json", i),
                &frame_json(&[body_json(i as f64 * 100.0)]),
            );
        }
        // frames 0, 2, 4 → 3 bodies → 9 samples
        let mut rng = StdRng::seed_from_u64(1);
        let dataset = builder().build(&tree.root, &mut rng).unwrap();
        assert_eq!(dataset.len(), 9);

        let every = DatasetBuilder::new("hdPose3d_stage1", 1, Augmenter::default());
        let dataset = every.build(&tree.root, &mut rng).unwrap();
        assert_eq!(dataset.len(), 15);
    }

    #[test]
    fn test_skipped_frame_is_still_validated() {
        // frame_step = 2 では 00000001 は使われないが、壊れていればエラー
        let tree = TempTree::new("skipped");
        tree.write("seq/hdPose3d_stage1/body3DScene_00000000.json", &frame_json(&[body_json(0.0)]));
        tree.write("seq/hdPose3d_stage1/body3DScene_00000001.json", r#"{"version": 0.7}"#);
        tree.write("seq/hdPose3d_stage1/body3DScene_00000002.json", &frame_json(&[body_json(1.0)]));

        let mut rng = StdRng::seed_from_u64(1);
        let err = builder().build(&tree.root, &mut rng).unwrap_err();
        assert!(format!("{:#}", err).contains("body3DScene_00000001.json"));
    }

    #[test]
    fn test_from_config_rejects_invalid_augment() {
        let mut config = Config::default();
        config.augment.max_rotation_deg = -10.0;
        assert!(DatasetBuilder::from_config(&config).is_err());
    }

    #[test]
    fn test_multiple_bodies_and_empty_frames() {
        let tree = TempTree::new("multi");
        tree.write(
            "seq/hdPose3d_stage1/body3DScene_00000000.json",
            &frame_json(&[body_json(0.0), body_json(50.0)]),
        );
        tree.write("seq/hdPose3d_stage1/body3DScene_00000001.json", &frame_json(&[]));
        tree.write("seq/hdPose3d_stage1/body3DScene_00000002.json", &frame_json(&[]));

        let mut rng = StdRng::seed_from_u64(1);
        let dataset = builder().build(&tree.root, &mut rng).unwrap();
        assert_eq!(dataset.len(), 6);
    }

    #[test]
    fn test_invalid_frame_names_file() {
        let tree = TempTree::new("invalid");
        tree.write("seq/hdPose3d_stage1/body3DScene_00000000.json", r#"{"version": 0.7}"#);

        let mut rng = StdRng::seed_from_u64(1);
        let err = builder().build(&tree.root, &mut rng).unwrap_err();
        assert!(format!("{:#}", err).contains("body3DScene_00000000.json"));
    }

    #[test]
    fn test_degenerate_shoulders_is_geometry_error() {
        let tree = TempTree::new("degenerate");
        let values: Vec<String> = (0..76).map(|_| "1.0".to_string()).collect();
        let body = format!(r#"{{"joints19": [{}]}}"#, values.join(", "));
        tree.write("seq/hdPose3d_stage1/body3DScene_00000000.json", &frame_json(&[body]));

        let mut rng = StdRng::seed_from_u64(1);
        let err = builder().build(&tree.root, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeometryError>(),
            Some(GeometryError::DegenerateShoulders { .. })
        ));
    }

    #[test]
    fn test_generate_dataset_writes_output() {
        let tree = TempTree::new("generate");
        tree.write("seq/hdPose3d_stage1/body3DScene_00000000.json", &frame_json(&[body_json(3.0)]));

        let config = DatasetConfig {
            input_dir: tree.root.clone(),
            output_path: tree.root.join("data").join("panoptic_dataset.json"),
            ..DatasetConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let dataset = generate_dataset(&config, &builder(), &mut rng).unwrap();

        let loaded = PoseDataset::load(&config.output_path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.len(), dataset.len());
    }
}
