use anyhow::{bail, Context, Result};
use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::pose::{JointIndex, Skeleton2d, Skeleton3d};

/// 対応する 3D / 2D 骨格の並列シーケンス
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseDataset {
    pub skeletons_3d: Vec<Skeleton3d>,
    pub skeletons_2d: Vec<Skeleton2d>,
}

/// ディスク上の表現: 各行列は行（軸）のリスト
#[derive(Serialize, Deserialize)]
struct DatasetFile {
    #[serde(rename = "3d")]
    skeletons_3d: Vec<Vec<Vec<f64>>>,
    #[serde(rename = "2d")]
    skeletons_2d: Vec<Vec<Vec<f64>>>,
}

impl PoseDataset {
    pub fn new(skeletons_3d: Vec<Skeleton3d>, skeletons_2d: Vec<Skeleton2d>) -> Result<Self> {
        if skeletons_3d.len() != skeletons_2d.len() {
            bail!(
                "3D and 2D sequences differ in length ({} vs {})",
                skeletons_3d.len(),
                skeletons_2d.len()
            );
        }
        Ok(Self {
            skeletons_3d,
            skeletons_2d,
        })
    }

    pub fn len(&self) -> usize {
        self.skeletons_3d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skeletons_3d.is_empty()
    }

    /// i 番目の (3D, 2D) ペア
    pub fn get(&self, index: usize) -> Option<(&Skeleton3d, &Skeleton2d)> {
        Some((self.skeletons_3d.get(index)?, self.skeletons_2d.get(index)?))
    }

    /// JSON で保存
    ///
    /// 一時ファイルに書いてからリネームするので、失敗時に中途半端なファイルは残らない。
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }

        let file = DatasetFile {
            skeletons_3d: self.skeletons_3d.iter().map(matrix_rows).collect(),
            skeletons_2d: self.skeletons_2d.iter().map(matrix_rows).collect(),
        };

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        let write_result = (|| -> Result<()> {
            let mut writer = BufWriter::new(File::create(tmp_path)?);
            serde_json::to_writer(&mut writer, &file)?;
            writer.flush()?;
            Ok(())
        })();
        if let Err(e) = write_result {
            let _ = fs::remove_file(tmp_path);
            return Err(e.context(format!("Failed to write dataset {}", path.display())));
        }

        fs::rename(tmp_path, path)
            .with_context(|| format!("Failed to move dataset into place at {}", path.display()))?;
        Ok(())
    }

    /// 保存済みデータセットを読み込み、形状を検証する
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("Failed to open dataset {}", path.display()))?,
        );
        let file: DatasetFile = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

        let skeletons_3d = file
            .skeletons_3d
            .iter()
            .enumerate()
            .map(|(i, rows)| matrix_from_rows(rows).with_context(|| format!("3d[{i}]")))
            .collect::<Result<Vec<Skeleton3d>>>()?;
        let skeletons_2d = file
            .skeletons_2d
            .iter()
            .enumerate()
            .map(|(i, rows)| matrix_from_rows(rows).with_context(|| format!("2d[{i}]")))
            .collect::<Result<Vec<Skeleton2d>>>()?;

        Self::new(skeletons_3d, skeletons_2d).with_context(|| format!("Invalid dataset {}", path.display()))
    }
}

fn matrix_rows<const R: usize>(m: &SMatrix<f64, R, { JointIndex::COUNT }>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

fn matrix_from_rows<const R: usize>(rows: &[Vec<f64>]) -> Result<SMatrix<f64, R, { JointIndex::COUNT }>> {
    if rows.len() != R {
        bail!("expected {} rows, found {}", R, rows.len());
    }
    if let Some(row) = rows.iter().find(|row| row.len() != JointIndex::COUNT) {
        bail!("expected {} joints per row, found {}", JointIndex::COUNT, row.len());
    }
    Ok(SMatrix::from_fn(|r, c| rows[r][c]))
}
