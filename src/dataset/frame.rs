use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FrameError;
use crate::pose::{raw_joint, raw_skeleton_from_flat, JointIndex, RawSkeleton};

/// Panoptic の 1フレーム (`body3DScene_XXXXXXXX.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default, rename = "univTime")]
    pub univ_time: Option<f64>,
    pub bodies: Vec<Body>,
}

/// フレーム内の1人分
#[derive(Debug, Clone, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub id: Option<i64>,
    /// 19関節 × (x, y, z, confidence) のフラット配列
    pub joints19: Vec<f64>,
}

/// 読み込み元のパス付きフレーム
#[derive(Debug, Clone)]
pub struct FrameFile {
    pub path: PathBuf,
    pub frame: Frame,
}

impl FrameFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read frame file {}", path.display()))?;
        let frame = Self::parse(path, &content)?;
        Ok(Self {
            path: path.to_path_buf(),
            frame,
        })
    }

    pub fn parse(path: &Path, content: &str) -> Result<Frame, FrameError> {
        serde_json::from_str(content).map_err(|source| FrameError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 全ボディの生関節行列
    ///
    /// 要素数不足や NaN を含むボディがあればファイル名付きで失敗する。
    pub fn raw_skeletons(&self) -> Result<Vec<RawSkeleton>, FrameError> {
        self.frame
            .bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                let raw = raw_skeleton_from_flat(&body.joints19).ok_or_else(|| FrameError::JointCount {
                    path: self.path.clone(),
                    body: i,
                    found: body.joints19.len(),
                })?;
                if let Some(joint) = first_non_finite_joint(&raw) {
                    return Err(FrameError::NonFinite {
                        path: self.path.clone(),
                        body: i,
                        joint,
                    });
                }
                Ok(raw)
            })
            .collect()
    }
}

/// 位置か信頼度が NaN/Inf の最初の関節
fn first_non_finite_joint(raw: &RawSkeleton) -> Option<JointIndex> {
    (0..JointIndex::COUNT).filter_map(JointIndex::from_index).find(|&index| {
        let joint = raw_joint(raw, index);
        !joint.position().iter().all(|v| v.is_finite()) || !joint.confidence.map_or(true, f64::is_finite)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joints_json(count: usize) -> String {
        let values: Vec<String> = (0..count).map(|v| format!("{}.5", v)).collect();
        values.join(", ")
    }

    #[test]
    fn test_parse_frame() {
        let json = format!(
            r#"{{"version": 0.7, "univTime": 53541.542, "fpsType": "hd_29_97",
                "bodies": [{{"id": 0, "joints19": [{}]}}]}}"#,
            joints_json(76)
        );
        let path = Path::new("body3DScene_00000100.json");
        let frame = FrameFile::parse(path, &json).unwrap();
        assert_eq!(frame.version, Some(0.7));
        assert_eq!(frame.bodies.len(), 1);
        assert_eq!(frame.bodies[0].id, Some(0));

        let file = FrameFile { path: path.to_path_buf(), frame };
        let raws = file.raw_skeletons().unwrap();
        assert_eq!(raws.len(), 1);
        let neck = raw_joint(&raws[0], JointIndex::Neck);
        assert_eq!((neck.x, neck.y, neck.z), (0.5, 1.5, 2.5));
        assert_eq!(neck.confidence, Some(3.5));
    }

    #[test]
    fn test_parse_frame_without_bodies_key() {
        let err = FrameFile::parse(Path::new("broken.json"), r#"{"version": 0.7}"#).unwrap_err();
        assert!(matches!(err, FrameError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
        assert!(err.to_string().contains("bodies"));
    }

    #[test]
    fn test_parse_frame_empty_bodies() {
        let frame = FrameFile::parse(Path::new("empty.json"), r#"{"bodies": []}"#).unwrap();
        let file = FrameFile { path: PathBuf::from("empty.json"), frame };
        assert!(file.raw_skeletons().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_joint_count() {
        let json = format!(
            r#"{{"bodies": [{{"joints19": [{}]}}, {{"joints19": [{}]}}]}}"#,
            joints_json(76),
            joints_json(60)
        );
        let path = Path::new("short.json");
        let frame = FrameFile::parse(path, &json).unwrap();
        let file = FrameFile { path: path.to_path_buf(), frame };
        match file.raw_skeletons().unwrap_err() {
            FrameError::JointCount { path, body, found } => {
                assert_eq!(path, PathBuf::from("short.json"));
                assert_eq!(body, 1);
                assert_eq!(found, 60);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn file_with_values(values: Vec<f64>) -> FrameFile {
        FrameFile {
            path: PathBuf::from("body3DScene_00000007.json"),
            frame: Frame {
                version: Some(0.7),
                univ_time: None,
                bodies: vec![Body { id: Some(0), joints19: values }],
            },
        }
    }

    #[test]
    fn test_non_finite_coordinate_names_joint() {
        // JSON では NaN を書けないので構造体を直接組み立てる
        let mut values = vec![1.0; 76];
        values[4 * JointIndex::LeftWrist as usize + 1] = f64::NAN;
        match file_with_values(values).raw_skeletons().unwrap_err() {
            FrameError::NonFinite { path, body, joint } => {
                assert_eq!(path, PathBuf::from("body3DScene_00000007.json"));
                assert_eq!(body, 0);
                assert_eq!(joint, JointIndex::LeftWrist);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_confidence_is_rejected() {
        let mut values = vec![1.0; 76];
        values[4 * JointIndex::RightEar as usize + 3] = f64::INFINITY;
        let err = file_with_values(values).raw_skeletons().unwrap_err();
        assert!(matches!(err, FrameError::NonFinite { joint: JointIndex::RightEar, .. }));
    }

    #[test]
    fn test_finite_values_pass() {
        assert_eq!(file_with_values(vec![1.0; 76]).raw_skeletons().unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FrameFile::load(Path::new("/nonexistent/hdPose3d_stage1/x.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/hdPose3d_stage1/x.json"));
    }
}
