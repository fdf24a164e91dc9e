//! データセット生成で発生するエラー型

use std::fmt;
use std::path::PathBuf;

use crate::pose::JointIndex;

/// 幾何計算の退化ケース
///
/// NaN/Inf を後段に流さず、ここで明示的に失敗させる。
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// 長さゼロ（または非有限）のベクトルで角度が定義できない
    ZeroLengthVector,
    /// 左右の肩が同一点でスケールが決まらない
    DegenerateShoulders { distance: f64 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthVector => write!(f, "Geometry error: angle undefined for zero-length vector"),
            Self::DegenerateShoulders { distance } => {
                write!(f, "Geometry error: degenerate shoulder distance {distance}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// フレームファイルの入力検証エラー
#[derive(Debug)]
pub enum FrameError {
    /// JSONとして読めない、または `bodies` が無い
    Parse { path: PathBuf, source: serde_json::Error },
    /// `joints19` の要素数が 19×4 でない
    JointCount { path: PathBuf, body: usize, found: usize },
    /// 座標または信頼度に NaN/Inf が含まれる
    NonFinite { path: PathBuf, body: usize, joint: JointIndex },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { path, source } => {
                write!(f, "Invalid frame file {}: {source}", path.display())
            }
            Self::JointCount { path, body, found } => write!(
                f,
                "Invalid frame file {}: body {body} has {found} joint values, expected {}",
                path.display(),
                crate::pose::RAW_VALUE_COUNT
            ),
            Self::NonFinite { path, body, joint } => write!(
                f,
                "Invalid frame file {}: body {body} joint {joint:?} has non-finite values",
                path.display()
            ),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
