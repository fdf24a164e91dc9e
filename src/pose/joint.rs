use nalgebra::{SMatrix, Vector3};

/// CMU Panoptic の 19 関節インデックス (`joints19`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointIndex {
    /// 正規化後は両肩の中点（原点）に置き換わる
    Neck = 0,
    Nose = 1,
    BodyCenter = 2,
    LeftShoulder = 3,
    LeftElbow = 4,
    LeftWrist = 5,
    LeftHip = 6,
    LeftKnee = 7,
    LeftAnkle = 8,
    RightShoulder = 9,
    RightElbow = 10,
    RightWrist = 11,
    RightHip = 12,
    RightKnee = 13,
    RightAnkle = 14,
    LeftEye = 15,
    LeftEar = 16,
    RightEye = 17,
    RightEar = 18,
}

impl JointIndex {
    pub const COUNT: usize = 19;

    pub fn from_index(index: usize) -> Option<Self> {
        use JointIndex::*;
        const ALL: [JointIndex; JointIndex::COUNT] = [
            Neck, Nose, BodyCenter,
            LeftShoulder, LeftElbow, LeftWrist, LeftHip, LeftKnee, LeftAnkle,
            RightShoulder, RightElbow, RightWrist, RightHip, RightKnee, RightAnkle,
            LeftEye, LeftEar, RightEye, RightEar,
        ];
        ALL.get(index).copied()
    }
}

/// 1関節あたりの生データ値数 (x, y, z, confidence)
pub const RAW_ROWS: usize = 4;

/// `joints19` 配列の要素数
pub const RAW_VALUE_COUNT: usize = RAW_ROWS * JointIndex::COUNT;

/// 生の関節行列（行: x, y, z, confidence / 列: 関節）
pub type RawSkeleton = SMatrix<f64, RAW_ROWS, { JointIndex::COUNT }>;

/// 3D骨格（行: x, y, z / 列: 関節）
pub type Skeleton3d = SMatrix<f64, 3, { JointIndex::COUNT }>;

/// 2D骨格（行: x, y / 列: 関節）
pub type Skeleton2d = SMatrix<f64, 2, { JointIndex::COUNT }>;

/// 単一関節（信頼度付き）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub confidence: Option<f64>,
}

impl Joint {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// フラットな `joints19` 配列（関節ごとに x, y, z, c）から行列を組み立てる
///
/// 要素数が合わなければ None。
pub fn raw_skeleton_from_flat(values: &[f64]) -> Option<RawSkeleton> {
    if values.len() != RAW_VALUE_COUNT {
        return None;
    }
    // 列優先ストレージなので、関節ごとの4値がそのまま1列になる
    Some(RawSkeleton::from_column_slice(values))
}

/// 生行列から関節を取り出す
pub fn raw_joint(raw: &RawSkeleton, index: JointIndex) -> Joint {
    let col = raw.column(index as usize);
    Joint {
        x: col[0],
        y: col[1],
        z: col[2],
        confidence: Some(col[3]),
    }
}

/// 3D骨格の関節位置
pub fn joint_position(skel: &Skeleton3d, index: JointIndex) -> Vector3<f64> {
    skel.column(index as usize).into_owned()
}

/// 両肩間のユークリッド距離
pub fn shoulder_distance(skel: &Skeleton3d) -> f64 {
    (joint_position(skel, JointIndex::LeftShoulder) - joint_position(skel, JointIndex::RightShoulder)).norm()
}
