use nalgebra::Vector2;

use crate::error::GeometryError;
use crate::geometry::{angle_between, yaw_rotation};
use crate::pose::joint::{joint_position, JointIndex, RawSkeleton, Skeleton3d};
use crate::pose::rotate::rotate_by_quaternion;

/// 正面向きの基準方向（XZ平面上の 左肩 - 右肩）
const FRONTAL_REFERENCE: [f64; 2] = [-1.0, 0.0];

/// 生の関節行列（信頼度行付き）を正規化した3D骨格に変換
///
/// 入力は変更せず、新しい骨格を返す。
pub fn normalize_skeleton(raw: &RawSkeleton) -> Result<Skeleton3d, GeometryError> {
    let positions: Skeleton3d = raw.fixed_rows::<3>(0).into_owned();
    normalize_positions(&positions)
}

/// 3D骨格を正規化する
///
/// 1. 両肩の中点をアンカーとし、Neck をアンカーで上書き
/// 2. アンカーを原点へ平行移動し、肩幅で割って単位スケールに
/// 3. 肩ラインの XZ 成分が基準方向に揃うよう Y 軸まわりに回転
///
/// 正規化後: Neck = 原点、肩幅 = 1、肩ラインは -X 方向。
pub fn normalize_positions(positions: &Skeleton3d) -> Result<Skeleton3d, GeometryError> {
    let mut skel = *positions;

    let left = joint_position(&skel, JointIndex::LeftShoulder);
    let right = joint_position(&skel, JointIndex::RightShoulder);
    let anchor = (left + right) / 2.0;
    skel.set_column(JointIndex::Neck as usize, &anchor);

    let scale = (left - right).norm();
    if !scale.is_finite() || scale <= f64::EPSILON {
        return Err(GeometryError::DegenerateShoulders { distance: scale });
    }

    for j in 0..JointIndex::COUNT {
        let p = (skel.column(j) - anchor) / scale;
        skel.set_column(j, &p);
    }

    let yaw = frontal_yaw(&skel)?;
    Ok(rotate_by_quaternion(&skel, &yaw_rotation(yaw)))
}

/// 肩ラインを基準方向に合わせるための Y 軸回転角（ラジアン）
///
/// 角度そのものは符号なしなので、肩ベクトルの Z 成分から回転方向を決める。
/// 肩ラインが鉛直（XZ成分ゼロ）だと角度が定義できずエラー。
pub fn frontal_yaw(skel: &Skeleton3d) -> Result<f64, GeometryError> {
    let shoulder = joint_position(skel, JointIndex::LeftShoulder) - joint_position(skel, JointIndex::RightShoulder);
    let planar = Vector2::new(shoulder.x, shoulder.z);
    let angle = angle_between(&planar, &Vector2::from(FRONTAL_REFERENCE))?;
    Ok(if planar.y > 0.0 { -angle } else { angle })
}
