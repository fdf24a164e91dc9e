use nalgebra::UnitQuaternion;

use crate::geometry::yaw_rotation;
use crate::pose::joint::Skeleton3d;

/// 骨格を鉛直軸まわりに `degrees` 度回転した新しい骨格を返す（データ拡張用）
pub fn rotate_skeleton(skel: &Skeleton3d, degrees: f64) -> Skeleton3d {
    rotate_by_quaternion(skel, &yaw_rotation(degrees.to_radians()))
}

/// 全関節に回転を適用
pub fn rotate_by_quaternion(skel: &Skeleton3d, rotation: &UnitQuaternion<f64>) -> Skeleton3d {
    rotation.to_rotation_matrix().matrix() * skel
}
