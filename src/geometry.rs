use nalgebra::{SVector, UnitQuaternion, Vector3};

use crate::error::GeometryError;

/// 2ベクトル間の符号なし角度（ラジアン）
///
/// 正規化した内積を [-1, 1] にクランプしてから acos を取る。
/// どちらかが長さゼロ（または非有限）なら角度は定義できないのでエラー。
pub fn angle_between<const D: usize>(
    a: &SVector<f64, D>,
    b: &SVector<f64, D>,
) -> Result<f64, GeometryError> {
    let a_unit = unit_vector(a)?;
    let b_unit = unit_vector(b)?;
    Ok(a_unit.dot(&b_unit).clamp(-1.0, 1.0).acos())
}

fn unit_vector<const D: usize>(v: &SVector<f64, D>) -> Result<SVector<f64, D>, GeometryError> {
    let norm = v.norm();
    if !norm.is_finite() || norm <= f64::EPSILON {
        return Err(GeometryError::ZeroLengthVector);
    }
    Ok(v / norm)
}

/// 鉛直軸 (Y) まわりの回転クォータニオン
pub fn yaw_rotation(radians: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), radians)
}

/// 水平軸 (X) まわりの回転クォータニオン（ビューアのカメラ仰角用）
pub fn pitch_rotation(radians: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), radians)
}
