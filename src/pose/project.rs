use crate::pose::joint::{Skeleton2d, Skeleton3d};

/// 正面向きに正規化済みの3D骨格を2Dに投影する
///
/// 正規化で正面を向いているので、Z を落とすだけでよい。
/// 入力が正規化済みかどうかは検査しない。
pub fn project_skeleton(skel: &Skeleton3d) -> Skeleton2d {
    skel.fixed_rows::<2>(0).into_owned()
}
