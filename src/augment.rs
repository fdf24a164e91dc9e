use anyhow::{bail, Result};
use nalgebra::Vector3;
use rand::distributions::Uniform;
use rand::Rng;

use crate::config::AugmentConfig;
use crate::pose::{rotate_skeleton, JointIndex, Skeleton3d};

/// 回転とノイズによるデータ拡張
#[derive(Debug, Clone)]
pub struct Augmenter {
    max_rotation_deg: f64,
    noise_divisor: f64,
}

impl Augmenter {
    /// `max_rotation_deg` は 0 以上、`noise_divisor` は正の有限値
    pub fn new(max_rotation_deg: f64, noise_divisor: f64) -> Result<Self> {
        if !(max_rotation_deg >= 0.0 && max_rotation_deg.is_finite()) {
            bail!("max_rotation_deg must be a non-negative number, got {}", max_rotation_deg);
        }
        if !(noise_divisor > 0.0 && noise_divisor.is_finite()) {
            bail!("noise_divisor must be positive, got {}", noise_divisor);
        }
        Ok(Self {
            max_rotation_deg,
            noise_divisor,
        })
    }

    pub fn from_config(config: &AugmentConfig) -> Result<Self> {
        Self::new(config.max_rotation_deg, config.noise_divisor)
    }

    /// データセット全体で共通のノイズ幅
    ///
    /// 先頭骨格の全座標の標準偏差（母標準偏差）/ noise_divisor。
    /// サンプルごとではなく1回だけ計算する。
    pub fn noise_scale(&self, reference: &Skeleton3d) -> f64 {
        reference.variance().sqrt() / self.noise_divisor
    }

    /// 各骨格について [回転版, ノイズ版] の順で新しいサンプルを作る
    ///
    /// 入力は変更しない。返るのは追加分の 2N 個だけで、連結は呼び出し側で行う。
    pub fn augment<R: Rng + ?Sized>(&self, skeletons: &[Skeleton3d], rng: &mut R) -> Vec<Skeleton3d> {
        let Some(first) = skeletons.first() else {
            return Vec::new();
        };
        let noise_scale = self.noise_scale(first);

        let mut augmented = Vec::with_capacity(skeletons.len() * 2);
        for skel in skeletons {
            augmented.push(self.rotation_variant(skel, rng));
            augmented.push(noise_variant(skel, noise_scale, rng));
        }
        augmented
    }

    /// [-max, +max] 度から一様に選んだ角度で回転
    pub fn rotation_variant<R: Rng + ?Sized>(&self, skel: &Skeleton3d, rng: &mut R) -> Skeleton3d {
        let degrees = rng.sample(Uniform::new_inclusive(-self.max_rotation_deg, self.max_rotation_deg));
        rotate_skeleton(skel, degrees)
    }
}

impl Default for Augmenter {
    fn default() -> Self {
        let config = AugmentConfig::default();
        Self {
            max_rotation_deg: config.max_rotation_deg,
            noise_divisor: config.noise_divisor,
        }
    }
}

/// 全座標に [0, noise_scale] の一様ノイズを加える
///
/// Neck は原点に戻す（ルート関節が原点という不変条件を保つ）。
/// 負または非有限の `noise_scale` は 0 として扱う。
pub fn noise_variant<R: Rng + ?Sized>(skel: &Skeleton3d, noise_scale: f64, rng: &mut R) -> Skeleton3d {
    let noise_scale = if noise_scale.is_finite() { noise_scale.max(0.0) } else { 0.0 };
    let noise = Uniform::new_inclusive(0.0, noise_scale);
    let mut noisy = skel.map(|v| v + rng.sample(noise));
    noisy.set_column(JointIndex::Neck as usize, &Vector3::zeros());
    noisy
}
