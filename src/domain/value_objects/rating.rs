use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_STARS: usize = 5;

/// 星表示の 1 ポジション分の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarKind {
    Full,
    Half,
    Empty,
}

impl StarKind {
    /// Material Icons のアイコン名
    pub fn icon_name(&self) -> &'static str {
        match self {
            StarKind::Full => "star",
            StarKind::Half => "star_half",
            StarKind::Empty => "star_border",
        }
    }
}

/// レビュー評価。表示側は 0.5 刻みを扱い、入力側は 1〜5 の整数のみ。
///
/// 保存済みの値も `new` を通して復元する。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// 0.0〜5.0 の 0.5 刻みの値を受け付ける。
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() || !(0.0..=MAX_STARS as f64).contains(&value) {
            return Err(format!("Rating must be between 0 and {MAX_STARS}: {value}"));
        }
        if (value * 2.0).fract() != 0.0 {
            return Err(format!("Rating must be a multiple of 0.5: {value}"));
        }
        Ok(Self(value))
    }

    /// 管理フォームからの入力（1〜5 の整数）
    pub fn from_stars(stars: u8) -> Result<Self, String> {
        if !(1..=MAX_STARS as u8).contains(&stars) {
            return Err(format!("Rating must be an integer from 1 to {MAX_STARS}: {stars}"));
        }
        Ok(Self(f64::from(stars)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// 各ポジションに対する閾値比較で星を決める。常に 5 個。
    pub fn stars(&self) -> [StarKind; MAX_STARS] {
        let mut stars = [StarKind::Empty; MAX_STARS];
        for (i, star) in stars.iter_mut().enumerate() {
            let position = i as f64;
            *star = if self.0 >= position + 1.0 {
                StarKind::Full
            } else if self.0 >= position + 0.5 {
                StarKind::Half
            } else {
                StarKind::Empty
            };
        }
        stars
    }
}

impl TryFrom<f64> for Rating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(MAX_STARS as f64)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
