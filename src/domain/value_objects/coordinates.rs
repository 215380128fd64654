use serde::{Deserialize, Serialize};
use std::fmt;

/// 緯度・経度のペア。永続化形式は `[lat, lng]` の配列。
///
/// 復元時は範囲検証を行わない（壊れたレコードは描画時に除外される）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// 範囲検証付きで座標を生成する。
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        let coordinates = Self { lat, lng };
        if !coordinates.is_valid() {
            return Err(format!("Coordinates out of range: [{lat}, {lng}]"));
        }
        Ok(coordinates)
    }

    /// ジオコーダが返す文字列表現の緯度・経度を解析する。
    pub fn parse(lat: &str, lng: &str) -> Result<Self, String> {
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("Invalid latitude '{lat}': {err}"))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("Invalid longitude '{lng}': {err}"))?;
        Self::new(lat, lng)
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lng
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.lat, value.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat, self.lng)
    }
}
