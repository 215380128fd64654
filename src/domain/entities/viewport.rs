use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

/// タイルサーバーが返す最大ズーム
pub const MAX_ZOOM: u8 = 20;

/// 地図の最後の中心とズーム
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub center: Coordinates,
    pub zoom: u8,
}

impl ViewportState {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_valid() && self.zoom <= MAX_ZOOM
    }
}
