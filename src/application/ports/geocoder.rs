use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Location not found for pincode: {0}")]
    NotFound(String),

    #[error("Geocoding request failed: {0}")]
    Transport(String),

    #[error("Geocoding request timed out after {0:?}")]
    Timeout(Duration),
}

/// 郵便番号を座標に解決する外部サービスのポート
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// 設定された国コンテキストで 1 回だけ問い合わせ、先頭候補の座標を返す。
    async fn resolve(&self, pincode: &str) -> Result<Coordinates, GeocodeError>;
}
