use crate::domain::entities::MAX_ZOOM;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// クエリに付与する国名（例: "110001,India"）
    pub country: String,
    pub user_agent: String,
    /// 明示的なタイムアウト（ミリ秒）。None の場合はトランスポート既定に任せる
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub mount_id: String,
    pub tile_url: String,
    pub attribution: String,
    pub default_center: [f64; 2],
    pub default_zoom: u8,
    pub focus_zoom: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("review-map"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self {
            data_dir,
            file_name: "local_storage.json".to_string(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country: "India".to_string(),
            user_agent: format!("review-map/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: Some(15_000),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            mount_id: "map".to_string(),
            tile_url: "https://{s}.basemaps.cartocdn.com/light_nolabels/{z}/{x}/{y}{r}.png"
                .to_string(),
            attribution: "&copy; OpenStreetMap".to_string(),
            // インド全域が収まる中心とズーム
            default_center: [20.5937, 78.9629],
            default_zoom: 5,
            focus_zoom: 12,
        }
    }
}

impl StorageConfig {
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("REVIEW_MAP_DATA_DIR") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                cfg.storage.data_dir = PathBuf::from(trimmed);
            }
        }

        if let Ok(v) = std::env::var("REVIEW_MAP_GEOCODER_URL") {
            let trimmed = v.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                cfg.geocoder.base_url = trimmed.to_string();
            }
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_GEOCODER_COUNTRY") {
            cfg.geocoder.country = v.trim().to_string();
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_GEOCODER_USER_AGENT") {
            if !v.trim().is_empty() {
                cfg.geocoder.user_agent = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_GEOCODER_TIMEOUT_MS") {
            if let Some(value) = parse_u64(&v) {
                // 0 はタイムアウト無効
                cfg.geocoder.timeout_ms = if value == 0 { None } else { Some(value) };
            }
        }

        if let Ok(v) = std::env::var("REVIEW_MAP_DEFAULT_CENTER") {
            if let Some(center) = parse_center(&v) {
                cfg.map.default_center = center;
            }
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_DEFAULT_ZOOM") {
            if let Some(value) = parse_u8(&v) {
                cfg.map.default_zoom = value;
            }
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_FOCUS_ZOOM") {
            if let Some(value) = parse_u8(&v) {
                cfg.map.focus_zoom = value;
            }
        }
        if let Ok(v) = std::env::var("REVIEW_MAP_TILE_URL") {
            if !v.trim().is_empty() {
                cfg.map.tile_url = v.trim().to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage.file_name.trim().is_empty() {
            return Err("Storage file_name must not be empty".to_string());
        }
        if !self.geocoder.base_url.starts_with("http://")
            && !self.geocoder.base_url.starts_with("https://")
        {
            return Err(format!(
                "Geocoder base_url must be an http(s) URL: {}",
                self.geocoder.base_url
            ));
        }
        if self.geocoder.country.trim().is_empty() {
            return Err("Geocoder country must not be empty".to_string());
        }
        let [lat, lng] = self.map.default_center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err("Map default_center is out of range".to_string());
        }
        if self.map.default_zoom > MAX_ZOOM || self.map.focus_zoom > MAX_ZOOM {
            return Err(format!("Map zoom levels must be at most {MAX_ZOOM}"));
        }
        Ok(())
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u8(value: &str) -> Option<u8> {
    value.trim().parse::<u8>().ok()
}

fn parse_center(value: &str) -> Option<[f64; 2]> {
    let (lat, lng) = value.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    Some([lat, lng])
}
