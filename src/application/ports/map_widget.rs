use crate::domain::entities::ViewportState;
use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};

/// クラスタレイヤーのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterLayerId(pub u64);

/// div アイコンの定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub class_name: String,
    pub html: String,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

/// ウィジェットへ渡すマーカー 1 件分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub entry_id: String,
    pub position: Coordinates,
    pub icon: MarkerIcon,
    pub popup_html: String,
}

/// パン・ズーム完了時に呼ばれるハンドラ
pub type SettleHandler = Box<dyn Fn(ViewportState) + Send + Sync>;

/// Map View Controller が駆動する地図ウィジェットの能力
pub trait MapWidget: Send {
    fn create_map(&mut self, mount_id: &str, view: ViewportState) -> Result<(), AppError>;
    fn set_view(&mut self, view: ViewportState);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn create_cluster_layer(&mut self) -> ClusterLayerId;
    fn clear_cluster_layer(&mut self, layer: ClusterLayerId);
    fn add_marker(&mut self, layer: ClusterLayerId, marker: MarkerSpec);
    fn on_viewport_settle(&mut self, handler: SettleHandler);
    fn fly_to(&mut self, center: Coordinates, zoom: u8);
}
