use crate::application::ports::map_widget::{
    ClusterLayerId, MapWidget, MarkerSpec, SettleHandler,
};
use crate::domain::entities::ViewportState;
use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedMarker {
    pub layer: ClusterLayerId,
    pub marker: MarkerSpec,
}

/// ウィジェットが保持している描画状態のスナップショット
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapScene {
    pub mount_id: Option<String>,
    pub view: Option<ViewportState>,
    pub tile_layer: Option<TileLayer>,
    pub cluster_layers: Vec<ClusterLayerId>,
    pub markers: Vec<PlacedMarker>,
}

#[derive(Default)]
struct SceneInner {
    scene: MapScene,
    handlers: Vec<Arc<dyn Fn(ViewportState) + Send + Sync>>,
    next_layer_id: u64,
}

/// ブラウザを持たない環境向けの MapWidget 実装。
///
/// クローンは同じシーンを共有するので、コントローラへ渡した後も外側から観測できる。
#[derive(Clone, Default)]
pub struct SceneMapWidget {
    inner: Arc<Mutex<SceneInner>>,
}

impl SceneMapWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SceneInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> MapScene {
        self.lock().scene.clone()
    }

    /// パン・ズーム操作の完了を模擬し、購読者へ通知する
    pub fn settle(&self, view: ViewportState) {
        let handlers = {
            let mut inner = self.lock();
            inner.scene.view = Some(view);
            inner.handlers.clone()
        };
        for handler in handlers {
            handler(view);
        }
    }

    /// マーカーを GeoJSON の FeatureCollection として書き出す
    pub fn to_geojson(&self) -> Value {
        let scene = self.snapshot();
        let features: Vec<Value> = scene
            .markers
            .iter()
            .map(|placed| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [
                            placed.marker.position.longitude(),
                            placed.marker.position.latitude(),
                        ],
                    },
                    "properties": {
                        "id": placed.marker.entry_id,
                        "cluster": placed.layer.0,
                        "iconClass": placed.marker.icon.class_name,
                        "popupHtml": placed.marker.popup_html,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
            "view": scene.view,
            "tileLayer": scene.tile_layer,
        })
    }
}

impl MapWidget for SceneMapWidget {
    fn create_map(&mut self, mount_id: &str, view: ViewportState) -> Result<(), AppError> {
        if mount_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Map mount point is missing".to_string()));
        }
        let mut inner = self.lock();
        if inner.scene.mount_id.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Map already created on mount point '{mount_id}'"
            )));
        }
        inner.scene.mount_id = Some(mount_id.to_string());
        inner.scene.view = Some(view);
        debug!("SceneMapWidget: created map on '{mount_id}'");
        Ok(())
    }

    fn set_view(&mut self, view: ViewportState) {
        self.settle(view);
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.lock().scene.tile_layer = Some(TileLayer {
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        });
    }

    fn create_cluster_layer(&mut self) -> ClusterLayerId {
        let mut inner = self.lock();
        inner.next_layer_id += 1;
        let id = ClusterLayerId(inner.next_layer_id);
        inner.scene.cluster_layers.push(id);
        id
    }

    fn clear_cluster_layer(&mut self, layer: ClusterLayerId) {
        self.lock()
            .scene
            .markers
            .retain(|placed| placed.layer != layer);
    }

    fn add_marker(&mut self, layer: ClusterLayerId, marker: MarkerSpec) {
        self.lock().scene.markers.push(PlacedMarker { layer, marker });
    }

    fn on_viewport_settle(&mut self, handler: SettleHandler) {
        self.lock().handlers.push(Arc::from(handler));
    }

    fn fly_to(&mut self, center: Coordinates, zoom: u8) {
        debug!("SceneMapWidget: flying to {center} zoom {zoom}");
        self.settle(ViewportState::new(center, zoom));
    }
}
