use super::popup::marker_for;
use crate::application::ports::key_value_store::KeyValueStore;
use crate::application::ports::map_widget::{ClusterLayerId, MapWidget};
use crate::domain::entities::{EntryCollection, ViewportState, MAX_ZOOM};
use crate::domain::value_objects::Coordinates;
use crate::shared::config::MapConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const VIEWPORT_LAT_KEY: &str = "mapCenterLat";
pub const VIEWPORT_LNG_KEY: &str = "mapCenterLng";
pub const VIEWPORT_ZOOM_KEY: &str = "mapZoom";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapViewState {
    Uninitialized,
    Initialized,
    /// クラスタレイヤーの再構築中
    Updating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: usize,
    pub skipped: usize,
}

/// 地図ウィジェット・マーカーレイヤー・ビューポート保存キーの所有者
pub struct MapViewController {
    widget: Box<dyn MapWidget>,
    storage: Arc<dyn KeyValueStore>,
    config: MapConfig,
    state: MapViewState,
    cluster_layer: Option<ClusterLayerId>,
}

impl MapViewController {
    pub fn new(
        widget: Box<dyn MapWidget>,
        storage: Arc<dyn KeyValueStore>,
        config: MapConfig,
    ) -> Self {
        Self {
            widget,
            storage,
            config,
            state: MapViewState::Uninitialized,
            cluster_layer: None,
        }
    }

    pub fn state(&self) -> MapViewState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != MapViewState::Uninitialized
    }

    /// 保存済みビューポート、なければ既定値
    pub fn restored_viewport(&self) -> ViewportState {
        restore_viewport(self.storage.as_ref(), &self.config)
    }

    /// セッションにつき 1 回だけ地図を生成する。2 回目以降は何もしない。
    pub fn initialize(&mut self) -> Result<(), AppError> {
        if self.is_initialized() {
            debug!("Map view already initialized");
            return Ok(());
        }

        let view = self.restored_viewport();
        self.widget.create_map(&self.config.mount_id, view)?;
        self.widget
            .add_tile_layer(&self.config.tile_url, &self.config.attribution);
        let layer = self.widget.create_cluster_layer();

        let storage = Arc::clone(&self.storage);
        self.widget
            .on_viewport_settle(Box::new(move |view: ViewportState| {
                persist_viewport(storage.as_ref(), view)
            }));

        self.cluster_layer = Some(layer);
        self.state = MapViewState::Initialized;
        info!(
            "Map view initialized at {} zoom {}",
            view.center, view.zoom
        );
        Ok(())
    }

    /// マーカーレイヤーを作り直す。初期化前は何もしない。
    pub fn render(&mut self, entries: &EntryCollection) -> RenderReport {
        let Some(layer) = self.cluster_layer else {
            debug!("Render requested before map initialization, ignoring");
            return RenderReport::default();
        };

        self.state = MapViewState::Updating;
        self.widget.clear_cluster_layer(layer);

        let mut report = RenderReport::default();
        for entry in entries {
            if let Err(reason) = entry.validate() {
                warn!("Skipping malformed entry '{}': {reason}", entry.id());
                report.skipped += 1;
                continue;
            }
            self.widget.add_marker(layer, marker_for(entry));
            report.rendered += 1;
        }

        self.state = MapViewState::Initialized;
        debug!(
            "Rendered {} markers ({} skipped)",
            report.rendered, report.skipped
        );
        report
    }

    /// 中心とズームを直接指定する。settle 経由で保存される。
    pub fn set_view(&mut self, view: ViewportState) -> Result<(), AppError> {
        if !view.is_valid() {
            warn!(
                "Refusing to set view to {} at zoom {}",
                view.center, view.zoom
            );
            return Err(AppError::InvalidInput(format!(
                "Viewport must have a valid center and a zoom of at most {MAX_ZOOM}"
            )));
        }
        if !self.is_initialized() {
            debug!("set_view requested before map initialization, ignoring");
            return Ok(());
        }
        self.widget.set_view(view);
        Ok(())
    }

    /// 指定座標へ寄りのズームで移動する
    pub fn focus(&mut self, coordinates: Coordinates) {
        if !self.is_initialized() {
            debug!("Focus requested before map initialization, ignoring");
            return;
        }
        if !coordinates.is_valid() {
            warn!("Refusing to focus on invalid coordinates {coordinates}");
            return;
        }
        self.widget.fly_to(coordinates, self.config.focus_zoom);
    }
}

/// settle イベントごとに同期的に書き込む。失敗はログのみ。
pub fn persist_viewport(storage: &dyn KeyValueStore, view: ViewportState) {
    let writes = [
        (VIEWPORT_LAT_KEY, view.center.latitude().to_string()),
        (VIEWPORT_LNG_KEY, view.center.longitude().to_string()),
        (VIEWPORT_ZOOM_KEY, view.zoom.to_string()),
    ];
    for (key, value) in writes {
        if let Err(err) = storage.store(key, &value) {
            error!("Failed to persist viewport key {key}: {err}");
        }
    }
}

pub fn restore_viewport(storage: &dyn KeyValueStore, config: &MapConfig) -> ViewportState {
    let default_center = Coordinates::from(config.default_center);

    let read = |key: &str| match storage.retrieve(key) {
        Ok(value) => value,
        Err(err) => {
            warn!("Failed to read viewport key {key}: {err}");
            None
        }
    };

    let center = match (read(VIEWPORT_LAT_KEY), read(VIEWPORT_LNG_KEY)) {
        (Some(lat), Some(lng)) => Coordinates::parse(&lat, &lng).unwrap_or_else(|err| {
            warn!("Ignoring stored viewport center: {err}");
            default_center
        }),
        _ => default_center,
    };

    let zoom = read(VIEWPORT_ZOOM_KEY)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|zoom| zoom.is_finite() && (0.0..=f64::from(MAX_ZOOM)).contains(zoom))
        .map(|zoom| zoom.trunc() as u8)
        .unwrap_or(config.default_zoom);

    ViewportState::new(center, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::map_widget::{MarkerSpec, SettleHandler};
    use crate::domain::entities::{Entry, Product, Review};
    use crate::domain::seed::seed_collection;
    use crate::infrastructure::map::SceneMapWidget;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use mockall::{mock, predicate::*, Sequence};

    mock! {
        pub Widget {}

        impl MapWidget for Widget {
            fn create_map(&mut self, mount_id: &str, view: ViewportState) -> Result<(), AppError>;
            fn set_view(&mut self, view: ViewportState);
            fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
            fn create_cluster_layer(&mut self) -> ClusterLayerId;
            fn clear_cluster_layer(&mut self, layer: ClusterLayerId);
            fn add_marker(&mut self, layer: ClusterLayerId, marker: MarkerSpec);
            fn on_viewport_settle(&mut self, handler: SettleHandler);
            fn fly_to(&mut self, center: Coordinates, zoom: u8);
        }
    }

    fn controller_with_scene(
        storage: Arc<MemoryKeyValueStore>,
    ) -> (MapViewController, SceneMapWidget) {
        let widget = SceneMapWidget::new();
        let controller =
            MapViewController::new(Box::new(widget.clone()), storage, MapConfig::default());
        (controller, widget)
    }

    fn broken_entry() -> Entry {
        Entry::new(
            "Broken",
            Coordinates::from([f64::NAN, 77.0]),
            Product::default(),
            Review::default(),
        )
    }

    #[test]
    fn render_before_initialize_is_noop() {
        let mut mock = MockWidget::new();
        mock.expect_clear_cluster_layer().never();
        mock.expect_add_marker().never();

        let mut controller = MapViewController::new(
            Box::new(mock),
            Arc::new(MemoryKeyValueStore::new()),
            MapConfig::default(),
        );
        let report = controller.render(&seed_collection());
        assert_eq!(report, RenderReport::default());
        assert_eq!(controller.state(), MapViewState::Uninitialized);
    }

    #[test]
    fn initialize_sets_up_widget_in_order() {
        let config = MapConfig::default();
        let mut seq = Sequence::new();
        let mut mock = MockWidget::new();
        let expected_view = ViewportState::new(Coordinates::from(config.default_center), 5);

        mock.expect_create_map()
            .with(eq("map"), eq(expected_view))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock.expect_add_tile_layer()
            .withf(|url, attribution| url.contains("cartocdn") && attribution.contains("OpenStreetMap"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mock.expect_create_cluster_layer()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(ClusterLayerId(1));
        mock.expect_on_viewport_settle()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut controller =
            MapViewController::new(Box::new(mock), Arc::new(MemoryKeyValueStore::new()), config);
        controller.initialize().unwrap();
        // 2 回目は何もしない
        controller.initialize().unwrap();
        assert_eq!(controller.state(), MapViewState::Initialized);
    }

    #[test]
    fn initialize_uses_persisted_viewport() {
        let storage = Arc::new(MemoryKeyValueStore::with_values([
            (VIEWPORT_LAT_KEY, "17.385"),
            (VIEWPORT_LNG_KEY, "78.4867"),
            (VIEWPORT_ZOOM_KEY, "9"),
        ]));
        let (mut controller, widget) = controller_with_scene(storage);
        controller.initialize().unwrap();

        let scene = widget.snapshot();
        assert_eq!(
            scene.view,
            Some(ViewportState::new(Coordinates::new(17.385, 78.4867).unwrap(), 9))
        );
    }

    #[test]
    fn unreadable_viewport_falls_back_to_defaults() {
        let storage = MemoryKeyValueStore::with_values([
            (VIEWPORT_LAT_KEY, "north"),
            (VIEWPORT_LNG_KEY, "78.4867"),
            (VIEWPORT_ZOOM_KEY, "huge"),
        ]);
        let view = restore_viewport(&storage, &MapConfig::default());
        assert_eq!(view.center, Coordinates::from([20.5937, 78.9629]));
        assert_eq!(view.zoom, 5);

        // 緯度だけの場合も既定の中心
        let storage = MemoryKeyValueStore::with_values([(VIEWPORT_LAT_KEY, "10.0")]);
        let view = restore_viewport(&storage, &MapConfig::default());
        assert_eq!(view.center, Coordinates::from([20.5937, 78.9629]));
    }

    #[test]
    fn render_twice_produces_same_markers() {
        let (mut controller, widget) = controller_with_scene(Arc::new(MemoryKeyValueStore::new()));
        controller.initialize().unwrap();

        let entries = seed_collection();
        let first = controller.render(&entries);
        let markers_once = widget.snapshot().markers;
        let second = controller.render(&entries);
        let markers_twice = widget.snapshot().markers;

        assert_eq!(first, second);
        assert_eq!(markers_once.len(), entries.len());
        assert_eq!(markers_once, markers_twice);
        assert_eq!(controller.state(), MapViewState::Initialized);
    }

    #[test]
    fn malformed_entries_are_skipped_without_blanking_the_map() {
        let (mut controller, widget) = controller_with_scene(Arc::new(MemoryKeyValueStore::new()));
        controller.initialize().unwrap();

        let entries = seed_collection().with_appended(broken_entry());
        let report = controller.render(&entries);

        assert_eq!(report.rendered, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(widget.snapshot().markers.len(), 2);
    }

    #[test]
    fn settle_events_persist_viewport() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let (mut controller, widget) = controller_with_scene(storage.clone());
        controller.initialize().unwrap();

        widget.settle(ViewportState::new(Coordinates::new(22.5, 88.3).unwrap(), 11));

        assert_eq!(storage.retrieve(VIEWPORT_LAT_KEY).unwrap(), Some("22.5".to_string()));
        assert_eq!(storage.retrieve(VIEWPORT_LNG_KEY).unwrap(), Some("88.3".to_string()));
        assert_eq!(storage.retrieve(VIEWPORT_ZOOM_KEY).unwrap(), Some("11".to_string()));

        let restored = restore_viewport(storage.as_ref(), &MapConfig::default());
        assert_eq!(restored.zoom, 11);
        assert_eq!(restored.center, Coordinates::new(22.5, 88.3).unwrap());
    }

    #[test]
    fn set_view_moves_map_and_persists() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let (mut controller, widget) = controller_with_scene(storage.clone());
        let view = ViewportState::new(Coordinates::new(19.07, 72.87).unwrap(), 10);

        controller.set_view(view).unwrap();
        assert_eq!(storage.retrieve(VIEWPORT_ZOOM_KEY).unwrap(), None);

        controller.initialize().unwrap();
        controller.set_view(view).unwrap();
        assert_eq!(widget.snapshot().view, Some(view));
        assert_eq!(restore_viewport(storage.as_ref(), &MapConfig::default()), view);
    }

    #[test]
    fn set_view_rejects_zoom_beyond_tile_maximum() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let (mut controller, widget) = controller_with_scene(storage.clone());
        controller.initialize().unwrap();
        let before = widget.snapshot().view;

        let view = ViewportState::new(Coordinates::new(19.07, 72.87).unwrap(), 200);
        let result = controller.set_view(view);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(widget.snapshot().view, before);
        assert_ne!(
            storage.retrieve(VIEWPORT_ZOOM_KEY).unwrap().as_deref(),
            Some("200")
        );
        assert_eq!(
            restore_viewport(storage.as_ref(), &MapConfig::default()).zoom,
            MapConfig::default().default_zoom
        );
    }

    #[test]
    fn stored_zoom_above_tile_maximum_falls_back_to_default() {
        let storage = MemoryKeyValueStore::with_values([(VIEWPORT_ZOOM_KEY, "22")]);
        let config = MapConfig::default();
        assert_eq!(restore_viewport(&storage, &config).zoom, config.default_zoom);
    }

    #[test]
    fn focus_flies_to_close_zoom() {
        let mut mock = MockWidget::new();
        mock.expect_create_map().returning(|_, _| Ok(()));
        mock.expect_add_tile_layer().return_const(());
        mock.expect_create_cluster_layer()
            .return_const(ClusterLayerId(7));
        mock.expect_on_viewport_settle().return_const(());
        mock.expect_fly_to()
            .with(eq(Coordinates::new(28.6, 77.2).unwrap()), eq(12u8))
            .times(1)
            .return_const(());

        let mut controller = MapViewController::new(
            Box::new(mock),
            Arc::new(MemoryKeyValueStore::new()),
            MapConfig::default(),
        );
        // 初期化前の focus は無視される
        controller.focus(Coordinates::new(28.6, 77.2).unwrap());
        controller.initialize().unwrap();
        controller.focus(Coordinates::new(28.6, 77.2).unwrap());
        controller.focus(Coordinates::from([f64::NAN, 0.0]));
    }
}
