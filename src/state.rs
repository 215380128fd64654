use crate::application::ports::geocoder::Geocoder;
use crate::application::ports::key_value_store::KeyValueStore;
use crate::application::services::{
    AdminPanel, EntryComposer, EntryStore, MapViewController, SubmitError, SubmitOutcome,
};
use crate::domain::entities::EntryCollection;
use crate::infrastructure::geocoding::NominatimGeocoder;
use crate::infrastructure::map::SceneMapWidget;
use crate::infrastructure::storage::FileKeyValueStore;
use crate::presentation::{AdminAccess, KeyChord};
use crate::shared::config::AppConfig;
use crate::shared::error::{AppError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn KeyValueStore>,
    pub entry_store: Arc<Mutex<EntryStore>>,
    pub map_view: Arc<Mutex<MapViewController>>,
    /// map_view が描画しているシーン
    pub map_scene: SceneMapWidget,
    pub composer: Arc<EntryComposer>,
    pub admin_panel: Arc<Mutex<AdminPanel>>,
    pub admin_access: Arc<Mutex<AdminAccess>>,
}

impl AppState {
    /// 設定に従ってファイルストレージと Nominatim を使う状態を組み立てる
    pub fn new(config: AppConfig, launch_url: Option<&str>) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let storage = Arc::new(FileKeyValueStore::open(config.storage.file_path())?);
        let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
        Self::with_components(config, storage, geocoder, launch_url)
    }

    pub fn with_components(
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        geocoder: Arc<dyn Geocoder>,
        launch_url: Option<&str>,
    ) -> Result<Self> {
        let mut entry_store = EntryStore::new(Arc::clone(&storage));
        let entries = entry_store.load();

        let map_scene = SceneMapWidget::new();
        let mut map_view = MapViewController::new(
            Box::new(map_scene.clone()),
            Arc::clone(&storage),
            config.map.clone(),
        );
        map_view.initialize()?;
        map_view.render(&entries);

        let admin_access = launch_url
            .map(AdminAccess::from_launch_url)
            .unwrap_or_default();

        let entry_store = Arc::new(Mutex::new(entry_store));
        let map_view = Arc::new(Mutex::new(map_view));
        let composer = Arc::new(EntryComposer::new(
            geocoder,
            Arc::clone(&entry_store),
            Arc::clone(&map_view),
        ));

        info!("Application state ready with {} entries", entries.len());
        Ok(Self {
            config,
            storage,
            entry_store,
            map_view,
            map_scene,
            composer,
            admin_panel: Arc::new(Mutex::new(AdminPanel::new())),
            admin_access: Arc::new(Mutex::new(admin_access)),
        })
    }

    pub async fn entries(&self) -> EntryCollection {
        self.entry_store.lock().await.entries().clone()
    }

    pub async fn submit(&self) -> std::result::Result<SubmitOutcome, SubmitError> {
        self.composer.submit(&self.admin_panel).await
    }

    /// 確認済みの場合のみシードへ戻して再描画する。未確認なら None。
    pub async fn reset_entries(&self, confirmed: bool) -> Result<Option<EntryCollection>> {
        if !confirmed {
            info!("Reset cancelled, confirmation not given");
            return Ok(None);
        }
        let entries = self.entry_store.lock().await.reset()?;
        self.map_view.lock().await.render(&entries);
        Ok(Some(entries))
    }

    pub async fn open_admin_panel(&self) -> bool {
        let access = self.admin_access.lock().await;
        let mut panel = self.admin_panel.lock().await;
        access.open_panel(&mut panel)
    }

    pub async fn handle_key_chord(&self, chord: KeyChord) -> bool {
        let mut access = self.admin_access.lock().await;
        let mut panel = self.admin_panel.lock().await;
        access.handle_key_chord(chord, &mut panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::geocoder::GeocodeError;
    use crate::application::services::ENTRIES_STORAGE_KEY;
    use crate::domain::value_objects::Coordinates;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use async_trait::async_trait;

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, _pincode: &str) -> std::result::Result<Coordinates, GeocodeError> {
            Coordinates::new(28.6, 77.2).map_err(GeocodeError::Transport)
        }
    }

    fn state(launch_url: Option<&str>) -> (AppState, Arc<MemoryKeyValueStore>) {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let state = AppState::with_components(
            AppConfig::default(),
            storage.clone(),
            Arc::new(FixedGeocoder),
            launch_url,
        )
        .unwrap();
        (state, storage)
    }

    #[tokio::test]
    async fn startup_renders_seed_entries() {
        let (state, _) = state(None);
        assert_eq!(state.entries().await.len(), 2);
        assert_eq!(state.map_scene.snapshot().markers.len(), 2);
    }

    #[tokio::test]
    async fn panel_opens_only_when_authorized() {
        let (locked, _) = state(None);
        assert!(!locked.open_admin_panel().await);

        let (unlocked, _) = state(Some("https://map.example.com/?admin=true"));
        assert!(unlocked.open_admin_panel().await);
        assert!(unlocked.admin_panel.lock().await.is_open());
    }

    #[tokio::test]
    async fn reset_requires_confirmation() {
        let (state, storage) = state(Some("https://map.example.com/?admin=true"));
        state.open_admin_panel().await;
        state.admin_panel.lock().await.form_mut().pincode = "110001".to_string();
        state.submit().await.unwrap();
        assert_eq!(state.entries().await.len(), 3);

        assert_eq!(state.reset_entries(false).await.unwrap(), None);
        assert_eq!(state.entries().await.len(), 3);

        let entries = state.reset_entries(true).await.unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(storage.retrieve(ENTRIES_STORAGE_KEY).unwrap(), None);
        assert_eq!(state.map_scene.snapshot().markers.len(), 2);
    }
}
