use crate::application::ports::key_value_store::KeyValueStore;
use crate::domain::entities::{Entry, EntryCollection};
use crate::domain::seed::seed_collection;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry コレクションの保存キー
pub const ENTRIES_STORAGE_KEY: &str = "qamell_map_data";

/// EntryCollection の唯一の所有者であり、保存キーの唯一の書き手
pub struct EntryStore {
    storage: Arc<dyn KeyValueStore>,
    entries: EntryCollection,
}

impl EntryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            entries: EntryCollection::default(),
        }
    }

    pub fn entries(&self) -> &EntryCollection {
        &self.entries
    }

    /// 保存済みコレクションを読み込む。欠落・破損時はシードを返し、呼び出し元へは失敗させない。
    pub fn load(&mut self) -> EntryCollection {
        self.entries = match self.storage.retrieve(ENTRIES_STORAGE_KEY) {
            Ok(Some(raw)) => parse_collection(&raw).unwrap_or_else(|| {
                warn!("Stored entry collection is unreadable, falling back to seed entries");
                seed_collection()
            }),
            Ok(None) => {
                debug!("No stored entry collection, using seed entries");
                seed_collection()
            }
            Err(err) => {
                warn!("Failed to read stored entry collection: {err}");
                seed_collection()
            }
        };

        info!("Loaded {} entries", self.entries.len());
        self.entries.clone()
    }

    /// 末尾に追加して全体を書き込む。書き込みに失敗した場合は状態を変更しない。
    pub fn append(&mut self, entry: Entry) -> Result<EntryCollection, AppError> {
        entry
            .validate()
            .map_err(|reason| AppError::ValidationError(format!("Rejected entry: {reason}")))?;

        let next = self.entries.with_appended(entry);
        self.persist(&next)?;
        self.entries = next;

        debug!("Appended entry, collection now has {} entries", self.entries.len());
        Ok(self.entries.clone())
    }

    /// シードに戻し、保存キーを削除する。
    pub fn reset(&mut self) -> Result<EntryCollection, AppError> {
        self.storage
            .delete(ENTRIES_STORAGE_KEY)
            .map_err(|err| AppError::Storage(format!("Failed to clear entries: {err}")))?;
        self.entries = seed_collection();

        info!("Entry collection reset to seed entries");
        Ok(self.entries.clone())
    }

    fn persist(&self, entries: &EntryCollection) -> Result<(), AppError> {
        // 空のコレクションは保存しない（キーの削除は reset のみが行う）
        if entries.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string(entries)?;
        self.storage
            .store(ENTRIES_STORAGE_KEY, &json)
            .map_err(|err| AppError::Storage(format!("Failed to persist entries: {err}")))
    }
}

/// JSON 配列でなければ None。個々の壊れたレコードは捨てて残りを使う。
fn parse_collection(raw: &str) -> Option<EntryCollection> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(err) => {
            warn!("Failed to parse stored entries: {err}");
            return None;
        }
    };

    let entries = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Entry>(record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Dropping unreadable stored entry #{index}: {err}");
                None
            }
        })
        .collect::<Vec<_>>();

    Some(EntryCollection::new(entries))
}
