use crate::application::ports::key_value_store::{KeyValueStore, StorageResult};
use crate::shared::error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// JSON ファイル 1 つに全キーを保持する KeyValueStore
///
/// 書き込みは毎回ドキュメント全体を一時ファイルへ書いてから rename する。
pub struct FileKeyValueStore {
    path: PathBuf,
    document: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    AppError::Storage(format!("Failed to create storage dir: {err}"))
                })?;
            }
        }

        let document = if path.exists() {
            let bytes = fs::read(&path)
                .map_err(|err| AppError::Storage(format!("Failed to read storage file: {err}")))?;
            if bytes.is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_slice(&bytes) {
                    Ok(document) => document,
                    Err(err) => {
                        warn!(
                            "FileKeyValueStore: {} is unreadable ({err}), starting empty",
                            path.display()
                        );
                        set_aside(&path);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!(
            "FileKeyValueStore: opened {} with {} keys",
            path.display(),
            document.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, document: &BTreeMap<String, String>) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            error!("FileKeyValueStore: failed to replace {}: {err}", self.path.display());
            err
        })?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut document = self
            .document
            .lock()
            .map_err(|_| "file store lock poisoned")?;
        let mut next = document.clone();
        if !mutate(&mut next) {
            return Ok(());
        }
        // 永続化に成功した場合のみメモリ上の状態を差し替える
        self.persist(&next)?;
        *document = next;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<String>> {
        let document = self
            .document
            .lock()
            .map_err(|_| "file store lock poisoned")?;
        Ok(document.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.update(|document| document.remove(key).is_some())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let document = self
            .document
            .lock()
            .map_err(|_| "file store lock poisoned")?;
        Ok(document.contains_key(key))
    }
}

/// 読めないファイルを `*.corrupt` へ退避する。失敗しても次の書き込みで上書きされる。
fn set_aside(path: &Path) {
    let corrupt_path = corrupt_path_for(path);
    if let Err(err) = fs::rename(path, &corrupt_path) {
        error!(
            "FileKeyValueStore: failed to move {} aside: {err}",
            path.display()
        );
    }
}

fn corrupt_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}
