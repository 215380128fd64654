pub type StorageResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 文字列キー・文字列値の永続ストレージ（ブラウザの localStorage 相当）
///
/// すべての操作は同期的に完了し、呼び出しが戻った時点で書き込みは永続化済み。
pub trait KeyValueStore: Send + Sync {
    fn store(&self, key: &str, value: &str) -> StorageResult<()>;
    fn retrieve(&self, key: &str) -> StorageResult<Option<String>>;
    fn delete(&self, key: &str) -> StorageResult<()>;
    fn exists(&self, key: &str) -> StorageResult<bool>;
}
