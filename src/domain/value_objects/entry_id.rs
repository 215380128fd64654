use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Entry の識別子。生成後に再割り当てされることはない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// 既存の識別子文字列から `EntryId` を生成する。
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("EntryId cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// 現在時刻（ミリ秒）ベースの新しい識別子を払い出す。
    ///
    /// 同一ミリ秒内に複数回呼ばれても、プロセス内では単調増加する。
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut last = LAST_ISSUED_MILLIS.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_ISSUED_MILLIS.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next.to_string()),
                Err(current) => last = current,
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntryId> for String {
    fn from(value: EntryId) -> Self {
        value.0
    }
}
