mod repository;

pub use repository::SqliteStore;

use std::collections::HashMap;

use crate::domain::error::AppError;

/// キー/バリューストア。セッション状態の永続化に使う。
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

/// インメモリ実装（テスト・デモ用）
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("user").unwrap(), None);

        store.set("user", "{}").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));

        store.set("user", "[]").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("[]"));

        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
        // 存在しないキーの削除はエラーにならない
        store.remove("user").unwrap();
    }
}
