use rusqlite::{params, Connection, OptionalExtension};

use super::KvStore;
use crate::domain::error::AppError;
use crate::domain::settings::HumanizerSettings;

/// SQLiteストレージ（kv + settings）
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// 新規接続（ファイルパス指定）
    pub fn open(path: &str) -> Result<Self, AppError> {
        let conn = Connection::open(path)
            .map_err(|e| AppError::storage(format!("DB接続に失敗: {e}")))?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// in-memory DB（テスト用）
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::storage(format!("in-memory DB作成に失敗: {e}")))?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// スキーママイグレーション
    fn migrate(&self) -> Result<(), AppError> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS kv (
                    key        TEXT PRIMARY KEY,
                    value      TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS settings (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                ",
            )
            .map_err(|e| AppError::storage(format!("マイグレーション失敗: {e}")))?;
        Ok(())
    }

    // --- Settings ---

    pub fn get_settings(&self) -> Result<HumanizerSettings, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings")
            .map_err(|e| AppError::storage(format!("クエリ準備失敗: {e}")))?;

        let rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| AppError::storage(format!("クエリ実行失敗: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::storage(format!("行読み取り失敗: {e}")))?;

        if rows.is_empty() {
            return Ok(HumanizerSettings::default());
        }

        // key-value をJSONに組み立ててデシリアライズ（欠けたキーは serde(default)）
        let mut map = serde_json::Map::new();
        for (key, value) in rows {
            let parsed = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            map.insert(key, parsed);
        }

        match serde_json::from_value::<HumanizerSettings>(serde_json::Value::Object(map)) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("settings テーブルの読み込みに失敗、デフォルトを使用: {e}");
                Ok(HumanizerSettings::default())
            }
        }
    }

    pub fn save_settings(&self, settings: &HumanizerSettings) -> Result<(), AppError> {
        let json = serde_json::to_value(settings)
            .map_err(|e| AppError::internal(format!("settings serialize: {e}")))?;

        if let Some(obj) = json.as_object() {
            for (key, value) in obj {
                self.conn
                    .execute(
                        "INSERT INTO settings (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        params![key, value.to_string()],
                    )
                    .map_err(|e| AppError::storage(format!("設定保存失敗: {e}")))?;
            }
        }

        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| AppError::storage(format!("kv 読み取り失敗: {e}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(|e| AppError::storage(format!("kv 書き込み失敗: {e}")))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| AppError::storage(format!("kv 削除失敗: {e}")))?;
        Ok(())
    }
}
