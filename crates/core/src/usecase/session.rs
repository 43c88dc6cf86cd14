use crate::domain::account::{Plan, User};
use crate::domain::error::AppError;
use crate::infra::storage::KvStore;

/// 永続化キー
const USER_KEY: &str = "user";

/// モックアカウントディレクトリのエントリ
#[derive(Debug, Clone)]
struct AccountRecord {
    user: User,
    password: String,
}

/// モック認証テーブル。本物の認証基盤ではない。
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    records: Vec<AccountRecord>,
}

impl AccountDirectory {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// デモ用の初期アカウント（free / pro）
    pub fn seeded() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let mut directory = Self::empty();
        directory.insert(
            User {
                id: "1".to_string(),
                email: "test@example.com".to_string(),
                username: "testuser".to_string(),
                plan: Plan::Free,
                credits: 10,
                created_at: now.clone(),
            },
            "password123",
        );
        directory.insert(
            User {
                id: "2".to_string(),
                email: "pro@example.com".to_string(),
                username: "prouser".to_string(),
                plan: Plan::Pro,
                credits: 100,
                created_at: now,
            },
            "password123",
        );
        directory
    }

    pub fn insert(&mut self, user: User, password: &str) {
        self.records.push(AccountRecord {
            user,
            password: password.to_string(),
        });
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.records.iter().any(|r| r.user.email == email)
    }

    fn authenticate(&self, email: &str, password: &str) -> Option<&User> {
        self.records
            .iter()
            .find(|r| r.user.email == email && r.password == password)
            .map(|r| &r.user)
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

/// セッションコンテキスト: 現在のユーザーとクレジット台帳。
///
/// グローバル状態を持たず、永続化は `KvStore` に委譲する。
pub struct SessionContext {
    store: Box<dyn KvStore>,
    directory: AccountDirectory,
    user: Option<User>,
}

impl SessionContext {
    pub fn new(store: Box<dyn KvStore>, directory: AccountDirectory) -> Self {
        Self {
            store,
            directory,
            user: None,
        }
    }

    /// ストアから前回のユーザーを復元する。壊れたデータはログアウト扱い。
    pub fn restore(&mut self) -> Result<Option<&User>, AppError> {
        self.user = match self.store.get(USER_KEY)? {
            Some(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("保存済みユーザーの読み込みに失敗: {e}");
                    None
                }
            },
            None => None,
        };
        Ok(self.user.as_ref())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AppError> {
        let user = self
            .directory
            .authenticate(email, password)
            .cloned()
            .ok_or_else(|| AppError::auth("Invalid email or password"))?;

        log::info!("login: {}", user.username);
        self.persist(user)
    }

    pub fn signup(
        &mut self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<&User, AppError> {
        if email.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
            return Err(AppError::invalid_input("email, username and password are required"));
        }
        if self.directory.contains_email(email) {
            return Err(AppError::auth("User with this email already exists"));
        }

        let now = chrono::Utc::now();
        let user = User {
            id: format!("user-{}", now.timestamp_millis()),
            email: email.to_string(),
            username: username.to_string(),
            plan: Plan::Free,
            credits: 15,
            created_at: now.to_rfc3339(),
        };
        self.directory.insert(user.clone(), password);

        log::info!("signup: {username}");
        self.persist(user)
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.user = None;
        self.store.remove(USER_KEY)
    }

    pub fn set_credits(&mut self, credits: i64) -> Result<&User, AppError> {
        let mut user = self.require_user()?.clone();
        user.credits = credits;
        self.persist(user)
    }

    /// クレジットを1消費する。残高0以下ならエラー。
    pub fn consume_credit(&mut self) -> Result<i64, AppError> {
        let user = self.require_user()?;
        if user.credits <= 0 {
            return Err(AppError::no_credits());
        }
        let remaining = user.credits - 1;
        self.set_credits(remaining)?;
        Ok(remaining)
    }

    /// プランを変更し、プランのクレジット付与を同じ更新で反映する。
    pub fn change_plan(&mut self, plan: Plan) -> Result<&User, AppError> {
        let mut user = self.require_user()?.clone();
        user.plan = plan;
        user.credits += plan.credit_grant();
        log::info!("plan changed: {} -> {}", user.username, plan.as_str());
        self.persist(user)
    }

    fn require_user(&self) -> Result<&User, AppError> {
        self.user.as_ref().ok_or_else(AppError::not_logged_in)
    }

    fn persist(&mut self, user: User) -> Result<&User, AppError> {
        let json = serde_json::to_string(&user)
            .map_err(|e| AppError::internal(format!("user serialize: {e}")))?;
        self.store.set(USER_KEY, &json)?;
        Ok(self.user.insert(user))
    }
}
