use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::account::{Billing, PaymentReceipt, Plan, User};
use crate::domain::error::AppError;
use crate::domain::rewrite::{RewriteRequest, RewriteResult};
use crate::domain::settings::HumanizerSettings;
use crate::infra::metrics::{Metrics, MetricsSummary};
use crate::infra::storage::KvStore;
use crate::usecase::orchestrator::RewriteOrchestrator;
use crate::usecase::session::{AccountDirectory, SessionContext};

/// クレジット扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewriteMode {
    /// ログインユーザーのクレジットを確認・消費する
    #[default]
    Account,
    /// デモ: クレジットに触れない
    Demo,
}

/// リライト結果 + クレジット状況
#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutcome {
    pub result: RewriteResult,
    pub charged: bool,
    pub credits_remaining: Option<i64>,
}

/// ダッシュボード相当のサービス: セッション、オーケストレーター、クレジット方針を束ねる
pub struct RewriteService {
    session: Mutex<SessionContext>,
    orchestrator: RewriteOrchestrator,
    metrics: Arc<Metrics>,
    charge_fallback: bool,
    rewrite_count: AtomicU64,
}

impl RewriteService {
    pub fn new(
        session: SessionContext,
        orchestrator: RewriteOrchestrator,
        charge_fallback: bool,
    ) -> Self {
        let metrics = orchestrator.metrics().clone();
        Self {
            session: Mutex::new(session),
            orchestrator,
            metrics,
            charge_fallback,
            rewrite_count: AtomicU64::new(0),
        }
    }

    /// 設定とストアから構築し、保存済みセッションを復元する
    pub fn from_settings(
        settings: &HumanizerSettings,
        store: Box<dyn KvStore>,
    ) -> Result<Self, AppError> {
        let mut session = SessionContext::new(store, AccountDirectory::seeded());
        session.restore()?;
        Ok(Self::new(
            session,
            RewriteOrchestrator::from_settings(settings),
            settings.charge_fallback,
        ))
    }

    // ==================== Rewrite ====================

    pub async fn rewrite(
        &self,
        text: &str,
        style: &str,
        mode: RewriteMode,
    ) -> Result<RewriteOutcome, AppError> {
        let request = RewriteRequest::new(text, style).map_err(|e| {
            self.metrics.inc_rejected_empty();
            AppError::from(e)
        })?;

        if mode == RewriteMode::Account {
            let session = self.session.lock().unwrap();
            if session.user().is_some_and(|u| u.credits <= 0) {
                self.metrics.inc_rejected_no_credits();
                return Err(AppError::no_credits());
            }
        }

        let result = self.orchestrator.run(&request).await;
        self.rewrite_count.fetch_add(1, Ordering::Relaxed);

        let (charged, credits_remaining) = self.settle(mode, &result);

        Ok(RewriteOutcome {
            result,
            charged,
            credits_remaining,
        })
    }

    /// クレジット方針を適用する
    fn settle(&self, mode: RewriteMode, result: &RewriteResult) -> (bool, Option<i64>) {
        let mut session = self.session.lock().unwrap();
        let credits = session.user().map(|u| u.credits);

        if mode == RewriteMode::Demo || credits.is_none() || !self.should_charge(result) {
            return (false, credits);
        }

        match session.consume_credit() {
            Ok(remaining) => {
                self.metrics.inc_credits_charged();
                (true, Some(remaining))
            }
            Err(e) => {
                log::warn!("クレジット消費に失敗: {e}");
                (false, session.user().map(|u| u.credits))
            }
        }
    }

    fn should_charge(&self, result: &RewriteResult) -> bool {
        !result.text.is_empty() && (result.source.is_remote() || self.charge_fallback)
    }

    pub fn rewrite_count(&self) -> u64 {
        self.rewrite_count.load(Ordering::Relaxed)
    }

    // ==================== Session ====================

    pub fn current_user(&self) -> Option<User> {
        self.session.lock().unwrap().user().cloned()
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.session.lock().unwrap().login(email, password).cloned()
    }

    pub fn signup(&self, email: &str, username: &str, password: &str) -> Result<User, AppError> {
        self.session
            .lock()
            .unwrap()
            .signup(email, username, password)
            .cloned()
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.session.lock().unwrap().logout()
    }

    // ==================== Plans ====================

    /// 模擬決済でプランを変更する。free への変更は無料。
    pub fn upgrade(
        &self,
        plan: Plan,
        billing: Billing,
    ) -> Result<(PaymentReceipt, User), AppError> {
        let mut session = self.session.lock().unwrap();
        if !session.is_logged_in() {
            return Err(AppError::not_logged_in());
        }

        let receipt = PaymentReceipt {
            id: uuid::Uuid::new_v4().to_string(),
            plan,
            billing,
            amount_cents: plan.charge_cents(billing),
            paid_at: chrono::Utc::now().to_rfc3339(),
        };
        log::info!(
            "simulated payment {}: plan={} billing={} amount_cents={}",
            receipt.id,
            plan.as_str(),
            billing.as_str(),
            receipt.amount_cents
        );

        let user = session.change_plan(plan)?.clone();
        Ok((receipt, user))
    }

    // ==================== Metrics ====================

    pub fn get_metrics(&self) -> MetricsSummary {
        self.metrics.summary()
    }
}
