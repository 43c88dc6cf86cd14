use std::io::Read;
use std::path::PathBuf;

use th_core::domain::account::{format_usd, Billing, Plan, User};
use th_core::domain::error::AppError;
use th_core::domain::settings::HumanizerSettings;
use th_core::domain::style::Style;
use th_core::infra::storage::SqliteStore;
use th_core::usecase::rewrite_service::{RewriteMode, RewriteService};

use crate::server::{self, RelayConfig};

/// コマンドエラー型
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    App(#[from] AppError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

pub type CmdResult<T> = Result<T, CommandError>;

/// 起動時に組み立てるサービス一式
pub struct AppContext {
    pub settings: HumanizerSettings,
    pub service: RewriteService,
}

/// DB パス。TH_DB_PATH が無ければデータディレクトリに配置する
pub fn db_path() -> PathBuf {
    if let Ok(path) = std::env::var("TH_DB_PATH") {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("texthuman")
        .join("texthuman.db")
}

/// DB を開く（親ディレクトリが無ければ作成）
pub fn open_store() -> CmdResult<SqliteStore> {
    let path = db_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    log::debug!("db: {}", path.display());
    Ok(SqliteStore::open(&path.to_string_lossy())?)
}

/// 保存済み設定に TH_* 環境変数を重ねる
pub fn load_settings(store: &SqliteStore) -> CmdResult<HumanizerSettings> {
    Ok(store
        .get_settings()?
        .with_overrides(|key| std::env::var(key).ok()))
}

/// SQLite を開き、保存済み設定に環境変数を重ねてサービスを構築する
pub fn open_context() -> CmdResult<AppContext> {
    let store = open_store()?;
    let settings = load_settings(&store)?;
    let service = RewriteService::from_settings(&settings, Box::new(store))?;
    Ok(AppContext { settings, service })
}

// --- Commands ---

pub fn styles() -> CmdResult<()> {
    for style in Style::ALL {
        let m = style.mapping();
        println!(
            "{:<9} readability={:<12} purpose={:<18} strength={}",
            style.as_str(),
            m.readability,
            m.purpose,
            m.strength
        );
    }
    Ok(())
}

/// `-` または省略時は stdin から読む
pub fn read_input(text: Option<String>) -> CmdResult<String> {
    match text.as_deref() {
        Some(t) if t != "-" => Ok(t.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub async fn rewrite(
    ctx: &AppContext,
    text: String,
    style: Option<String>,
    demo: bool,
    stats: bool,
) -> CmdResult<()> {
    let style = style.unwrap_or_else(|| ctx.settings.default_style.clone());
    let mode = if demo {
        RewriteMode::Demo
    } else {
        RewriteMode::Account
    };

    let outcome = ctx.service.rewrite(&text, &style, mode).await?;
    println!("{}", outcome.result.text);

    eprintln!("source: {}", outcome.result.source.as_str());
    match (outcome.charged, outcome.credits_remaining) {
        (true, Some(left)) => eprintln!("1 credit used, {left} remaining"),
        (false, Some(left)) => eprintln!("no credit charged, {left} remaining"),
        _ => {}
    }

    if stats {
        let summary = ctx.service.get_metrics();
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::internal(format!("metrics serialize: {e}")))?;
        eprintln!("{json}");
    }
    Ok(())
}

pub fn login(ctx: &AppContext, email: &str, password: &str) -> CmdResult<()> {
    let user = ctx.service.login(email, password)?;
    eprintln!("Logged in as {}", user.username);
    print_user(&user);
    Ok(())
}

pub fn signup(ctx: &AppContext, email: &str, username: &str, password: &str) -> CmdResult<()> {
    let user = ctx.service.signup(email, username, password)?;
    eprintln!("Account created. Welcome, {}!", user.username);
    print_user(&user);
    Ok(())
}

pub fn logout(ctx: &AppContext) -> CmdResult<()> {
    ctx.service.logout()?;
    eprintln!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> CmdResult<()> {
    match ctx.service.current_user() {
        Some(user) => print_user(&user),
        None => eprintln!("Not logged in"),
    }
    Ok(())
}

pub fn plans(ctx: &AppContext) -> CmdResult<()> {
    let current = ctx.service.current_user().map(|u| u.plan);
    for plan in Plan::ALL {
        let marker = if current == Some(plan) { "*" } else { " " };
        println!(
            "{marker} {:<10} +{:<4} credits  {}/mo monthly  {}/mo annual",
            plan.as_str(),
            plan.credit_grant(),
            format_usd(plan.monthly_price_cents(Billing::Monthly)),
            format_usd(plan.monthly_price_cents(Billing::Annual))
        );
    }
    Ok(())
}

pub fn upgrade(ctx: &AppContext, plan: &str, billing: &str) -> CmdResult<()> {
    let Some(plan) = Plan::parse(plan) else {
        return Err(CommandError::Usage(format!("unknown plan: {plan}")));
    };
    let Some(billing) = Billing::parse(billing) else {
        return Err(CommandError::Usage(format!("unknown billing cycle: {billing}")));
    };

    let (receipt, user) = ctx.service.upgrade(plan, billing)?;
    eprintln!(
        "Payment of {} ({}) accepted, receipt {}",
        format_usd(receipt.amount_cents),
        receipt.billing.as_str(),
        receipt.id
    );
    print_user(&user);
    Ok(())
}

pub async fn serve(
    settings: HumanizerSettings,
    bind: Option<String>,
    forward_upstream: bool,
) -> CmdResult<()> {
    let mut config = RelayConfig::from_env(settings);
    if let Some(bind) = bind {
        config.bind = bind;
    }
    config.forward_upstream |= forward_upstream;
    server::serve(config).await
}

/// 保存済み設定を JSON で表示する（環境変数による上書きは含まない）
pub fn config_show(store: &SqliteStore) -> CmdResult<()> {
    let settings = store.get_settings()?;
    let json = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::internal(format!("settings serialize: {e}")))?;
    println!("{json}");
    Ok(())
}

pub fn config_set(store: &SqliteStore, key: &str, value: &str) -> CmdResult<()> {
    let settings = store
        .get_settings()?
        .with_field(key, value)
        .map_err(|e| CommandError::Usage(e.message))?;
    store.save_settings(&settings)?;
    eprintln!("Saved {key}");
    Ok(())
}

fn print_user(user: &User) {
    println!(
        "{} <{}> plan={} credits={}",
        user.username,
        user.email,
        user.plan.as_str(),
        user.credits
    );
}
