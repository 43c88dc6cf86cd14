pub mod commands;
pub mod payload;
pub mod server;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CmdResult, CommandError};

/// テキストヒューマナイザー CLI
#[derive(Debug, Parser)]
#[command(
    name = "texthuman",
    version,
    about = "Rewrite text so it reads as human-written"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List styles and their upstream parameters
    Styles,
    /// Rewrite text (`-` or no argument reads stdin)
    Rewrite {
        text: Option<String>,
        #[arg(short, long)]
        style: Option<String>,
        /// Do not check or charge credits
        #[arg(long)]
        demo: bool,
        /// Print the metrics summary afterwards
        #[arg(long)]
        stats: bool,
    },
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Signup {
        email: String,
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Show plans and prices
    Plans,
    /// Change plan with a simulated payment
    Upgrade {
        plan: String,
        #[arg(long, default_value = "monthly")]
        billing: String,
    },
    /// Show or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run the send-text-to-api relay
    Serve {
        #[arg(long)]
        bind: Option<String>,
        /// Forward to the upstream humanizer before the local rewrite
        #[arg(long)]
        forward_upstream: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the settings stored in the database
    Show,
    /// Store one setting (value is parsed as JSON, otherwise taken as a string)
    Set { key: String, value: String },
}

pub fn run() -> ExitCode {
    // RUST_LOG で制御。log クレート経由のログも tracing に流れる
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            match e {
                CommandError::Usage(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn dispatch(command: Command) -> CmdResult<()> {
    match command {
        Command::Styles => commands::styles(),
        Command::Config { action } => {
            let store = commands::open_store()?;
            match action {
                ConfigAction::Show => commands::config_show(&store),
                ConfigAction::Set { key, value } => commands::config_set(&store, &key, &value),
            }
        }
        Command::Serve {
            bind,
            forward_upstream,
        } => {
            // リレーはセッションを使わないので設定だけ読む
            let settings = commands::load_settings(&commands::open_store()?)?;
            commands::serve(settings, bind, forward_upstream).await
        }
        command => {
            let ctx = commands::open_context()?;
            dispatch_session(&ctx, command).await
        }
    }
}

async fn dispatch_session(ctx: &commands::AppContext, command: Command) -> CmdResult<()> {
    match command {
        Command::Rewrite {
            text,
            style,
            demo,
            stats,
        } => {
            let text = commands::read_input(text)?;
            commands::rewrite(ctx, text, style, demo, stats).await
        }
        Command::Login { email, password } => commands::login(ctx, &email, &password),
        Command::Signup {
            email,
            username,
            password,
        } => commands::signup(ctx, &email, &username, &password),
        Command::Logout => commands::logout(ctx),
        Command::Whoami => commands::whoami(ctx),
        Command::Plans => commands::plans(ctx),
        Command::Upgrade { plan, billing } => commands::upgrade(ctx, &plan, &billing),
        other => Err(CommandError::Usage(format!("not a session command: {other:?}"))),
    }
}
