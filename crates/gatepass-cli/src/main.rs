//! gatepass - command line client for the ticketing and check-in service.
//!
//! Log in, view and update the customer profile, recover a password, list
//! tickets with their QR links, and browse check-in history.

mod app;
mod render;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gatepass_core::models::TicketFilter;
use gatepass_core::Config;

use app::App;

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "gatepass.log";

#[derive(Debug, Parser)]
#[command(name = "gatepass", version, about = "Event tickets and check-in history from the command line")]
struct Cli {
    /// Service base URL (overrides config and GATEPASS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show server and session state
    Status,
    /// Summary of tickets and check-ins
    Home,
    /// Show the customer profile
    Profile,
    /// Change name, phone, or age
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Change the password of the logged-in account
    ChangePassword,
    /// Request a verification code for a forgotten password
    ForgotPassword {
        /// Email or username
        identifier: String,
    },
    /// Check the verification code sent by email
    VerifyOtp {
        identifier: String,
        otp: String,
    },
    /// Set a new password after verification
    ResetPassword {
        identifier: String,
    },
    /// List tickets
    Tickets {
        /// Filter by event name
        #[arg(short, long, default_value = "")]
        search: String,
        /// Hide tickets that were already used
        #[arg(long)]
        unused: bool,
        /// Print QR code links
        #[arg(long)]
        qr: bool,
    },
    /// List check-in history
    Checkins {
        /// Filter by ticket code
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// Stderr gets `RUST_LOG` filtered output (default `warn`); when a cache
/// directory is available, a daily log file receives the same events.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    let mut app = App::new(config)?;

    match cli.command {
        Command::Login { username } => app.login(username).await,
        Command::Logout => app.logout().await,
        Command::Status => app.status().await,
        Command::Home => app.home().await,
        Command::Profile => app.profile().await,
        Command::UpdateProfile { name, phone, age } => app.update_profile(name, phone, age).await,
        Command::ChangePassword => app.change_password().await,
        Command::ForgotPassword { identifier } => app.forgot_password(&identifier).await,
        Command::VerifyOtp { identifier, otp } => app.verify_otp(&identifier, &otp).await,
        Command::ResetPassword { identifier } => app.reset_password(&identifier).await,
        Command::Tickets { search, unused, qr } => {
            let filter = TicketFilter {
                query: search,
                unused_only: unused,
            };
            app.tickets(filter, qr).await
        }
        Command::Checkins { search } => app.check_ins(&search).await,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let log_dir = config
        .cache_dir()
        .ok()
        .map(|dir| dir.join("logs"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());
    let _guard = init_tracing(log_dir.as_deref());
    info!(command = ?cli.command, "gatepass starting");

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
