//! goqr - branded QR codes for TEDxWarwick go-links.
//!
//! Logs into GitHub with a personal access token, lists the short links kept
//! in the redirect repository, and writes the red-X QR code for one of them
//! as an SVG file.

mod app;
mod command;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use command::{Command, USAGE};
use goqr_core::api::ApiError;
use goqr_core::config::Config;

/// Log file name inside the configured log directory
const LOG_FILE_NAME: &str = "goqr.log";

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let (config, load_error) = Config::load();
    if let Some(e) = load_error {
        eprintln!("Warning: {:#}, using defaults", e);
    }

    let _guard = init_tracing(config.log_dir.as_deref());
    info!("goqr starting");

    let result = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => run(command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: Config) -> Result<()> {
    debug!(?command, "Dispatching");
    if let Command::Help = command {
        print!("{}", USAGE);
        return Ok(());
    }

    let mut app = App::new(config)?;

    match command {
        Command::Help => Ok(()),
        Command::Login { user } => login(&mut app, user).await,
        Command::Logout => {
            app.logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::List => list(&app).await,
        Command::Usage => {
            match app.session().user() {
                Some(user) => println!("Logged in as {}", user),
                None => println!("Not logged in"),
            }
            match app.usage().await? {
                Some(usage) => println!("{}", usage),
                None => println!("Usage information unavailable"),
            }
            Ok(())
        }
        Command::Generate {
            slug,
            out_dir,
            to_stdout,
        } => {
            let code = app.generate(&slug)?;
            if to_stdout {
                println!("{}", code.svg);
            } else {
                let path = app.save(&code, out_dir.as_deref())?;
                println!("{} -> {}", code.url, path.display());
            }
            Ok(())
        }
    }
}

async fn login(app: &mut App, user: Option<String>) -> Result<()> {
    let user = match user.or_else(|| std::env::var("GOQR_USER").ok()) {
        Some(user) => user,
        None => prompt_user(app.config().last_user.as_deref())?,
    };
    let token = match std::env::var("GOQR_TOKEN") {
        Ok(token) => token,
        Err(_) => rpassword::prompt_password("Token: ").context("Failed to read token")?,
    };

    println!("Checking credentials...");
    let outcome = app.login(&user, &token).await?;

    if outcome.authenticated {
        println!("Logged in as {}.", user.trim());
    } else {
        println!("Not logged in; saved credentials cleared.");
    }
    if let Some(usage) = outcome.usage {
        println!("{}", usage);
    }
    Ok(())
}

fn prompt_user(last_user: Option<&str>) -> Result<String> {
    match last_user {
        Some(last) => print!("GitHub user [{}]: ", last),
        None => print!("GitHub user: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_user) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

async fn list(app: &App) -> Result<()> {
    match app.list().await {
        Ok(listing) => {
            for slug in &listing.slugs {
                println!("{}", slug);
            }
            if let Some(usage) = listing.usage {
                eprintln!("{}", usage);
            }
            Ok(())
        }
        Err(e) => {
            if let Some(usage) = e.usage() {
                eprintln!("{}", usage);
            }
            Err(list_error(e))
        }
    }
}

fn list_error(e: ApiError) -> anyhow::Error {
    match e {
        ApiError::Api { .. } => anyhow::anyhow!("{}", e),
        other => anyhow::Error::new(other).context("Failed to fetch link list"),
    }
}
