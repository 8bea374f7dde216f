//! Portal Console — session shell for the procurement administration API.
//!
//! Wires the token store, the request pipeline, the session manager, and
//! the router together, restores any persisted session, and runs one
//! command. A `login --remember` followed by `whoami` in a fresh process
//! exercises the durable backend end to end.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tabled::{Table, Tabled};
use tokio::sync::broadcast;
use tracing_subscriber::{EnvFilter, fmt};

use portal_auth::{ResetFlow, RouteGuard, Router, SessionManager};
use portal_client::ApiClient;
use portal_core::config::AppConfig;
use portal_core::error::ErrorKind;
use portal_core::types::LoginCredentials;
use portal_core::{AppError, AppResult};
use portal_store::TokenStore;

#[derive(Debug, Parser)]
#[command(name = "portal-console", about = "Procurement portal session console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authenticate against the portal backend
    Login {
        /// Login name (prompted if omitted)
        username: Option<String>,
        /// Persist the session across restarts
        #[arg(long)]
        remember: bool,
    },
    /// End the current session
    Logout,
    /// Refresh and display the current user profile
    Whoami,
    /// Display the current session state
    Status,
    /// Submit a password-reset request
    RequestReset {
        /// Login name to reset
        username: String,
    },
    /// Evaluate a navigation through the route guard
    Navigate {
        /// Target path, e.g. /admin
        path: String,
    },
}

/// The wired application stack.
struct Stack {
    session: Arc<SessionManager>,
    reset: Arc<ResetFlow>,
    router: Arc<Router>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, cli.command).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("{}", describe(&e));
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PORTAL_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().compact().with_env_filter(filter).with_target(false).init();
        }
    }
}

/// Wire the stack and restore any persisted session before running the
/// requested command — the same order the application shell uses.
async fn run(config: AppConfig, command: Command) -> AppResult<()> {
    let stack = build_stack(&config)?;
    stack.session.initialize().await;

    match command {
        Command::Login { username, remember } => login(&stack, username, remember).await,
        Command::Logout => {
            stack.session.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => whoami(&stack).await,
        Command::Status => status(&stack).await,
        Command::RequestReset { username } => {
            stack.reset.request_reset(&username).await?;
            let state = stack.reset.state().await;
            println!(
                "{}",
                state
                    .message
                    .unwrap_or_else(|| "Reset request submitted.".to_string())
            );
            Ok(())
        }
        Command::Navigate { path } => {
            let navigation = stack.router.navigate(&path).await;
            if navigation.entered() {
                println!("Entered {}", navigation.to);
            } else {
                println!(
                    "Redirected to {} ({:?})",
                    navigation.to, navigation.decision
                );
            }
            Ok(())
        }
    }
}

fn build_stack(config: &AppConfig) -> AppResult<Stack> {
    let (events, _) = broadcast::channel(32);

    let store = Arc::new(TokenStore::new(config.session.storage_path.clone()));
    let api = ApiClient::new(&config.api, Arc::clone(&store), events.clone())?;
    let session = Arc::new(SessionManager::new(
        api.clone(),
        Arc::clone(&store),
        events.clone(),
    ));
    let reset = Arc::new(ResetFlow::new(api.clone()));
    let guard = RouteGuard::new(Arc::clone(&session), Arc::clone(&reset));
    let router = Arc::new(Router::new(
        Router::default_routes(),
        guard,
        Arc::clone(&session),
    ));
    Arc::clone(&router).spawn_invalidation_watcher(events.subscribe());

    Ok(Stack {
        session,
        reset,
        router,
    })
}

async fn login(stack: &Stack, username: Option<String>, remember: bool) -> AppResult<()> {
    let username = match username {
        Some(username) => username,
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?,
    };
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

    let session = stack
        .session
        .login(&LoginCredentials::new(username, password), remember)
        .await?;

    let Some(user) = session.user else {
        println!("Logged in.");
        return Ok(());
    };
    println!("Welcome, {} ({})", user.name, user.role);
    if remember {
        println!("Session persisted; it will survive a restart.");
    }
    Ok(())
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Role")]
    role: String,
}

async fn whoami(stack: &Stack) -> AppResult<()> {
    if !stack.session.is_authenticated().await {
        println!("Not logged in.");
        return Ok(());
    }

    stack.session.refresh_user().await;
    match stack.session.user().await {
        Some(user) => {
            let row = ProfileRow {
                id: user.id,
                name: user.name,
                username: user.username,
                role: user.role.to_string(),
            };
            println!("{}", Table::new([row]));
            Ok(())
        }
        // The refresh hit a 401 and the watcher cleared the session.
        None => {
            println!("Session is no longer valid; please log in again.");
            Ok(())
        }
    }
}

async fn status(stack: &Stack) -> AppResult<()> {
    let valid = stack.session.check_expiration().await;
    let snapshot = stack.session.snapshot().await;

    if !snapshot.is_authenticated() {
        println!("Anonymous{}", if valid { "" } else { " (session expired)" });
        return Ok(());
    }

    let Some(user) = snapshot.user else {
        println!("Session is no longer valid; please log in again.");
        return Ok(());
    };
    println!(
        "Authenticated as {} ({}), {} session{}",
        user.username,
        user.role,
        if snapshot.persistent {
            "persistent"
        } else {
            "volatile"
        },
        match snapshot.expires_at {
            Some(expires_at) => format!(", expires {expires_at}"),
            None => String::new(),
        }
    );
    Ok(())
}

/// Render an error the way the login form would.
fn describe(err: &AppError) -> String {
    match err.kind {
        ErrorKind::InvalidCredentials => "Wrong username or password".to_string(),
        ErrorKind::Validation => format!("Invalid input: {}", err.message),
        ErrorKind::RateLimited => "Too many attempts, try again later".to_string(),
        ErrorKind::Network => "No connection to server".to_string(),
        ErrorKind::SessionExpired => "Session expired, please log in again".to_string(),
        _ => format!("Error: {}", err.message),
    }
}
