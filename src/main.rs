use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use authgate::config::{ClientConfig, normalize_base_url};
use authgate::form::{AuthMode, FormError, LoginForm, RegisterForm, submit_error_message};
use authgate::view::{DashboardSummary, View, route};
use authgate::{ConfigError, FileStore, HttpGateway, SessionController, SessionStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Auth(String),
    #[error("not signed in")]
    NotSignedIn,
}

#[derive(Parser, Debug)]
#[command(name = "authgate", about = "Sign in to an auth API and manage the local session")]
struct Cli {
    #[arg(long, env = "AUTH_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "AUTH_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange email and password for a session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in with it.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the signed-in user.
    Whoami,
    /// Show the session status.
    Status,
    /// End the session.
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = normalize_base_url(base_url)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, session_file = %config.session_file.display(), "starting");

    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(&config.session_file));
    let gateway = HttpGateway::new(&config, store.clone())
        .map_err(|e| CliError::Auth(submit_error_message(&e, AuthMode::Login)))?;
    let ctrl = SessionController::new(Arc::new(gateway), store);
    ctrl.initialize().await;

    match cli.command {
        Command::Login { email, password } => {
            let form = LoginForm { email, password };
            let user = ctrl
                .login(&form.credentials())
                .await
                .map_err(|e| CliError::Auth(submit_error_message(&e, AuthMode::Login)))?;
            print!("{}", DashboardSummary::from_user(&user));
            Ok(())
        }
        Command::Register { name, email, password, confirm_password } => {
            let form = RegisterForm { name, email, password, confirm_password };
            let credentials = form.validate()?;
            let user = ctrl
                .register(&credentials)
                .await
                .map_err(|e| CliError::Auth(submit_error_message(&e, AuthMode::Register)))?;
            print!("{}", DashboardSummary::from_user(&user));
            Ok(())
        }
        Command::Whoami => {
            let state = ctrl.state();
            let user = state.user.as_ref().ok_or(CliError::NotSignedIn)?;
            print!("{}", DashboardSummary::from_user(user));
            Ok(())
        }
        Command::Status => {
            let state = ctrl.state();
            let view = match route(&state) {
                View::Loading => "loading",
                View::Login => "login",
                View::Dashboard => "dashboard",
            };
            println!("status: {:?}", state.status());
            println!("view: {view}");
            if let Some(user) = &state.user {
                println!("user: {} <{}>", user.name, user.email);
            }
            Ok(())
        }
        Command::Logout => {
            if let Some(remote) = ctrl.logout() {
                let _ = remote.await;
            }
            println!("signed out");
            Ok(())
        }
    }
}
