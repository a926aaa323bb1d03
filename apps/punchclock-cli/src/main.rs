//! Main entry point for the Punchclock CLI.
//!
//! Loads layered configuration, initializes logging, wires the attendance
//! module to a snapshot store, and exposes the attendance operations as
//! subcommands. This binary is the in-process stand-in for the web UI the
//! system was designed around.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, StoreBackendKind};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use attendance::contract::client::AttendanceApi;
use attendance::contract::model::{GeolocationData, NewUser, Role, User};
use attendance::domain::attendance::AttendanceService;
use attendance::domain::audit::AuditLogService;
use attendance::domain::auth::AuthService;
use attendance::domain::directory::DirectoryService;
use attendance::domain::ports::{Geolocator, QrDecoder};
use attendance::domain::session::SessionStore;
use attendance::gateways::local::LocalAttendanceClient;
use attendance::infra::collaborators::{
    DeniedGeolocator, FileQrDecoder, FixedGeolocator, HostIpLookup,
};
use attendance::infra::seed;
use snapstore::{FileBackend, MemoryBackend, SnapshotBackend, Store};

/// Punchclock - attendance tracking from the command line
#[derive(Parser)]
#[command(name = "punchclock")]
#[command(about = "Punchclock - attendance tracking from the command line")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable the simulated store latency
    #[arg(long)]
    zero_latency: bool,

    /// Override the store data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session and attendance status
    Status,
    /// Sign in with a username/password pair or a badge payload file
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        /// File holding a decoded badge payload ("username:password")
        #[arg(long, conflicts_with_all = ["username", "password"])]
        badge: Option<PathBuf>,
    },
    /// Clear the stored session
    Logout,
    /// Flip the signed-in user's attendance status
    Toggle {
        /// Report these coordinates instead of denying geolocation
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
    /// List audit log entries, newest first
    Logs {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Manage the user directory
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Check configuration and store reachability
    Check,
}

#[derive(Subcommand)]
enum UsersCommands {
    /// List all users
    List,
    /// Create a user
    Add {
        display_name: String,
        username: String,
        password: String,
        #[arg(long)]
        admin: bool,
    },
    /// Delete a user by id
    Rm { id: uuid::Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
        zero_latency: cli.zero_latency,
        data_dir: cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
    };

    if let Some(path) = cli.config.as_deref() {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
    }

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (latency / data dir / verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::debug!("Punchclock starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Check => check(config).await,
        command => run_command(config, command).await,
    }
}

/// Build the store from configuration.
fn build_store(config: &AppConfig) -> Store {
    let backend: Arc<dyn SnapshotBackend> = match config.store.backend {
        StoreBackendKind::Memory => Arc::new(MemoryBackend::new()),
        StoreBackendKind::File => Arc::new(FileBackend::new(config.store_data_dir())),
    };
    Store::new(backend, config.store.latency)
}

/// Wire the attendance module over the configured store.
fn build_client(
    store: Store,
    sessions: Arc<SessionStore>,
    geo: Arc<dyn Geolocator>,
) -> LocalAttendanceClient {
    let directory = Arc::new(DirectoryService::new(store.clone()));
    let audit = Arc::new(AuditLogService::new(store.clone()));
    let auth = Arc::new(AuthService::new(store, sessions.clone()));
    let machine = Arc::new(AttendanceService::new(
        directory.clone(),
        audit.clone(),
        sessions.clone(),
        Arc::new(HostIpLookup),
        geo,
    ));
    LocalAttendanceClient::new(directory, auth, audit, machine, sessions)
}

async fn run_command(config: AppConfig, command: Commands) -> Result<()> {
    let store = build_store(&config);
    seed::bootstrap(&store)
        .await
        .context("Failed to bootstrap the store")?;

    let sessions = Arc::new(SessionStore::at_path(
        Path::new(&config.server.home_dir).join("session.json"),
    ));

    let geo: Arc<dyn Geolocator> = match &command {
        Commands::Toggle {
            lat: Some(lat),
            lon: Some(lon),
        } => Arc::new(FixedGeolocator(GeolocationData {
            latitude: *lat,
            longitude: *lon,
        })),
        _ => Arc::new(DeniedGeolocator),
    };

    let client = build_client(store, sessions, geo);

    // Startup revalidation: directory and audit log must both load before
    // any command runs; a stale stored identity is discarded here.
    let session = client
        .restore_session()
        .await
        .context("Failed to load attendance data; please retry")?;

    match command {
        Commands::Status => {
            match session {
                Some(user) => print_user(&user),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Commands::Login {
            username,
            password,
            badge,
        } => {
            let (username, password) = match badge {
                Some(path) => {
                    let payload = FileQrDecoder { path }
                        .decode()
                        .await
                        .map_err(|e| anyhow!("Badge decode failed: {e}"))?;
                    let (u, p) = payload
                        .split_once(':')
                        .ok_or_else(|| anyhow!("Badge payload must be 'username:password'"))?;
                    (u.to_string(), p.to_string())
                }
                None => (
                    username.ok_or_else(|| anyhow!("--username is required without --badge"))?,
                    password.ok_or_else(|| anyhow!("--password is required without --badge"))?,
                ),
            };

            let user = client.login(&username, &password).await?;
            println!("Signed in as {} ({})", user.display_name, user.username);
            Ok(())
        }
        Commands::Logout => {
            client.logout();
            println!("Signed out.");
            Ok(())
        }
        Commands::Toggle { .. } => {
            let outcome = client.toggle().await;
            println!("{}", outcome.message);
            if outcome.success {
                Ok(())
            } else {
                Err(anyhow!("Attendance was not recorded"))
            }
        }
        Commands::Logs { limit } => {
            let logs = client.list_logs().await?;
            let shown = limit.unwrap_or(logs.len());
            for entry in logs.iter().take(shown) {
                let location = match &entry.location {
                    Some(loc) => format!("{:.4},{:.4}", loc.latitude, loc.longitude),
                    None => entry
                        .location_error
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                };
                println!(
                    "{}  {:3?}  {:<20}  ip={}  location={}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.kind,
                    entry.user_display_name,
                    entry.ip,
                    location
                );
            }
            println!("{} entries total", logs.len());
            Ok(())
        }
        Commands::Users { command } => run_users_command(&client, command).await,
        Commands::Check => unreachable!("handled in main"),
    }
}

async fn run_users_command(client: &LocalAttendanceClient, command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List => {
            for user in client.list_users().await? {
                print_user(&user);
            }
            Ok(())
        }
        UsersCommands::Add {
            display_name,
            username,
            password,
            admin,
        } => {
            let user = client
                .add_user(NewUser {
                    display_name,
                    username,
                    password,
                    role: if admin { Role::Admin } else { Role::Employee },
                })
                .await?;
            println!("Created {} ({})", user.display_name, user.id);
            Ok(())
        }
        UsersCommands::Rm { id } => {
            client.delete_user(id).await?;
            println!("Deleted {id} (if present)");
            Ok(())
        }
    }
}

async fn check(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let store = build_store(&config);
    seed::bootstrap(&store)
        .await
        .context("Store is not reachable")?;

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn print_user(user: &User) {
    let last = match user.last_check_in {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "never".to_string(),
    };
    println!(
        "{}  {:<20}  {:<10}  {:10?}  {:12?}  last check-in: {}",
        user.id, user.display_name, user.username, user.role, user.status, last
    );
}
