mod commands;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use commands::Command;
use dashboard_lib::config::{
    DashboardConfig, PollSettings, RosterSourceConfig, DEFAULT_BACKEND_URL,
    DEFAULT_SYNC_EVERY_TICKS, ENV_BACKEND_URL, ENV_ROSTER_URL,
};
use dashboard_lib::history::DEFAULT_HISTORY_CAPACITY;
use dashboard_lib::{
    App, DashboardError, DashboardSnapshot, FileStorage, KeyValueStorage, MemoryStorage, Screen,
    ViewState,
};
use render::Palette;
use shared::SyncMode;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "agent-dashboard")]
#[command(about = "Terminal dashboard for backend sync status and the agent roster")]
struct Args {
    /// Backend server URL (auth, sync and REST roster)
    #[arg(long, env = ENV_BACKEND_URL, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Read the roster from a keyed document store at this URL instead
    #[arg(long, env = ENV_ROSTER_URL)]
    roster_url: Option<String>,

    /// Length of one countdown tick in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Sync and roster cadence, in ticks
    #[arg(long, default_value_t = DEFAULT_SYNC_EVERY_TICKS)]
    sync_every: u32,

    /// How many recent written counts to chart
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,

    /// Rows the backend writes per sync: all or single
    #[arg(long, default_value = "all")]
    sync_mode: SyncMode,

    /// Directory for the saved session and theme
    #[arg(long, env = "DASHBOARD_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long)]
    ephemeral: bool,
}

impl Args {
    fn config(&self) -> DashboardConfig {
        DashboardConfig {
            backend_url: self.backend_url.clone(),
            roster: match &self.roster_url {
                Some(base_url) => RosterSourceConfig::Document {
                    base_url: base_url.clone(),
                },
                None => RosterSourceConfig::Rest,
            },
            poll: PollSettings {
                tick: Duration::from_millis(self.tick_ms),
                sync_every_ticks: self.sync_every,
                history_capacity: self.history,
                sync_mode: self.sync_mode,
            },
            storage_dir: self.storage_dir.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.config();
    let (auth, backends) = config
        .connect()
        .context("Invalid backend configuration")?;

    let storage: Arc<dyn KeyValueStorage> = if args.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        match &config.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(
                FileStorage::in_default_location().context("Failed to locate storage directory")?,
            ),
        }
    };
    info!(backend = %config.backend_url, "Starting dashboard");

    let app = App::start(storage, auth, backends, config.poll.clone());
    run(app).await
}

async fn run(mut app: App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = app.dashboard().map(|d| d.subscribe());
    let mut last_drawn: Option<DashboardSnapshot> = None;

    show(&app, &mut last_drawn).await;
    print_prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let command = match commands::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => {
                        print_prompt();
                        continue;
                    }
                    Err(message) => {
                        println!("{}", message.yellow());
                        print_prompt();
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }

                let redraw = execute(&mut app, command).await;
                // The dashboard instance may have changed with navigation
                updates = app.dashboard().map(|d| d.subscribe());
                if redraw {
                    last_drawn = None;
                    show(&app, &mut last_drawn).await;
                }
                print_prompt();
            }
            snapshot = next_update(&mut updates) => {
                match snapshot {
                    Some(snapshot) if worth_redrawing(last_drawn.as_ref(), &snapshot) => {
                        show(&app, &mut last_drawn).await;
                        print_prompt();
                    }
                    Some(_) => {}
                    None => updates = None,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    debug!("Shutting down");
    Ok(())
}

/// Run one command. Returns whether the screen should be redrawn.
async fn execute(app: &mut App, command: Command) -> bool {
    let result = match command {
        Command::Signup {
            email,
            password,
            admin_id,
        } => app.signup(&email, &password, &admin_id).await.map(|_| ()),
        Command::ShowSignup => app.go_to_signup().map(|_| ()),
        Command::Login { email, password } => app.login(&email, &password).await.map(|_| ()),
        Command::ShowLogin => app.go_to_login().map(|_| ()),
        Command::Agent(name) => app.select_agent(&name).map(|_| ()),
        Command::Back => app.back().map(|_| ()),
        Command::Logout => app.logout().map(|_| ()),
        Command::Theme => app.toggle_theme().map(|_| ()),
        Command::Status => Ok(()),
        Command::Refresh => match app.dashboard() {
            Some(dashboard) => {
                dashboard.refresh();
                return false;
            }
            None => {
                println!("{}", "Refresh is only available on the dashboard".yellow());
                return false;
            }
        },
        Command::Help => {
            println!("{}", commands::HELP);
            return false;
        }
        Command::Quit => return false,
    };

    match result {
        Ok(()) => true,
        // Auth failures are already shown inline on the form
        Err(DashboardError::Auth(_) | DashboardError::Network(_) | DashboardError::Validation(_))
            if matches!(app.view(), ViewState::SignedOut(_)) =>
        {
            true
        }
        Err(e) => {
            println!("{}", e.to_string().red());
            false
        }
    }
}

async fn show(app: &App, last_drawn: &mut Option<DashboardSnapshot>) {
    let palette = Palette::new(app.theme().mode);
    let screen = match app.view() {
        ViewState::SignedOut(screen) => render::auth_screen(*screen, app.auth_status(), &palette),
        ViewState::SignedIn {
            session,
            screen: Screen::Dashboard,
        } => match app.dashboard_snapshot() {
            Some(snapshot) => {
                let out = render::dashboard(session, &snapshot, &palette);
                *last_drawn = Some(snapshot);
                out
            }
            None => String::new(),
        },
        ViewState::SignedIn {
            screen: Screen::AgentDetail(name),
            ..
        } => match app.agent_details().await {
            Ok(details) => render::agent_details(name, &details, &palette),
            Err(e) => e.to_string(),
        },
    };
    println!("\n{}", screen);
}

/// Countdown ticks alone do not warrant a redraw
fn worth_redrawing(previous: Option<&DashboardSnapshot>, next: &DashboardSnapshot) -> bool {
    match previous {
        None => true,
        Some(previous) => {
            previous.last_sync != next.last_sync
                || previous.agents != next.agents
                || previous.last_sync_at != next.last_sync_at
        }
    }
}

async fn next_update(
    updates: &mut Option<watch::Receiver<DashboardSnapshot>>,
) -> Option<DashboardSnapshot> {
    match updates {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("{} ", ">".bright_blue());
    let _ = std::io::stdout().flush();
}
