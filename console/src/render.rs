//! Terminal rendering of each screen.
//!
//! Everything returns a `String` so the caller decides when to print.

use chrono::Local;
use colored::{ColoredString, Colorize};
use dashboard_lib::{AuthScreen, DashboardSnapshot, SyncStatus};
use shared::{Agent, AgentDetails, Session, ThemeMode};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 30;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    mode: ThemeMode,
}

impl Palette {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self.mode {
            ThemeMode::Light => text.bold().blue(),
            ThemeMode::Dark => text.bold().bright_cyan(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        match self.mode {
            ThemeMode::Light => text.dimmed(),
            ThemeMode::Dark => text.bright_black(),
        }
    }

    fn good(&self, text: &str) -> ColoredString {
        match self.mode {
            ThemeMode::Light => text.green(),
            ThemeMode::Dark => text.bright_green(),
        }
    }

    fn bad(&self, text: &str) -> ColoredString {
        match self.mode {
            ThemeMode::Light => text.red(),
            ThemeMode::Dark => text.bright_red(),
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.mode {
            ThemeMode::Light => text.magenta(),
            ThemeMode::Dark => text.bright_yellow(),
        }
    }
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "Agent")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn auth_screen(screen: AuthScreen, status: &str, palette: &Palette) -> String {
    let mut out = String::new();
    match screen {
        AuthScreen::SignUp => {
            out.push_str(&format!("{}\n", palette.heading("Sign Up")));
            out.push_str(&format!(
                "  {}\n  {}\n",
                palette.muted("signup <email> <password> <admin_id>"),
                palette.muted("Already have an account? Type 'login'.")
            ));
        }
        AuthScreen::Login => {
            out.push_str(&format!("{}\n", palette.heading("Login")));
            out.push_str(&format!(
                "  {}\n  {}\n",
                palette.muted("login <email> <password>"),
                palette.muted("Need an account? Type 'signup'.")
            ));
        }
    }
    if !status.is_empty() {
        let line = if status.starts_with("Error") || status.ends_with("failed") {
            palette.bad(status)
        } else {
            palette.accent(status)
        };
        out.push_str(&format!("  {}\n", line));
    }
    out
}

pub fn dashboard(session: &Session, snapshot: &DashboardSnapshot, palette: &Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        palette.heading("Dashboard"),
        palette.muted(&format!("{} ({})", session.email, session.admin_id))
    ));

    out.push_str(&format!(
        "  {} {}s",
        palette.muted("Next sync in"),
        snapshot.seconds_until_next_sync()
    ));
    if let Some(at) = snapshot.last_sync_at {
        out.push_str(&format!(
            "  {} {}",
            palette.muted("last"),
            at.with_timezone(&Local).format("%H:%M:%S")
        ));
    }
    out.push('\n');

    out.push_str(&format!("\n{}\n", palette.heading("Last Sync")));
    let status = snapshot.last_sync.to_string();
    let status = match snapshot.last_sync {
        SyncStatus::Failed(_) => palette.bad(&status),
        SyncStatus::Completed(_) => palette.good(&status),
        SyncStatus::Starting | SyncStatus::Working => palette.muted(&status),
    };
    out.push_str(&format!("{}\n", status));

    out.push_str(&format!("\n{}\n", palette.heading("Rows Written")));
    out.push_str(&write_chart(snapshot, palette));

    out.push_str(&format!("\n{}\n", palette.heading("Agents")));
    out.push_str(&roster_table(&snapshot.agents));
    out
}

pub fn agent_details(name: &str, details: &AgentDetails, palette: &Palette) -> String {
    let rows: Vec<DetailRow> = details
        .rows()
        .into_iter()
        .map(|(label, value)| DetailRow {
            label: label.to_string(),
            value,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!(
        "{} {}\n{}\n  {}\n",
        palette.heading("Agent"),
        palette.accent(name),
        table,
        palette.muted("Type 'back' to return.")
    )
}

fn roster_table(agents: &[Agent]) -> String {
    if agents.is_empty() {
        return "  No agents\n".to_string();
    }
    let rows: Vec<AgentRow> = agents
        .iter()
        .map(|agent| AgentRow {
            name: agent.name.clone(),
            status: if agent.active { "active" } else { "inactive" }.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

fn write_chart(snapshot: &DashboardSnapshot, palette: &Palette) -> String {
    let points = snapshot.chart_points();
    if points.is_empty() {
        return format!("  {}\n", palette.muted("No data yet"));
    }

    let max = points.iter().map(|(_, count)| *count).max().unwrap_or(0);
    points
        .iter()
        .map(|(label, count)| {
            let bar = "█".repeat(bar_len(*count, max));
            format!("  {:>4} {} {}\n", label, palette.good(&bar), count)
        })
        .collect()
}

fn bar_len(count: i64, max: i64) -> usize {
    if max <= 0 || count <= 0 {
        return 0;
    }
    (count as u128 * BAR_WIDTH as u128 / max as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_lib::{Countdown, WriteHistory};
    use serde_json::json;
    use shared::SyncResult;

    fn plain() -> Palette {
        colored::control::set_override(false);
        Palette::new(ThemeMode::Light)
    }

    fn snapshot() -> DashboardSnapshot {
        let mut history = WriteHistory::with_capacity(10);
        history.push(10);
        history.push(5);
        DashboardSnapshot {
            last_sync: SyncStatus::Completed(SyncResult::new(json!({"written_count": 5}))),
            write_history: history,
            agents: vec![Agent::new("alice", true), Agent::new("bob", false)],
            countdown: Countdown::new(10),
            last_sync_at: None,
        }
    }

    #[test]
    fn test_bar_len_scales_to_max() {
        assert_eq!(bar_len(10, 10), BAR_WIDTH);
        assert_eq!(bar_len(5, 10), BAR_WIDTH / 2);
        assert_eq!(bar_len(0, 10), 0);
        assert_eq!(bar_len(-3, 10), 0);
        assert_eq!(bar_len(4, 0), 0);
    }

    #[test]
    fn test_dashboard_shows_status_chart_and_roster() {
        let session = Session::new("ops@example.com", "adm-1");
        let out = dashboard(&session, &snapshot(), &plain());

        assert!(out.contains("ops@example.com (adm-1)"));
        assert!(out.contains("Next sync in 10s"));
        assert!(out.contains("\"written_count\": 5"));
        assert!(out.contains("#1"));
        assert!(out.contains("#2"));
        assert!(out.contains("alice"));
        assert!(out.contains("inactive"));
    }

    #[test]
    fn test_empty_dashboard() {
        let session = Session::new("ops@example.com", "adm-1");
        let mut snap = snapshot();
        snap.last_sync = SyncStatus::Starting;
        snap.write_history = WriteHistory::with_capacity(10);
        snap.agents.clear();

        let out = dashboard(&session, &snap, &plain());
        assert!(out.contains("Starting auto-sync..."));
        assert!(out.contains("No data yet"));
        assert!(out.contains("No agents"));
    }

    #[test]
    fn test_agent_details_fill_missing_with_dash() {
        let details = AgentDetails {
            total_calls: Some(json!(12)),
            ..Default::default()
        };
        let out = agent_details("alice", &details, &plain());
        assert!(out.contains("Total Calls"));
        assert!(out.contains("12"));
        assert!(out.contains(" - "));
    }

    #[test]
    fn test_auth_screen_includes_status_line() {
        let out = auth_screen(AuthScreen::Login, "Invalid credentials", &plain());
        assert!(out.contains("Login"));
        assert!(out.contains("Invalid credentials"));

        let out = auth_screen(AuthScreen::SignUp, "", &plain());
        assert!(out.contains("Sign Up"));
        assert!(!out.contains("Error"));
    }
}
