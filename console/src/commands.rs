//! Line commands typed at the dashboard prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the signup form. Missing words are sent as empty fields.
    Signup {
        email: String,
        password: String,
        admin_id: String,
    },
    ShowSignup,
    Login {
        email: String,
        password: String,
    },
    ShowLogin,
    Agent(String),
    Back,
    Logout,
    Theme,
    Status,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  signup                          switch to the signup form
  signup <email> <pw> <admin_id>  create an account
  login                           switch to the login form
  login <email> <pw>              log in
  agent <name>                    show one agent's statistics
  back                            return to the dashboard
  logout                          sign out (dashboard only)
  refresh                         sync now
  status                          redraw the current screen
  theme                           toggle light/dark
  help                            this text
  quit                            exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Ok(None);
    };
    let arg = |idx: usize| args.get(idx).copied().unwrap_or("").to_string();

    let command = match verb.to_ascii_lowercase().as_str() {
        "signup" if args.is_empty() => Command::ShowSignup,
        "signup" => Command::Signup {
            email: arg(0),
            password: arg(1),
            admin_id: arg(2),
        },
        "login" if args.is_empty() => Command::ShowLogin,
        "login" => Command::Login {
            email: arg(0),
            password: arg(1),
        },
        "agent" => match args {
            [] => return Err("usage: agent <name>".to_string()),
            _ => Command::Agent(args.join(" ")),
        },
        "back" => Command::Back,
        "logout" => Command::Logout,
        "theme" => Command::Theme,
        "status" => Command::Status,
        "refresh" | "sync" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}
