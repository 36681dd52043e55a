use std::net::SocketAddr;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use taskdesk::api::{self, ApiClient};
use taskdesk::config::{self, Settings, DEFAULT_HOST, DEFAULT_PORT};
use taskdesk::models::{AppState, Role, Roster, TaskStatus};
use taskdesk::routes::build_router;
use taskdesk::services::{self, spawn_refresh_driver, start_session, LoginForm, SessionHandle, SessionStore, TaskFormInput};

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", yansi::Paint::new(msg.to_string()).red());
    process::exit(1);
}

fn table_width() -> Option<u16> {
    terminal_size().map(|(Width(w), _)| w.saturating_sub(4))
}

fn build_client_from_env(env_file: Option<&str>) -> (Settings, ApiClient) {
    config::load_env_file(env_file);
    let settings = Settings::from_env();
    match ApiClient::new(&settings.api_base_url, settings.request_timeout) {
        Ok(api) => (settings, api),
        Err(e) => fail(format!("Invalid API configuration: {}", e)),
    }
}

async fn start_server(settings: Settings, api: ApiClient, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            fail(format!("Invalid host/port format: {}", e));
        }
    };

    let state = AppState::new(api, settings);
    let _driver = spawn_refresh_driver(
        state.api.clone(),
        state.sessions.clone(),
        state.settings.refresh_interval,
        state.settings.session_idle,
    );
    let app = build_router(state.clone());

    tracing::info!(%addr, api = state.api.base_url(), "Starting taskdesk server");
    println!(
        "{} {} {} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan(),
        yansi::Paint::new("using API").green(),
        yansi::Paint::new(state.api.base_url()).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                fail(format!("Server error: {}", e));
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

/// Log in the way the login view does and run the initial loads.
async fn open_session(api: &ApiClient, login: &LoginArgs) -> SessionHandle {
    let mut form = LoginForm::new(login.role, &login.username);
    let user = match form.submit(api).await {
        Ok(user) => user,
        Err(e) => fail(e.inline_message()),
    };
    println!(
        "{} {} ({})",
        yansi::Paint::new("Logged in as").green(),
        yansi::Paint::new(if user.name.is_empty() { "(anonymous)" } else { user.name.as_str() }).cyan(),
        user.role.label()
    );
    let handle = start_session(api, user).await;
    print_notices(&handle);
    handle
}

fn print_notices(handle: &SessionHandle) {
    for notice in handle.with(|s| s.take_notices()) {
        eprintln!("{}", yansi::Paint::new(notice).red());
    }
}

fn print_tasks(handle: &SessionHandle) {
    let list = handle.with(|s| s.task_list());
    if list.rows.is_empty() {
        println!("{}", yansi::Paint::new("(no tasks)").dim());
        return;
    }
    println!("\n{}\n", list.to_table(table_width()));
}

fn print_overdue(handle: &SessionHandle) {
    let lines = handle.with(|s| s.overdue.lines());
    if lines.is_empty() {
        return;
    }
    if lines.len() == 1 && lines[0] == services::overdue::NO_OVERDUE_MESSAGE {
        println!("{}", yansi::Paint::new(&lines[0]).green());
        return;
    }
    println!("{}", yansi::Paint::new("Overdue tasks:").yellow().bold());
    for line in lines {
        println!("  - {}", line);
    }
}

/// Accepts a roster id or a roster name.
fn resolve_assignee(roster: &Roster, raw: &str) -> String {
    if let Some(entry) = roster.lookup_value(raw) {
        return entry.id.to_string();
    }
    roster
        .entries()
        .iter()
        .find(|e| e.name == raw.trim())
        .map(|e| e.id.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

async fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    use std::io::Write;
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    match reader.read_line(&mut line).await {
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Print the outcome of an action, then the refreshed list.
fn report(handle: &SessionHandle, result: Result<(), services::ActionError>, done: &str) {
    if let Err(e) = result {
        let message = match &e {
            services::ActionError::Invalid(_) => handle
                .with(|s| s.form.error().map(str::to_string))
                .unwrap_or_else(|| e.notice()),
            _ => e.notice(),
        };
        fail(message);
    }
    println!("{}", yansi::Paint::new(done).green());
    print_notices(handle);
    print_tasks(handle);
}

#[derive(Parser)]
#[command(
    name = "taskdesk",
    author,
    version,
    about = "Task tracker client",
    long_about = r#"taskdesk - a client for the task tracker API.

Run the web front end with `serve`, or work with tasks straight from the terminal. Every task command logs in first, exactly like the login page: project managers (`--role pm`) may log in without a name, users (`--role user`) must give one.

Examples:
  1) Run the web front end:
      taskdesk serve --port 8080
  2) List your tasks as a user:
      taskdesk tasks --role user --username alice list
  3) Create a task as project manager:
      taskdesk tasks add --title "Ship it" --description "Release 1.0" --deadline 2024-06-01 --assignee alice
"#,
    after_help = "Use `taskdesk <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Args, Clone)]
struct LoginArgs {
    /// Role to log in with (pm or user)
    #[arg(long, default_value = "pm")]
    role: Role,
    /// Username; required for the user role
    #[arg(long, default_value = "")]
    username: String,
    /// Path to .env file
    #[arg(long)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Validate configuration
    #[command(
        about = "Validate configuration and ensure API connectivity.",
        long_about = "Print the resolved settings and check that the configured task API answers the users endpoint."
    )]
    CheckConfig {
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Work with tasks through the API
    #[command(about = "List, create, edit and delete tasks", long_about = "These commands perform the same actions as the web view and obey the same role rules: only project managers may add, edit or delete tasks, and users may only change the status of tasks assigned to them.")]
    Tasks {
        #[command(flatten)]
        login: LoginArgs,
        #[command(subcommand)]
        sub: TaskCommands,
    },
    /// Show the overdue notice (project managers only)
    Overdue {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Keep printing the task list as the periodic refresh updates it
    Watch {
        #[command(flatten)]
        login: LoginArgs,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List the tasks visible to the logged-in role
    List,
    /// Create a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        /// Assignee id or name from the roster
        #[arg(long)]
        assignee: String,
        #[arg(long, default_value = "Pending")]
        status: TaskStatus,
    },
    /// Edit a task; fields left out keep their current value
    Edit {
        task_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        task_id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Change the status of a task assigned to you
    Status { task_id: i64, status: TaskStatus },
}

async fn run_task_command(api: &ApiClient, handle: &SessionHandle, sub: TaskCommands) {
    match sub {
        TaskCommands::List => print_tasks(handle),
        TaskCommands::Add {
            title,
            description,
            deadline,
            assignee,
            status,
        } => {
            if let Err(e) = services::open_add_form(handle) {
                fail(e.notice());
            }
            let assigned_user_id = handle.with(|s| resolve_assignee(s.roster(), &assignee));
            let input = TaskFormInput {
                title,
                description,
                deadline,
                assigned_user_id,
                status,
            };
            let result = services::save_form(api, handle, Some(input)).await.map(|_| ());
            report(handle, result, "Task created");
        }
        TaskCommands::Edit {
            task_id,
            title,
            description,
            deadline,
            assignee,
            status,
        } => {
            if let Err(e) = services::open_edit_form(handle, task_id) {
                fail(e.notice());
            }
            let input = handle.with(|s| TaskFormInput {
                title: title.unwrap_or_else(|| s.form.title.clone()),
                description: description.unwrap_or_else(|| s.form.description.clone()),
                deadline: deadline.unwrap_or_else(|| s.form.deadline.clone()),
                assigned_user_id: match &assignee {
                    Some(raw) => resolve_assignee(s.roster(), raw),
                    None => s.form.assigned_user_id.clone(),
                },
                status: status.unwrap_or(s.form.status),
            });
            let result = services::save_form(api, handle, Some(input)).await.map(|_| ());
            report(handle, result, "Task updated");
        }
        TaskCommands::Delete { task_id, yes } => {
            let title = handle.with(|s| s.task(task_id).map(|t| t.title.clone()));
            let Some(title) = title else {
                fail(services::ActionError::UnknownTask(task_id).notice());
            };
            if !yes && !confirm(&format!("Delete task \"{}\"?", title)).await {
                println!("{}", yansi::Paint::new("Aborted").yellow());
                return;
            }
            let result = services::delete_task(api, handle, task_id).await;
            report(handle, result, "Task deleted");
        }
        TaskCommands::Status { task_id, status } => {
            let result = services::change_status(api, handle, task_id, status).await;
            report(handle, result, "Status updated");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        api::set_silent(true);
    }

    let Some(command) = cli.command else {
        let (settings, api) = build_client_from_env(None);
        start_server(settings, api, DEFAULT_HOST, DEFAULT_PORT).await;
        return;
    };

    match command {
        Commands::Serve { host, port, env_file } => {
            let (settings, api) = build_client_from_env(env_file.as_deref());
            start_server(settings, api, &host, port).await;
        }
        Commands::CheckConfig { env_file } => {
            let (settings, api) = build_client_from_env(env_file.as_deref());
            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL);
            table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            if let Some(w) = table_width() {
                table.set_width(w);
            }
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["API base URL".to_string(), settings.api_base_url.clone()]);
            table.add_row(vec!["Refresh interval".to_string(), format!("{}s", settings.refresh_interval.as_secs())]);
            table.add_row(vec!["Session idle window".to_string(), format!("{}s", settings.session_idle.as_secs())]);
            table.add_row(vec!["Request timeout".to_string(), format!("{}s", settings.request_timeout.as_secs())]);
            println!("\n{table}\n");

            match api::load_users(&api).await {
                Ok(users) => {
                    println!(
                        "{}",
                        yansi::Paint::new(format!("Configuration looks valid ({} users returned)", users.len())).green()
                    );
                }
                Err(e) => fail(format!("Configuration appears invalid: {}", e)),
            }
        }
        Commands::Tasks { login, sub } => {
            let (_, api) = build_client_from_env(login.env_file.as_deref());
            let handle = open_session(&api, &login).await;
            run_task_command(&api, &handle, sub).await;
        }
        Commands::Overdue { login } => {
            let (_, api) = build_client_from_env(login.env_file.as_deref());
            let handle = open_session(&api, &login).await;
            if !handle.view().is_project_manager() {
                fail("The overdue notice is only available to project managers.");
            }
            print_overdue(&handle);
        }
        Commands::Watch { login } => {
            let (settings, api) = build_client_from_env(login.env_file.as_deref());
            let handle = open_session(&api, &login).await;
            print_overdue(&handle);
            print_tasks(&handle);

            let sessions = SessionStore::new();
            sessions.insert(handle.clone());
            let mut revisions = handle.subscribe();
            let _driver = spawn_refresh_driver(api.clone(), sessions, settings.refresh_interval, Duration::MAX);
            println!(
                "{}",
                yansi::Paint::new(format!(
                    "Refreshing every {}s; press Ctrl-C to stop.",
                    settings.refresh_interval.as_secs()
                ))
                .dim()
            );
            while revisions.changed().await.is_ok() {
                print_notices(&handle);
                print_tasks(&handle);
            }
        }
    }
}
