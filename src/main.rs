use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};

use tasks_client::{render, render_task, App, Operation, TaskApi, TaskClient};
use tasks_core::{due_date, DueDateInput, SortOrder, TaskFilter, TaskId, TaskInput};
use tasks_settings::TaskSettings;
use tasks_store::Database;
use tasks_telemetry::TelemetryConfig;

#[derive(Parser, Debug)]
#[command(name = "tasks", version, about = "Task tracking service and client")]
struct Cli {
    /// Settings file (defaults to ~/.tasks/settings.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL for client commands.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Subcommand, Debug)]
enum ClientCommand {
    /// List tasks ordered by due date.
    List {
        #[arg(long)]
        completed: Option<bool>,
        /// Latest due date first.
        #[arg(long)]
        desc: bool,
    },
    /// Show one task.
    Show { id: TaskId },
    /// Create a task. Without --due the server assigns the current time.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_due)]
        due: Option<NaiveDateTime>,
        #[arg(long)]
        completed: bool,
    },
    /// Replace a task's fields; unspecified fields keep their current values.
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
        due: Option<NaiveDateTime>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task.
    Delete { id: TaskId },
}

fn parse_due(raw: &str) -> Result<NaiveDateTime, String> {
    due_date::parse_wire(raw)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => tasks_settings::load_settings_from_path(path),
        None => tasks_settings::load_settings(),
    }
    .context("loading settings")?;
    if let Some(server) = &cli.server {
        settings.client.base_url = server.clone();
    }

    let mut telemetry = TelemetryConfig::from_settings(&settings.logging)?;
    if matches!(cli.command, Command::Client(_)) {
        // Client commands print to the terminal; keep logs terse.
        telemetry.json = false;
        telemetry.log_level = telemetry.log_level.min(tracing::Level::WARN);
    }
    tasks_telemetry::init_telemetry(&telemetry)?;

    match cli.command {
        Command::Serve { host, port, db } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(db) = db {
                settings.database.path = db;
            }
            serve(&settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Client(command) => Ok(run_client(&settings, command).await),
    }
}

async fn serve(settings: &TaskSettings) -> anyhow::Result<()> {
    tracing::info!("Starting task server");

    let db = Database::open(&settings.database.path)
        .with_context(|| format!("opening {}", settings.database.path.display()))?;

    let config = tasks_server::ServerConfig::from(&settings.server);
    let handle = tasks_server::start(config, db)
        .await
        .context("starting server")?;

    tracing::info!(port = handle.port, "Task server ready");

    tokio::signal::ctrl_c()
        .await
        .context("listening for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.shutdown().await;
    Ok(())
}

async fn run_client(settings: &TaskSettings, command: ClientCommand) -> ExitCode {
    let client = TaskClient::new(settings.client.base_url.clone());
    let mut app = App::new();

    match command {
        ClientCommand::List { completed, desc } => {
            let filter = TaskFilter {
                is_completed: completed,
                sort: SortOrder::from_descending(desc),
            };
            app.load(&client, &filter).await;
        }
        ClientCommand::Show { id } => {
            return match client.get(id).await {
                Ok(task) => {
                    print!("{}", render_task(&task));
                    ExitCode::SUCCESS
                }
                Err(e) if e.is_not_found() => {
                    eprintln!("No task {id}.");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    tracing::warn!(error = %e, "show failed");
                    eprintln!("{}", Operation::Fetch.failure_message());
                    ExitCode::FAILURE
                }
            };
        }
        ClientCommand::Add {
            title,
            description,
            due,
            completed,
        } => {
            app.load(&client, &TaskFilter::default()).await;
            let input = TaskInput {
                description,
                due_date: due.map_or(DueDateInput::Unset, DueDateInput::At),
                is_completed: completed,
                ..TaskInput::new(title)
            };
            app.create(&client, input).await;
        }
        ClientCommand::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            completed,
        } => {
            app.load(&client, &TaskFilter::default()).await;
            if app.error().is_none() && !app.begin_edit(id) {
                eprintln!("No task {id}.");
                return ExitCode::FAILURE;
            }
            if let Some(draft) = app.edit_mut() {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = Some(description);
                }
                if clear_due {
                    draft.due_date = None;
                } else if let Some(due) = due {
                    draft.due_date = Some(due);
                }
                if let Some(completed) = completed {
                    draft.is_completed = completed;
                }
            }
            app.save_edit(&client, Local::now().naive_local()).await;
        }
        ClientCommand::Delete { id } => {
            app.load(&client, &TaskFilter::default()).await;
            app.delete(&client, id).await;
        }
    }

    print!("{}", render(&app));
    if app.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
