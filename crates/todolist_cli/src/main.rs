//! `todolist` executable: runs the API server or acts as its client.
//!
//! # Responsibility
//! - `serve`: resolve configuration, start logging, serve the HTTP API.
//! - Client subcommands: load the list, apply one action, print the view.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use todolist_api::AppState;
use todolist_cli::{TodoClient, TodoView, DEFAULT_SERVER_URL};
use todolist_core::{core_version, flush_logging, init_logging, AppConfig, ConfigOverrides};
use tokio::net::TcpListener;

const CLIENT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "todolist", version, about = "Flat-file todo list server and client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Print all todos.
    List(ClientArgs),
    /// Add a todo.
    Add {
        #[command(flatten)]
        client: ClientArgs,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Edit a todo's title and/or description.
    Edit {
        #[command(flatten)]
        client: ClientArgs,
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip a todo's completion.
    Toggle {
        #[command(flatten)]
        client: ClientArgs,
        id: String,
    },
    /// Delete a todo.
    Delete {
        #[command(flatten)]
        client: ClientArgs,
        id: String,
    },
}

/// Overrides for `AppConfig`; unset flags fall back to the environment.
#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long)]
    data_file: Option<PathBuf>,
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ClientArgs {
    /// Server root URL.
    #[arg(long, env = "TODOLIST_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (client, action) = match cli.command {
        Command::Serve(args) => {
            let result = serve(args).await;
            flush_logging();
            return result;
        }
        Command::List(client) => (client, Action::List),
        Command::Add {
            client,
            title,
            description,
        } => (client, Action::Add { title, description }),
        Command::Edit {
            client,
            id,
            title,
            description,
        } => (
            client,
            Action::Edit {
                id,
                title,
                description,
            },
        ),
        Command::Toggle { client, id } => (client, Action::Toggle { id }),
        Command::Delete { client, id } => (client, Action::Delete { id }),
    };

    let result = run_client(client, action).await;
    flush_logging();
    result
}

async fn serve(args: ServeArgs) -> Result<()> {
    let config = AppConfig::from_env_with(ConfigOverrides {
        data_file: args.data_file,
        bind_addr: args.bind,
        log_level: args.log_level,
        log_dir: args.log_dir,
    })
    .context("invalid configuration")?;

    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;
    info!(
        "event=serve module=cli status=start version={} bind_addr={}",
        core_version(),
        config.bind_addr
    );

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    todolist_api::serve(
        listener,
        AppState::from_data_file(&config.data_file),
        shutdown_signal(),
    )
    .await
    .context("server terminated with an error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=cli status=error error={err}");
    }
}

async fn run_client(client_args: ClientArgs, action: Action) -> Result<()> {
    init_logging(CLIENT_LOG_LEVEL, None).map_err(anyhow::Error::msg)?;

    let client = TodoClient::new(client_args.server);
    let mut view = TodoView::new();
    if !view.load(&client).await {
        bail!("could not load todos from {}", client.base_url());
    }

    let applied = match action {
        Action::List => true,
        Action::Add { title, description } => {
            view.draft_title = title;
            view.draft_description = description;
            view.add(&client).await
        }
        Action::Edit {
            id,
            title,
            description,
        } => {
            if !view.start_editing(&id) {
                bail!("no todo with id {id}");
            }
            if let Some(draft) = view.editing_mut() {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
            }
            view.save_edit(&client).await
        }
        Action::Toggle { id } => view.toggle(&client, &id).await,
        Action::Delete { id } => view.delete(&client, &id).await,
    };

    print!("{}", view.render());
    if !applied {
        bail!("action was not applied");
    }
    Ok(())
}

enum Action {
    List,
    Add { title: String, description: String },
    Edit {
        id: String,
        title: Option<String>,
        description: Option<String>,
    },
    Toggle { id: String },
    Delete { id: String },
}
