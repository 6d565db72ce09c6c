use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use todolist::config::{self, Backend, Config};
use todolist::notify::TerminalSink;
use todolist::sync::{LocalGateway, RestGateway, SyncGateway};
use todolist::{StatusFilter, TaskListController};

#[derive(Parser, Debug)]
#[command(name = "todolist", version, about = "Keep a task list in sync with a task API")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// remote or local
    #[arg(long, global = true)]
    backend: Option<Backend>,

    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Only show tasks with this status: Created, Completed or Cancelled
    #[arg(long, short, global = true, default_value = "")]
    filter: StatusFilter,

    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the task list
    List,
    /// Add a task
    Add { text: Vec<String> },
    /// Mark a task done, or reopen it
    Toggle { number: usize },
    /// Cancel a task
    Cancel { number: usize },
    /// Delete a task
    Delete {
        number: usize,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Change a task's text
    Edit { number: usize, text: Vec<String> },
    /// Show only the counts
    Summary,
}

/// Command-line numbers start at 1.
fn position(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "task numbers start at 1".to_string())
}

fn build_gateway(config: &Config) -> Result<Arc<dyn SyncGateway>, todolist::Error> {
    match config.backend {
        Backend::Remote => Ok(Arc::new(RestGateway::new(config.rest_config())?)),
        Backend::Local => {
            config.ensure_dirs()?;
            let store = config.file_store();
            Ok(Arc::new(LocalGateway::open(store)))
        }
    }
}

async fn print_list(controller: &TaskListController) {
    let tasks = controller.tasks().await;
    if tasks.is_empty() {
        println!("No tasks yet...");
    }
    for (i, task) in tasks.iter().enumerate() {
        let mark = match task.status {
            todolist::TaskStatus::Created => "[ ]",
            todolist::TaskStatus::Completed => "[x]",
            todolist::TaskStatus::Cancelled => "[-]",
        };
        println!("{:>3}. {} {}", i + 1, mark, task.task);
    }
    println!();
    println!("{}", controller.summary().await);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = Config::load(&config_path);
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    config.debug_logging |= cli.debug;

    todolist::logging::init(config.debug_logging)?;
    log::debug!("Using config {} ({:?} backend)", config_path.display(), config.backend);

    let assume_yes = matches!(cli.command, Some(Command::Delete { yes: true, .. }));
    let controller = TaskListController::new(
        build_gateway(&config)?,
        Arc::new(TerminalSink { assume_yes }),
    )
    .with_options(config.controller_options());

    // The load reports its own failure; actions below still show what they can
    let _ = controller.load(cli.filter).await;

    let outcome = match cli.command.unwrap_or(Command::List) {
        Command::List => Ok(()),
        Command::Summary => {
            println!("{}", controller.summary().await);
            return Ok(());
        }
        Command::Add { text } => controller.add_task(text.join(" ")).await.map(|_| ()),
        Command::Toggle { number } => {
            let index = position(number)?;
            controller.toggle_task(index).await.map(|_| ())
        }
        Command::Cancel { number } => {
            let index = position(number)?;
            controller.cancel_task(index).await.map(|_| ())
        }
        Command::Delete { number, .. } => {
            let index = position(number)?;
            controller.delete_with_confirmation(index).await.map(|_| ())
        }
        Command::Edit { number, text } => {
            let index = position(number)?;
            match controller.start_edit(index).await {
                Ok(()) => {
                    controller.update_draft(text.join(" ")).await;
                    controller.save_edit(index).await.map(|_| ())
                }
                Err(e) => Err(e),
            }
        }
    };

    print_list(&controller).await;

    // Failures were already shown through the sink
    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
