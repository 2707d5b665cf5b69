use std::path::PathBuf;
use std::process::ExitCode;

use boost_core::{AppError, Config, ConfigError};
use boost_dashboard::{render, Dashboard};
use clap::{Parser, Subcommand};

/// Daily Boost - to-do list, city weather, and a daily quote
#[derive(Parser, Debug)]
#[command(name = "daily-boost", version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the whole dashboard (default)
    Show,
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a task as done
    Done { id: String },
    /// Mark a task as not done
    Undone { id: String },
    /// Delete a task
    Delete { id: String },
    /// Remove all completed tasks
    ClearCompleted,
    /// Look up weather for a city (defaults to the last city)
    Weather { city: Vec<String> },
    /// Fetch a new quote
    Quote,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = boost_core::init() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            eprintln!("  ({})", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let (config, _) = Config::load_validated(cli.config.as_deref()).map_err(|e| {
        match e.downcast::<ConfigError>() {
            Ok(config_err) => AppError::Config(config_err),
            Err(other) => AppError::Other(other),
        }
    })?;

    let mut dashboard = Dashboard::open(&config)?;
    tracing::debug!("Dashboard opened with data dir {}", config.data_dir.display());

    let output = match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            dashboard.startup().await;
            dashboard.render()
        }
        Command::Add { text } => {
            if dashboard.add_task(&text.join(" ")).is_none() {
                tracing::debug!("Ignored blank task");
            }
            render::tasks(&dashboard.tasks().view())
        }
        Command::Done { id } => {
            dashboard.toggle_task(&id, true);
            render::tasks(&dashboard.tasks().view())
        }
        Command::Undone { id } => {
            dashboard.toggle_task(&id, false);
            render::tasks(&dashboard.tasks().view())
        }
        Command::Delete { id } => {
            dashboard.delete_task(&id);
            render::tasks(&dashboard.tasks().view())
        }
        Command::ClearCompleted => {
            dashboard.clear_completed();
            render::tasks(&dashboard.tasks().view())
        }
        Command::Weather { city } => {
            let city = if city.is_empty() {
                dashboard.saved_city().unwrap_or_default().to_string()
            } else {
                city.join(" ")
            };
            dashboard.fetch_weather(&city).await;
            render::weather(dashboard.weather())
        }
        Command::Quote => {
            dashboard.fetch_quote().await;
            render::quote(dashboard.quote())
        }
    };

    Ok(output)
}
