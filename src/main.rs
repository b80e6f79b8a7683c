use clap::Parser;
use savings_tracker::args::{Args, Command};
use savings_tracker::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without network access. When SAVINGS_OFFLINE is set
    // and non-empty, the fallback exchange rate is used instead of fetching one.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.clone()).await?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add_transaction(config, add_args.clone())
                .await?
                .print()
        }

        Command::Edit(edit_args) => {
            let config = Config::load(home).await?;
            commands::edit_transaction(config, edit_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            commands::delete_transaction(config, delete_args.clone())
                .await?
                .print()
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list_transactions(config, list_args.clone())
                .await?
                .print()
        }

        Command::Summary => commands::summary(Config::load(home).await?).await?.print(),

        Command::Chart(chart_args) => {
            let config = Config::load(home).await?;
            commands::chart(config, chart_args.clone()).await?.print()
        }

        Command::Progress(progress_args) => {
            let config = Config::load(home).await?;
            commands::progress(config, mode, progress_args.clone())
                .await?
                .print()
        }

        Command::Target(target_args) => {
            let config = Config::load(home).await?;
            commands::set_target(config, target_args.clone())
                .await?
                .print()
        }

        Command::View(view_args) => {
            let config = Config::load(home).await?;
            commands::set_view(config, view_args.clone()).await?.print()
        }

        Command::Rate(rate_args) => {
            let config = Config::load(home).await?;
            commands::rate(config, mode, rate_args.clone()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "savings_tracker={level},{}={level}",
                env!("CARGO_BIN_NAME")
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
