use crate::demo::{run_demo, run_leaderboard_report, DemoArgs, LeaderboardReportArgs};
use crate::server;
use battleboard::config::AppConfig;
use battleboard::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Battle of Platoons Scoreboard",
    about = "Serve and inspect the Battle of Platoons leaderboards from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute and print a leaderboard
    Leaderboard {
        #[command(subcommand)]
        command: LeaderboardCommand,
    },
    /// Rank the bundled demo data across all three battles
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LeaderboardCommand {
    /// Rank a battle over a date range and print the standings
    Report(LeaderboardReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Hydrate the in-memory stores from a joined CSV export
    #[arg(long)]
    pub(crate) records_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leaderboard {
            command: LeaderboardCommand::Report(args),
        } => {
            let config = AppConfig::load()?;
            run_leaderboard_report(args, config.battle.default_battle)
        }
        Command::Demo(args) => run_demo(args),
    }
}
