use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sg-cli")]
#[command(about = "Social game rule engine CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Validate(ValidateArgs),
    CheckConfig(CheckConfigArgs),
    Run(RunArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["game", "games_dir"])))]
pub(crate) struct ValidateArgs {
    #[arg(long = "game")]
    pub(crate) game: Option<PathBuf>,
    #[arg(long = "games-dir")]
    pub(crate) games_dir: Option<PathBuf>,
    #[arg(long = "dump")]
    pub(crate) dump: bool,
}

#[derive(Debug, Args)]
pub(crate) struct CheckConfigArgs {
    #[arg(long = "config")]
    pub(crate) config: PathBuf,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "game")]
    pub(crate) game: PathBuf,
    #[arg(long = "players", default_value_t = 1)]
    pub(crate) players: u64,
    /// `<player>:<text>`, consumed in order for that player's input requests.
    #[arg(long = "reply")]
    pub(crate) replies: Vec<String>,
    #[arg(long = "step-limit")]
    pub(crate) step_limit: Option<usize>,
}
