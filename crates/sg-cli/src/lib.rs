use std::ffi::OsString;

use clap::Parser;
use sg_core::GameError;

mod cli_args;
mod error_map;
mod game_runner;
mod validate;

pub(crate) use cli_args::{CheckConfigArgs, Cli, Mode, RunArgs, ValidateArgs};
pub(crate) use error_map::{emit_error, map_cli_dump, map_cli_games_scan, map_cli_reply_format};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, GameError> {
    match cli.command {
        Mode::Validate(args) => validate::run_validate(args),
        Mode::CheckConfig(args) => validate::run_check_config(args),
        Mode::Run(args) => game_runner::run_game(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        assert_eq!(run_cli_from_args(["sg-cli", "dance"]), 2);
    }

    #[test]
    fn validate_requires_a_source() {
        assert_eq!(run_cli_from_args(["sg-cli", "validate"]), 2);
    }

    #[test]
    fn validate_fixture_game_passes() {
        let game = sg_test_fixtures::game_path("counter");
        let code = run_cli_from_args([
            "sg-cli".into(),
            "validate".into(),
            "--game".into(),
            game.into_os_string(),
        ]);
        assert_eq!(code, 0);
    }
}
