use std::path::{Path, PathBuf};

use sg_api::{load_game_from_file, load_server_config_from_file};
use sg_core::{ErrorKind, GameDescriptor, GameError};
use walkdir::WalkDir;

use crate::{map_cli_dump, map_cli_games_scan, CheckConfigArgs, ValidateArgs};

const GAME_FILE_NAME: &str = "game.json";

pub(crate) fn run_validate(args: ValidateArgs) -> Result<i32, GameError> {
    match (args.game, args.games_dir) {
        (Some(game), _) => validate_one(&game, args.dump),
        (None, Some(dir)) => validate_dir(&dir),
        (None, None) => Err(GameError::new(
            ErrorKind::Io,
            "CLI_SOURCE_MISSING",
            "Either --game or --games-dir is required.",
        )),
    }
}

fn validate_one(path: &Path, dump: bool) -> Result<i32, GameError> {
    let descriptor = load_game_from_file(path)?;
    println!("RESULT:OK");
    emit_summary(path, &descriptor);
    if dump {
        println!(
            "DESCRIPTOR_JSON:{}",
            serde_json::to_string(&descriptor).map_err(map_cli_dump)?
        );
    }
    Ok(0)
}

fn validate_dir(dir: &Path) -> Result<i32, GameError> {
    let mut games = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(map_cli_games_scan)?;
        if entry.file_type().is_file() && entry.file_name() == GAME_FILE_NAME {
            games.push(entry.into_path());
        }
    }

    let results = games
        .into_iter()
        .map(|path| {
            let outcome = load_game_from_file(&path);
            (path, outcome)
        })
        .collect::<Vec<(PathBuf, Result<GameDescriptor, GameError>)>>();
    let failed = results.iter().filter(|(_, outcome)| outcome.is_err()).count();

    println!("{}", if failed == 0 { "RESULT:OK" } else { "RESULT:ERROR" });
    println!("GAMES:{}", results.len());
    for (path, outcome) in &results {
        match outcome {
            Ok(_) => println!("GAME_OK:{}", path.display()),
            Err(error) => println!("GAME_ERROR:{}|{}", path.display(), error.code),
        }
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

fn emit_summary(path: &Path, descriptor: &GameDescriptor) {
    println!("GAME:{}", path.display());
    println!("VARIABLES:{}", descriptor.variables.len());
    println!("PER_PLAYER:{}", descriptor.per_player.len());
    println!("RULES:{}", descriptor.rule_count());
}

pub(crate) fn run_check_config(args: CheckConfigArgs) -> Result<i32, GameError> {
    let config = load_server_config_from_file(&args.config)?;
    println!("RESULT:OK");
    println!("PORT:{}", config.port);
    println!(
        "SERVER_HTML_JSON:{}",
        serde_json::to_string(&config.server_html.display().to_string()).expect("string json")
    );
    Ok(0)
}

#[cfg(test)]
mod validate_tests {
    use super::*;
    use sg_test_fixtures::{config_root, games_root};

    #[test]
    fn validate_dir_accepts_every_fixture_game() {
        assert_eq!(validate_dir(&games_root()).expect("scan"), 0);
    }

    #[test]
    fn validate_one_surfaces_compile_errors() {
        let path = games_root().join("rejected").join("empty-variables.json");
        let error = validate_one(&path, false).expect_err("empty variables");
        assert_eq!(error.code, "GAME_VARIABLES_EMPTY");
    }

    #[test]
    fn check_config_reads_fixture() {
        let code = run_check_config(CheckConfigArgs {
            config: config_root().join("serverconfig.json"),
        })
        .expect("config should load");
        assert_eq!(code, 0);
    }
}
