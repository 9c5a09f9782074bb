use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use sg_core::{PlayerId, VariableValue};
use walkdir::WalkDir;

pub const GAME_FILE: &str = "game.json";
pub const TESTCASE_FILE: &str = "testcase.json";

/// Expected run of a fixture game: who plays, what each player answers to
/// input requests, and what the variables look like afterwards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Testcase {
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub replies: BTreeMap<PlayerId, Vec<String>>,
    #[serde(default)]
    pub expect_broadcasts: Vec<String>,
    #[serde(default)]
    pub expect_globals: BTreeMap<String, VariableValue>,
    #[serde(default)]
    pub expect_players: BTreeMap<PlayerId, BTreeMap<String, VariableValue>>,
    #[serde(default)]
    pub expect_error_code: Option<String>,
}

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn games_root() -> PathBuf {
    workspace_root().join("games")
}

pub fn config_root() -> PathBuf {
    workspace_root().join("config")
}

pub fn game_dir(name: &str) -> PathBuf {
    games_root().join(name)
}

pub fn game_path(name: &str) -> PathBuf {
    game_dir(name).join(GAME_FILE)
}

pub fn testcase_path(name: &str) -> PathBuf {
    game_dir(name).join(TESTCASE_FILE)
}

/// Names of every fixture directory that holds a game document, sorted.
pub fn game_names() -> Vec<String> {
    let mut names = WalkDir::new(games_root())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir() && entry.path().join(GAME_FILE).is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

pub fn load_testcase(name: &str) -> Testcase {
    let path = testcase_path(name);
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("failed to read {}: {}", path.display(), error));
    serde_json::from_str(&source)
        .unwrap_or_else(|error| panic!("invalid testcase {}: {}", path.display(), error))
}
