use sg_core::{ErrorKind, GameError, PathSegment, PlayerId, VariablePath, PLAYERS_SEGMENT};

use crate::store::ActiveScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Global(String),
    Player { player: PlayerId, key: String },
}

pub fn resolve_path(path: &VariablePath, scope: &ActiveScope) -> Result<Location, GameError> {
    if !path.is_player_path() {
        return Ok(Location::Global(path.to_string()));
    }

    let resolved = substitute(path, scope)?;
    if resolved.len() < 3 || resolved[0] != PLAYERS_SEGMENT {
        return Err(GameError::new(
            ErrorKind::PathResolution,
            "PATH_PLAYER_SHAPE",
            format!(
                "Path \"{}\" must have the shape players.<id>.<variable>.",
                path
            ),
        ));
    }

    let player = parse_player_id(&resolved[1], path)?;
    Ok(Location::Player {
        player,
        key: resolved[2..].join("."),
    })
}

/// Resolves `players.<id>` or `players.$name` to the addressed player.
pub fn resolve_player(path: &VariablePath, scope: &ActiveScope) -> Result<PlayerId, GameError> {
    let resolved = substitute(path, scope)?;
    if resolved.len() != 2 || resolved[0] != PLAYERS_SEGMENT {
        return Err(GameError::new(
            ErrorKind::PathResolution,
            "PATH_NOT_PLAYER",
            format!("Path \"{}\" does not name a player.", path),
        ));
    }
    parse_player_id(&resolved[1], path)
}

fn substitute(path: &VariablePath, scope: &ActiveScope) -> Result<Vec<String>, GameError> {
    path.segments()
        .iter()
        .map(|segment| match segment {
            PathSegment::Literal(name) => Ok(name.clone()),
            PathSegment::Placeholder(name) => scope
                .get(name)
                .map(|player| player.to_string())
                .ok_or_else(|| {
                    GameError::new(
                        ErrorKind::PathResolution,
                        "PATH_PLACEHOLDER_UNBOUND",
                        format!(
                            "Placeholder \"${}\" in path \"{}\" is not bound.",
                            name, path
                        ),
                    )
                }),
        })
        .collect()
}

fn parse_player_id(raw: &str, path: &VariablePath) -> Result<PlayerId, GameError> {
    raw.parse::<PlayerId>().map_err(|_| {
        GameError::new(
            ErrorKind::PathResolution,
            "PATH_PLAYER_ID",
            format!("\"{}\" in path \"{}\" is not a player id.", raw, path),
        )
    })
}

#[cfg(test)]
mod resolver_tests {
    use super::*;
    use crate::runtime_test_support::path;

    fn scope(bindings: &[(&str, PlayerId)]) -> ActiveScope {
        let mut scope = ActiveScope::new();
        for (name, player) in bindings {
            scope.bind(name, *player).expect("bind");
        }
        scope
    }

    #[test]
    fn paths_without_players_segment_are_global_literals() {
        let empty = ActiveScope::new();
        assert_eq!(
            resolve_path(&path("debug_target"), &empty).expect("global"),
            Location::Global("debug_target".to_string())
        );
        assert_eq!(
            resolve_path(&path("config.$x"), &empty).expect("dotted global"),
            Location::Global("config.$x".to_string())
        );
    }

    #[test]
    fn placeholders_substitute_before_splitting() {
        let bound = scope(&[("p", 42)]);
        assert_eq!(
            resolve_path(&path("players.$p.input"), &bound).expect("placeholder"),
            Location::Player {
                player: 42,
                key: "input".to_string()
            }
        );
        assert_eq!(
            resolve_path(&path("players.7.stats.wins"), &bound).expect("literal id"),
            Location::Player {
                player: 7,
                key: "stats.wins".to_string()
            }
        );
    }

    #[test]
    fn unbound_placeholder_and_bad_shapes_fail() {
        let bound = scope(&[("p", 1)]);
        let error = resolve_path(&path("players.$q.input"), &bound).expect_err("unbound");
        assert_eq!(error.code, "PATH_PLACEHOLDER_UNBOUND");

        let error = resolve_path(&path("players.$p"), &bound).expect_err("no leaf");
        assert_eq!(error.code, "PATH_PLAYER_SHAPE");

        let error = resolve_path(&path("team.players.1.x"), &bound).expect_err("players later");
        assert_eq!(error.code, "PATH_PLAYER_SHAPE");

        let error = resolve_path(&path("players.bob.input"), &bound).expect_err("bad id");
        assert_eq!(error.code, "PATH_PLAYER_ID");
        assert_eq!(error.kind, ErrorKind::PathResolution);
    }

    #[test]
    fn multiple_placeholders_resolve_independently() {
        let bound = scope(&[("a", 3), ("b", 9)]);
        assert_eq!(
            resolve_path(&path("players.$a.vs.$b"), &bound).expect("two placeholders"),
            Location::Player {
                player: 3,
                key: "vs.9".to_string()
            }
        );
    }

    #[test]
    fn resolve_player_accepts_only_two_segments() {
        let bound = scope(&[("p", 5)]);
        assert_eq!(resolve_player(&path("players.$p"), &bound).expect("bound"), 5);
        assert_eq!(resolve_player(&path("players.12"), &bound).expect("literal"), 12);
        let error = resolve_player(&path("players.$p.input"), &bound).expect_err("too long");
        assert_eq!(error.code, "PATH_NOT_PLAYER");
    }
}
