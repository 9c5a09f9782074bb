use std::collections::BTreeMap;

use sg_core::{
    ErrorKind, GameDescriptor, GameError, PlayerId, VariableMap, VariablePath, VariableValue,
};

use crate::resolver::{resolve_path, Location};

/// Transient alias to player bindings created while a For-Each iterates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveScope {
    bindings: BTreeMap<String, PlayerId>,
}

impl ActiveScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<PlayerId> {
        self.bindings.get(name).copied()
    }

    pub fn bind(&mut self, name: &str, player: PlayerId) -> Result<(), GameError> {
        if let Some(existing) = self.bindings.get(name) {
            return Err(GameError::new(
                ErrorKind::ScopeConflict,
                "SCOPE_ALREADY_BOUND",
                format!(
                    "Scope name \"{}\" is already bound to player {}.",
                    name, existing
                ),
            ));
        }
        self.bindings.insert(name.to_string(), player);
        Ok(())
    }

    pub fn unbind(&mut self, name: &str) -> Result<PlayerId, GameError> {
        self.bindings.remove(name).ok_or_else(|| {
            GameError::new(
                ErrorKind::ScopeConflict,
                "SCOPE_NOT_BOUND",
                format!("Scope name \"{}\" is not bound.", name),
            )
        })
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PlayerId)> {
        self.bindings
            .iter()
            .map(|(name, player)| (name.as_str(), *player))
    }
}

/// Owns every variable of one session: the global map, one map per player
/// and the active scope used to resolve `$name` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStore {
    globals: VariableMap,
    player_template: VariableMap,
    players: BTreeMap<PlayerId, VariableMap>,
    scope: ActiveScope,
}

impl VariableStore {
    pub fn new(
        globals: VariableMap,
        player_template: VariableMap,
        player_ids: &[PlayerId],
    ) -> Result<Self, GameError> {
        let mut store = Self {
            globals,
            player_template,
            players: BTreeMap::new(),
            scope: ActiveScope::new(),
        };
        for player in player_ids {
            store.add_player(*player)?;
        }
        Ok(store)
    }

    pub fn from_descriptor(
        descriptor: &GameDescriptor,
        player_ids: &[PlayerId],
    ) -> Result<Self, GameError> {
        Self::new(
            descriptor.variables.clone(),
            descriptor.per_player.clone(),
            player_ids,
        )
    }

    pub fn resolve(&self, path: &VariablePath) -> Result<Location, GameError> {
        resolve_path(path, &self.scope)
    }

    pub fn get(&self, path: &VariablePath) -> Result<VariableValue, GameError> {
        let location = self.resolve(path)?;
        self.slot(&location, path).copied()
    }

    pub fn set(&mut self, path: &VariablePath, value: VariableValue) -> Result<(), GameError> {
        let location = self.resolve(path)?;
        let slot = self.slot_mut(&location, path)?;
        *slot = value;
        Ok(())
    }

    pub fn get_raw(&self, raw: &str) -> Result<VariableValue, GameError> {
        self.get(&VariablePath::parse(raw)?)
    }

    pub fn set_raw(&mut self, raw: &str, value: VariableValue) -> Result<(), GameError> {
        self.set(&VariablePath::parse(raw)?, value)
    }

    pub fn bind_scope(&mut self, name: &str, player: PlayerId) -> Result<(), GameError> {
        self.scope.bind(name, player)
    }

    pub fn unbind_scope(&mut self, name: &str) -> Result<PlayerId, GameError> {
        self.scope.unbind(name)
    }

    pub fn clear_scope(&mut self) {
        self.scope.clear();
    }

    pub fn scope(&self) -> &ActiveScope {
        &self.scope
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains_key(&player)
    }

    pub fn add_player(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.players.contains_key(&player) {
            return Err(GameError::new(
                ErrorKind::Session,
                "STORE_PLAYER_DUPLICATE",
                format!("Player {} already has a variable map.", player),
            ));
        }
        self.players.insert(player, self.player_template.clone());
        Ok(())
    }

    pub fn remove_player(&mut self, player: PlayerId) -> Result<VariableMap, GameError> {
        self.players
            .remove(&player)
            .ok_or_else(|| player_not_found(player))
    }

    pub fn globals(&self) -> &VariableMap {
        &self.globals
    }

    pub fn global_snapshot(&self) -> VariableMap {
        self.globals.clone()
    }

    pub fn player_snapshot(&self, player: PlayerId) -> Result<VariableMap, GameError> {
        self.players
            .get(&player)
            .cloned()
            .ok_or_else(|| player_not_found(player))
    }

    fn slot(&self, location: &Location, path: &VariablePath) -> Result<&VariableValue, GameError> {
        match location {
            Location::Global(key) => self
                .globals
                .get(key)
                .ok_or_else(|| global_not_found(key, path)),
            Location::Player { player, key } => self
                .players
                .get(player)
                .ok_or_else(|| player_not_found(*player))?
                .get(key)
                .ok_or_else(|| player_var_not_found(*player, key, path)),
        }
    }

    fn slot_mut(
        &mut self,
        location: &Location,
        path: &VariablePath,
    ) -> Result<&mut VariableValue, GameError> {
        match location {
            Location::Global(key) => self
                .globals
                .get_mut(key)
                .ok_or_else(|| global_not_found(key, path)),
            Location::Player { player, key } => self
                .players
                .get_mut(player)
                .ok_or_else(|| player_not_found(*player))?
                .get_mut(key)
                .ok_or_else(|| player_var_not_found(*player, key, path)),
        }
    }
}

fn global_not_found(key: &str, path: &VariablePath) -> GameError {
    GameError::new(
        ErrorKind::VariableNotFound,
        "STORE_VAR_NOT_FOUND",
        format!("Variable \"{}\" is not defined (path \"{}\").", key, path),
    )
}

fn player_not_found(player: PlayerId) -> GameError {
    GameError::new(
        ErrorKind::PlayerNotFound,
        "STORE_PLAYER_NOT_FOUND",
        format!("Player {} is not part of this session.", player),
    )
}

fn player_var_not_found(player: PlayerId, key: &str, path: &VariablePath) -> GameError {
    GameError::new(
        ErrorKind::VariableNotFound,
        "STORE_PLAYER_VAR_NOT_FOUND",
        format!(
            "Player {} has no variable \"{}\" (path \"{}\").",
            player, key, path
        ),
    )
}
