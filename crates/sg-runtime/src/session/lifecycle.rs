use super::*;

impl GameSession {
    pub fn new(
        descriptor: Arc<GameDescriptor>,
        players: &[PlayerId],
        options: SessionOptions,
    ) -> Result<Self, GameError> {
        let store = VariableStore::from_descriptor(&descriptor, players)?;
        let evaluator = options
            .condition_evaluator
            .unwrap_or_else(|| Arc::new(RhaiConditionEvaluator));
        info!(players = players.len(), "session created");
        Ok(Self {
            descriptor,
            store,
            evaluator,
            step_limit: options.step_limit.unwrap_or(DEFAULT_STEP_LIMIT),
            steps: 0,
            frames: Vec::new(),
            frame_counter: 1,
            pending_input: None,
        })
    }

    /// Begins a run of the top-level rule sequence against the current store.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.pending_input.is_some() {
            return Err(GameError::new(
                ErrorKind::Session,
                "SESSION_INPUT_PENDING",
                "Cannot start while a player input is pending.",
            ));
        }
        if self.is_running() {
            return Err(GameError::new(
                ErrorKind::Session,
                "SESSION_ALREADY_RUNNING",
                "An execution is already in progress.",
            ));
        }

        self.steps = 0;
        self.push_frame(Vec::new(), FrameKind::Root);
        info!(rules = self.descriptor.rules.len(), "execution started");
        Ok(())
    }

    /// Abandons the current run. Variables keep whatever was already written.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        if was_running {
            info!("execution cancelled");
        }
        self.unwind();
        was_running
    }

    pub fn is_running(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn add_player(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.store.add_player(player)?;
        info!(player, "player joined session");
        Ok(())
    }

    /// Drops a player's variables, cancelling any run in progress first.
    /// Returns whether a run was cancelled.
    pub fn remove_player(&mut self, player: PlayerId) -> Result<bool, GameError> {
        if !self.store.has_player(player) {
            return self.store.remove_player(player).map(|_| false);
        }
        let cancelled = self.cancel();
        self.store.remove_player(player)?;
        info!(player, cancelled, "player left session");
        Ok(cancelled)
    }

    pub fn descriptor(&self) -> &Arc<GameDescriptor> {
        &self.descriptor
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }

    pub fn pending_input(&self) -> Option<&PendingInput> {
        self.pending_input.as_ref()
    }

    pub(super) fn unwind(&mut self) {
        self.frames.clear();
        self.pending_input = None;
        self.store.clear_scope();
    }

    pub(super) fn fail(&mut self, error: GameError, location: &str) -> GameError {
        warn!(code = %error.code, %location, "rule failed: {}", error.message);
        self.unwind();
        error.in_context(format!("rule {}", location))
    }
}
