use super::frame_stack::{lookup_block, rule_location};
use super::*;

impl GameSession {
    /// Runs rules until one produces output: a broadcast, an input request
    /// for a single player, or the end of the run.
    pub fn next_output(&mut self) -> Result<SessionOutput, GameError> {
        if let Some(pending) = &self.pending_input {
            return Ok(SessionOutput::InputRequest {
                player: pending.player,
                prompt: pending.prompt.clone(),
            });
        }

        let descriptor = Arc::clone(&self.descriptor);
        loop {
            let Some(top_frame) = self.frames.last() else {
                return Ok(SessionOutput::End);
            };
            let block_path = top_frame.block.clone();
            let node_index = top_frame.node_index;

            self.steps += 1;
            if self.steps > self.step_limit {
                let error = GameError::new(
                    ErrorKind::RuleExecution,
                    "ENGINE_GUARD_EXCEEDED",
                    format!("Execution exceeded {} steps.", self.step_limit),
                );
                return Err(self.fail(error, &rule_location(&block_path, node_index)));
            }

            let block = match lookup_block(&descriptor.rules, &block_path) {
                Ok(block) => block,
                Err(error) => return Err(self.fail(error, &block_location(&block_path))),
            };

            if node_index >= block.len() {
                if let Err(error) = self.finish_frame() {
                    return Err(self.fail(error, &block_location(&block_path)));
                }
                continue;
            }

            let node = &block[node_index];
            let location = rule_location(&block_path, node_index);
            debug!(rule = node.kind_name(), %location, "executing rule");
            match self.execute_rule(node, &block_path, node_index) {
                Ok(Some(output)) => return Ok(output),
                Ok(None) => {}
                Err(error) => return Err(self.fail(error, &location)),
            }
        }
    }

    fn execute_rule(
        &mut self,
        node: &RuleNode,
        block_path: &[usize],
        node_index: usize,
    ) -> Result<Option<SessionOutput>, GameError> {
        match node {
            RuleNode::Add { to, value } => {
                let current = self.store.get(to)?;
                let next = current.checked_add(*value).ok_or_else(|| {
                    GameError::new(
                        ErrorKind::RuleExecution,
                        "RULE_ADD_OVERFLOW",
                        format!("Adding {} to \"{}\" ({}) overflows.", value, to, current),
                    )
                })?;
                self.store.set(to, next)?;
                self.bump_top_node_index()?;
                Ok(None)
            }
            RuleNode::GlobalMessage { value } => {
                self.bump_top_node_index()?;
                Ok(Some(SessionOutput::Broadcast {
                    text: value.clone(),
                }))
            }
            RuleNode::ForEach { list, element, .. } => {
                if list != PLAYERS_SEGMENT {
                    return Err(GameError::new(
                        ErrorKind::RuleExecution,
                        "RULE_LIST_UNSUPPORTED",
                        format!("Cannot iterate over \"{}\".", list),
                    ));
                }
                self.bump_top_node_index()?;

                let mut remaining = VecDeque::from(self.store.player_ids());
                let Some(first) = remaining.pop_front() else {
                    return Ok(None);
                };
                self.store.bind_scope(element, first)?;
                self.push_frame(
                    child_block(block_path, node_index),
                    FrameKind::ForEachBody {
                        element: element.clone(),
                        remaining,
                    },
                );
                Ok(None)
            }
            RuleNode::Loop { until, .. } => {
                if self.evaluator.evaluate(until, &self.store)? {
                    self.bump_top_node_index()?;
                } else {
                    self.push_frame(child_block(block_path, node_index), FrameKind::LoopBody);
                }
                Ok(None)
            }
            RuleNode::InputText { to, prompt, result } => {
                let player = resolve_player(to, self.store.scope())?;
                if !self.store.has_player(player) {
                    return Err(GameError::new(
                        ErrorKind::PlayerNotFound,
                        "RULE_INPUT_PLAYER_UNKNOWN",
                        format!("Cannot request input from unknown player {}.", player),
                    ));
                }
                self.store.get(result)?;

                let frame_id = self.top_frame_id()?;
                self.pending_input = Some(PendingInput {
                    frame_id,
                    player,
                    prompt: prompt.clone(),
                    result: result.clone(),
                    location: rule_location(block_path, node_index),
                });
                debug!(player, "waiting for player input");
                Ok(Some(SessionOutput::InputRequest {
                    player,
                    prompt: prompt.clone(),
                }))
            }
        }
    }
}

fn child_block(block_path: &[usize], node_index: usize) -> Vec<usize> {
    let mut child = block_path.to_vec();
    child.push(node_index);
    child
}

fn block_location(block_path: &[usize]) -> String {
    match block_path.split_last() {
        Some((last, parent)) => rule_location(parent, *last),
        None => "rules".to_string(),
    }
}
