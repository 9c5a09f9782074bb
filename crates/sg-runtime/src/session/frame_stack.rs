use super::*;

impl GameSession {
    pub(super) fn push_frame(&mut self, block: Vec<usize>, kind: FrameKind) {
        let frame_id = self.frame_counter;
        self.frame_counter += 1;
        self.frames.push(RuntimeFrame {
            frame_id,
            block,
            node_index: 0,
            kind,
        });
    }

    pub(super) fn top_frame_id(&self) -> Result<u64, GameError> {
        self.frames
            .last()
            .map(|frame| frame.frame_id)
            .ok_or_else(no_frame)
    }

    pub(super) fn bump_top_node_index(&mut self) -> Result<(), GameError> {
        let frame = self.frames.last_mut().ok_or_else(no_frame)?;
        frame.node_index += 1;
        Ok(())
    }

    pub(super) fn find_frame_index(&self, frame_id: u64) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| frame.frame_id == frame_id)
    }

    /// Completes the top frame: For-Each bodies advance to the next player,
    /// Loop bodies hand control back to the loop rule for re-evaluation.
    pub(super) fn finish_frame(&mut self) -> Result<(), GameError> {
        let frame = self.frames.last_mut().ok_or_else(no_frame)?;
        let exhausted = match &mut frame.kind {
            FrameKind::Root | FrameKind::LoopBody => true,
            FrameKind::ForEachBody { element, remaining } => {
                self.store.unbind_scope(element)?;
                match remaining.pop_front() {
                    Some(next) => {
                        self.store.bind_scope(element, next)?;
                        frame.node_index = 0;
                        false
                    }
                    None => true,
                }
            }
        };

        if exhausted {
            if let Some(RuntimeFrame {
                kind: FrameKind::Root,
                ..
            }) = self.frames.pop()
            {
                info!("execution finished");
            }
        }
        Ok(())
    }
}

pub(super) fn lookup_block<'a>(
    rules: &'a [RuleNode],
    block: &[usize],
) -> Result<&'a [RuleNode], GameError> {
    let mut current = rules;
    for index in block {
        current = current
            .get(*index)
            .and_then(RuleNode::body)
            .ok_or_else(|| {
                GameError::new(
                    ErrorKind::RuleExecution,
                    "ENGINE_BLOCK_NOT_FOUND",
                    format!("Rule block {:?} does not exist.", block),
                )
            })?;
    }
    Ok(current)
}

pub(super) fn rule_location(block: &[usize], node_index: usize) -> String {
    block
        .iter()
        .chain(std::iter::once(&node_index))
        .map(|index| format!("rules[{}]", index))
        .collect::<Vec<_>>()
        .join(".")
}

fn no_frame() -> GameError {
    GameError::new(
        ErrorKind::RuleExecution,
        "ENGINE_NO_FRAME",
        "No runtime frame available.",
    )
}
