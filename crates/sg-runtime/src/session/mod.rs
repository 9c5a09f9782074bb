use std::collections::VecDeque;
use std::sync::Arc;

use sg_core::{
    ErrorKind, GameDescriptor, GameError, PlayerId, RuleNode, SessionOutput, VariablePath,
    PLAYERS_SEGMENT,
};
use tracing::{debug, info, warn};

use crate::condition::{ConditionEvaluator, RhaiConditionEvaluator};
use crate::resolver::resolve_player;
use crate::store::VariableStore;

mod boundary;
mod frame_stack;
mod lifecycle;
mod step;

pub const DEFAULT_STEP_LIMIT: usize = 10_000;

#[derive(Clone, Default)]
pub struct SessionOptions {
    pub condition_evaluator: Option<Arc<dyn ConditionEvaluator>>,
    pub step_limit: Option<usize>,
}

#[derive(Debug, Clone)]
enum FrameKind {
    Root,
    ForEachBody {
        element: String,
        remaining: VecDeque<PlayerId>,
    },
    LoopBody,
}

#[derive(Debug, Clone)]
struct RuntimeFrame {
    frame_id: u64,
    block: Vec<usize>,
    node_index: usize,
    kind: FrameKind,
}

/// The Request-Input rule an execution is suspended on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub frame_id: u64,
    pub player: PlayerId,
    pub prompt: String,
    pub result: VariablePath,
    pub location: String,
}

pub struct GameSession {
    descriptor: Arc<GameDescriptor>,
    store: VariableStore,
    evaluator: Arc<dyn ConditionEvaluator>,
    step_limit: usize,
    steps: usize,
    frames: Vec<RuntimeFrame>,
    frame_counter: u64,
    pending_input: Option<PendingInput>,
}
