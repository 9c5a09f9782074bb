mod condition;
mod resolver;
mod session;
mod store;

pub use condition::{ConditionEvaluator, RhaiConditionEvaluator};
pub use resolver::{resolve_path, resolve_player, Location};
pub use session::{GameSession, PendingInput, SessionOptions, DEFAULT_STEP_LIMIT};
pub use store::{ActiveScope, VariableStore};
