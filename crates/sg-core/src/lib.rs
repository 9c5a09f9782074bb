pub mod error;
pub mod path;
pub mod types;
pub mod value;

pub use error::{ErrorKind, GameError};
pub use path::*;
pub use types::*;
pub use value::*;
