mod engine;

pub use engine::{Simulator, split_tokens};
