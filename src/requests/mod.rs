mod generator;
mod models;
mod trace;

pub use generator::generate;
pub use models::Request;
pub use trace::{count_unique_hash_ids, read_trace};
