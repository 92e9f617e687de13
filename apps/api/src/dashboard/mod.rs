pub mod handlers;
pub mod stats;
