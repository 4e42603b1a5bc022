pub mod config;
pub mod general;

pub use general::{parse_timestamp, STATUS_AVAILABLE, STATUS_ISSUED};
