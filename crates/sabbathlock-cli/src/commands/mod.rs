pub mod auto;
pub mod config;
pub mod monitor;
pub mod premium;
pub mod sabbath;
pub mod schedule;
pub mod selection;
pub mod status;
