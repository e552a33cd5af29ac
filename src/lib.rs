pub mod alerts;
pub mod api;
pub mod broadcast;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod sensors;
pub mod simulator;
pub mod test;
pub mod time;
pub mod utils;

pub const MAX_MSGS: usize = 100;
