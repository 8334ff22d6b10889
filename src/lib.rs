pub mod config;
pub mod engine;
pub mod tui;
pub mod worker;
