pub mod chain;
pub mod config;
pub mod creator;
pub mod events;
pub mod market;
pub mod reader;
pub mod render;
pub mod wallet;
